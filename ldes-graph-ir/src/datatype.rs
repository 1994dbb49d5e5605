//! RDF literal datatypes
//!
//! Datatypes are always explicit; there is no "untyped" literal.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Common datatype IRIs (re-exported from the vocab crate)
pub mod iri {
    pub use ldes_vocab::geosparql::WKT_LITERAL as GEO_WKT_LITERAL;
    pub use ldes_vocab::rdf::LANG_STRING as RDF_LANG_STRING;
    pub use ldes_vocab::xsd::{
        BOOLEAN as XSD_BOOLEAN, DOUBLE as XSD_DOUBLE, INTEGER as XSD_INTEGER,
        STRING as XSD_STRING,
    };
}

/// RDF literal datatype, identified by its expanded IRI
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Datatype(Arc::from(iri.as_ref()))
    }

    /// xsd:string - default for plain string literals
    pub fn xsd_string() -> Self {
        Self::from_iri(iri::XSD_STRING)
    }

    /// xsd:boolean
    pub fn xsd_boolean() -> Self {
        Self::from_iri(iri::XSD_BOOLEAN)
    }

    /// xsd:integer
    pub fn xsd_integer() -> Self {
        Self::from_iri(iri::XSD_INTEGER)
    }

    /// xsd:double
    pub fn xsd_double() -> Self {
        Self::from_iri(iri::XSD_DOUBLE)
    }

    /// rdf:langString - for language-tagged literals
    pub fn rdf_lang_string() -> Self {
        Self::from_iri(iri::RDF_LANG_STRING)
    }

    /// geo:wktLiteral - Well-Known Text geometries
    pub fn wkt_literal() -> Self {
        Self::from_iri(iri::GEO_WKT_LITERAL)
    }

    /// Get the IRI of this datatype
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Check if this is the xsd:string datatype
    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == iri::XSD_STRING
    }

    /// Check if this is the rdf:langString datatype
    pub fn is_lang_string(&self) -> bool {
        self.as_iri() == iri::RDF_LANG_STRING
    }

    /// Check if this is the geo:wktLiteral datatype
    pub fn is_wkt(&self) -> bool {
        self.as_iri() == iri::GEO_WKT_LITERAL
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_iri())
    }
}
