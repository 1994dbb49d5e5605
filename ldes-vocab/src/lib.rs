//! RDF vocabulary constants for LDES bucketizers
//!
//! Centralizes every IRI the bucketizers read or emit, so the strategy crates
//! never spell out a namespace by hand.
//!
//! # Organization
//!
//! Constants are grouped by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `xsd` - XSD datatypes (http://www.w3.org/2001/XMLSchema#)
//! - `tree` - TREE hypermedia vocabulary (https://w3id.org/tree#)
//! - `ldes` - LDES configuration vocabulary (https://w3id.org/ldes#)
//! - `sds` - Smart Data Specification records (https://w3id.org/sds#)
//! - `geosparql` - GeoSPARQL literal datatypes

/// RDF vocabulary constants
pub mod rdf {
    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// rdf:first IRI (RDF list head)
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// rdf:rest IRI (RDF list tail)
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";

    /// rdf:nil IRI (RDF list terminator)
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

/// XSD datatype constants
pub mod xsd {
    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:anyURI IRI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}

/// TREE hypermedia vocabulary
///
/// Relation type IRIs describe the condition under which a consumer should
/// follow an edge from one bucket to another.
pub mod tree {
    /// Namespace prefix
    pub const NS: &str = "https://w3id.org/tree#";

    /// tree:path - property path a relation (or a fragmentation) is based on
    pub const PATH: &str = "https://w3id.org/tree#path";

    /// tree:Relation - unconditional edge
    pub const RELATION: &str = "https://w3id.org/tree#Relation";

    /// tree:EqualToRelation
    pub const EQUAL_TO_RELATION: &str = "https://w3id.org/tree#EqualToRelation";

    /// tree:GreaterThanRelation
    pub const GREATER_THAN_RELATION: &str = "https://w3id.org/tree#GreaterThanRelation";

    /// tree:GreaterThanOrEqualToRelation
    pub const GREATER_THAN_OR_EQUAL_TO_RELATION: &str =
        "https://w3id.org/tree#GreaterThanOrEqualToRelation";

    /// tree:LessThanRelation
    pub const LESS_THAN_RELATION: &str = "https://w3id.org/tree#LessThanRelation";

    /// tree:LessThanOrEqualToRelation
    pub const LESS_THAN_OR_EQUAL_TO_RELATION: &str =
        "https://w3id.org/tree#LessThanOrEqualToRelation";

    /// tree:SubstringRelation
    pub const SUBSTRING_RELATION: &str = "https://w3id.org/tree#SubstringRelation";

    /// tree:PrefixRelation
    pub const PREFIX_RELATION: &str = "https://w3id.org/tree#PrefixRelation";

    /// tree:GeospatiallyContainsRelation
    pub const GEOSPATIALLY_CONTAINS_RELATION: &str =
        "https://w3id.org/tree#GeospatiallyContainsRelation";
}

/// LDES configuration vocabulary
///
/// Used when a bucketizer is described as linked data instead of JSON.
pub mod ldes {
    /// Namespace prefix
    pub const NS: &str = "https://w3id.org/ldes#";

    /// ldes:BucketizeStrategy - class of a strategy description
    pub const BUCKETIZE_STRATEGY: &str = "https://w3id.org/ldes#BucketizeStrategy";

    /// ldes:bucketType - strategy discriminator (e.g. `ldes:subject`)
    pub const BUCKET_TYPE: &str = "https://w3id.org/ldes#bucketType";

    /// ldes:bucketProperty
    pub const BUCKET_PROPERTY: &str = "https://w3id.org/ldes#bucketProperty";

    /// ldes:pageSize
    pub const PAGE_SIZE: &str = "https://w3id.org/ldes#pageSize";

    /// ldes:root
    pub const ROOT: &str = "https://w3id.org/ldes#root";

    /// ldes:bucketBase
    pub const BUCKET_BASE: &str = "https://w3id.org/ldes#bucketBase";

    /// ldes:zoom (geospatial strategy)
    pub const ZOOM: &str = "https://w3id.org/ldes#zoom";

    /// ldes:maxRelations (subject-page strategy)
    pub const MAX_RELATIONS: &str = "https://w3id.org/ldes#maxRelations";

    /// ldes:configs (multi strategy, RDF list of nested strategies)
    pub const CONFIGS: &str = "https://w3id.org/ldes#configs";

    /// Build an IRI in the LDES namespace from a local name
    pub fn custom(local: &str) -> String {
        format!("{NS}{local}")
    }

    /// Strip the LDES namespace from an IRI, if present
    pub fn local_name(iri: &str) -> &str {
        iri.strip_prefix(NS).unwrap_or(iri)
    }
}

/// Smart Data Specification (SDS) record vocabulary
///
/// Output statements of a bucketizer are phrased in this vocabulary: a record
/// links a member (`sds:payload`) to its buckets, and buckets are linked to
/// each other through `sds:relation` nodes.
pub mod sds {
    /// Namespace prefix
    pub const NS: &str = "https://w3id.org/sds#";

    /// sds:payload - record → member
    pub const PAYLOAD: &str = "https://w3id.org/sds#payload";

    /// sds:bucket - record → bucket (default bucket property)
    pub const BUCKET: &str = "https://w3id.org/sds#bucket";

    /// sds:relation - bucket → relation node
    pub const RELATION: &str = "https://w3id.org/sds#relation";

    /// sds:relationType - relation node → TREE relation type
    pub const RELATION_TYPE: &str = "https://w3id.org/sds#relationType";

    /// sds:relationBucket - relation node → target bucket
    pub const RELATION_BUCKET: &str = "https://w3id.org/sds#relationBucket";

    /// sds:relationValue - relation node → comparison value
    pub const RELATION_VALUE: &str = "https://w3id.org/sds#relationValue";

    /// sds:relationPath - relation node → property path
    pub const RELATION_PATH: &str = "https://w3id.org/sds#relationPath";

    /// sds:isRoot - marks the root bucket of a strategy
    pub const IS_ROOT: &str = "https://w3id.org/sds#isRoot";

    /// sds:immutable - marks a bucket that will receive no further relations
    pub const IMMUTABLE: &str = "https://w3id.org/sds#immutable";
}

/// GeoSPARQL literal datatypes
pub mod geosparql {
    /// geo:wktLiteral
    pub const WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";

    /// geo:gmlLiteral (recognized, not supported for tiling)
    pub const GML_LITERAL: &str = "http://www.opengis.net/ont/geosparql#gmlLiteral";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ldes_custom_roundtrip() {
        let iri = ldes::custom("subject");
        assert_eq!(iri, "https://w3id.org/ldes#subject");
        assert_eq!(ldes::local_name(&iri), "subject");
        assert_eq!(ldes::local_name("basic"), "basic");
    }

    #[test]
    fn test_namespaces_prefix_constants() {
        assert!(sds::IS_ROOT.starts_with(sds::NS));
        assert!(tree::SUBSTRING_RELATION.starts_with(tree::NS));
        assert!(ldes::BUCKET_TYPE.starts_with(ldes::NS));
    }
}
