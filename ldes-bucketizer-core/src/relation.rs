//! Hypermedia relations between buckets
//!
//! A relation is a directed, typed edge from one bucket to another. Strategies
//! record relations in the [`RelationLedger`](crate::RelationLedger); the
//! engine expands the ones created during a `bucketize` call into output
//! statements.

use ldes_graph_ir::Term;
use ldes_vocab::tree;
use serde::{Deserialize, Serialize};

/// TREE relation type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Unconditional edge (`tree:Relation`)
    Relation,
    /// `tree:EqualToRelation`
    EqualTo,
    /// `tree:GreaterThanRelation`
    GreaterThan,
    /// `tree:GreaterThanOrEqualToRelation`
    GreaterThanOrEqualTo,
    /// `tree:LessThanRelation`
    LessThan,
    /// `tree:LessThanOrEqualToRelation`
    LessThanOrEqualTo,
    /// `tree:SubstringRelation`
    Substring,
    /// `tree:PrefixRelation`
    Prefix,
    /// `tree:GeospatiallyContainsRelation`
    GeospatiallyContains,
}

impl RelationKind {
    /// TREE IRI of this relation type
    pub fn iri(&self) -> &'static str {
        match self {
            RelationKind::Relation => tree::RELATION,
            RelationKind::EqualTo => tree::EQUAL_TO_RELATION,
            RelationKind::GreaterThan => tree::GREATER_THAN_RELATION,
            RelationKind::GreaterThanOrEqualTo => tree::GREATER_THAN_OR_EQUAL_TO_RELATION,
            RelationKind::LessThan => tree::LESS_THAN_RELATION,
            RelationKind::LessThanOrEqualTo => tree::LESS_THAN_OR_EQUAL_TO_RELATION,
            RelationKind::Substring => tree::SUBSTRING_RELATION,
            RelationKind::Prefix => tree::PREFIX_RELATION,
            RelationKind::GeospatiallyContains => tree::GEOSPATIALLY_CONTAINS_RELATION,
        }
    }
}

/// Outgoing relation of a bucket
///
/// The source bucket is the ledger key the relation is stored under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    /// Target bucket id
    pub node_id: String,
    /// Relation type
    #[serde(rename = "type")]
    pub kind: RelationKind,
    /// Comparison values (boundary literal, bounding polygon, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<Term>,
    /// Property path the values apply to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Term>,
}

impl Relation {
    /// Create a relation without values or path
    pub fn new(node_id: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            node_id: node_id.into(),
            kind,
            value: Vec::new(),
            path: None,
        }
    }

    /// Unconditional relation to `node_id`
    pub fn unconditional(node_id: impl Into<String>) -> Self {
        Self::new(node_id, RelationKind::Relation)
    }

    /// Set the comparison values
    pub fn with_values(mut self, value: Vec<Term>) -> Self {
        self.value = value;
        self
    }

    /// Add a single comparison value
    pub fn with_value(mut self, value: Term) -> Self {
        self.value.push(value);
        self
    }

    /// Set the property path
    pub fn with_path(mut self, path: Term) -> Self {
        self.path = Some(path);
        self
    }
}

/// Relation created during the current `bucketize` call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRelation {
    /// Source bucket id
    pub from: String,
    /// The relation as stored in the ledger
    pub relation: Relation,
}

impl NewRelation {
    /// Pair a source bucket with a relation
    pub fn new(from: impl Into<String>, relation: Relation) -> Self {
        Self {
            from: from.into(),
            relation,
        }
    }
}
