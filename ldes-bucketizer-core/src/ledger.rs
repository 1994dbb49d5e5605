//! Relation ledger: bucket id → outgoing relations
//!
//! Iteration follows first-insertion order of bucket ids, which keeps exported
//! state and emitted statements stable across runs.

use crate::relation::Relation;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Insertion-ordered map from bucket id to its relations
///
/// Serializes as an array of `[bucketId, relations]` pairs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "Vec<(String, Vec<Relation>)>",
    into = "Vec<(String, Vec<Relation>)>"
)]
pub struct RelationLedger {
    entries: Vec<(String, Vec<Relation>)>,
    index: FxHashMap<String, usize>,
}

impl RelationLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buckets with a ledger entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no bucket has an entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether a bucket has an entry (possibly empty)
    pub fn contains(&self, bucket: &str) -> bool {
        self.index.contains_key(bucket)
    }

    /// Relations of a bucket
    pub fn get(&self, bucket: &str) -> Option<&[Relation]> {
        self.index
            .get(bucket)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Mutable relations of a bucket
    pub fn get_mut(&mut self, bucket: &str) -> Option<&mut Vec<Relation>> {
        match self.index.get(bucket) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Relations of a bucket, creating an empty entry if absent
    pub fn entry(&mut self, bucket: &str) -> &mut Vec<Relation> {
        let i = match self.index.get(bucket) {
            Some(&i) => i,
            None => {
                self.entries.push((bucket.to_string(), Vec::new()));
                let i = self.entries.len() - 1;
                self.index.insert(bucket.to_string(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Replace the relations of a bucket
    ///
    /// Replacing an existing entry is logged and proceeds. Returns `true` when
    /// an entry was replaced.
    pub fn set(&mut self, bucket: &str, relations: Vec<Relation>) -> bool {
        match self.index.get(bucket) {
            Some(&i) => {
                warn!(bucket = %bucket, "overriding hypermedia controls");
                self.entries[i].1 = relations;
                true
            }
            None => {
                *self.entry(bucket) = relations;
                false
            }
        }
    }

    /// Append relations to a bucket, creating its entry if absent
    pub fn add(&mut self, bucket: &str, relations: impl IntoIterator<Item = Relation>) {
        self.entry(bucket).extend(relations);
    }

    /// Check whether `bucket` already has a relation towards `target`
    pub fn has_relation_to(&self, bucket: &str, target: &str) -> bool {
        self.get(bucket)
            .is_some_and(|rels| rels.iter().any(|r| r.node_id == target))
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Relation])> {
        self.entries
            .iter()
            .map(|(bucket, rels)| (bucket.as_str(), rels.as_slice()))
    }
}

impl From<Vec<(String, Vec<Relation>)>> for RelationLedger {
    fn from(pairs: Vec<(String, Vec<Relation>)>) -> Self {
        let mut ledger = RelationLedger::new();
        for (bucket, relations) in pairs {
            // duplicate keys in a snapshot collapse onto the first position
            ledger.entry(&bucket).extend(relations);
        }
        ledger
    }
}

impl From<RelationLedger> for Vec<(String, Vec<Relation>)> {
    fn from(ledger: RelationLedger) -> Self {
        ledger.entries
    }
}
