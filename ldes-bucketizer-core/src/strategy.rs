//! Strategy seam: the part of a bucketizer that picks buckets.

use crate::engine::BucketizerCore;
use crate::error::Result;
use crate::relation::NewRelation;
use ldes_graph_ir::Term;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Outcome of placing one member
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BucketAssignment {
    /// Buckets the member belongs to, without duplicates
    pub buckets: Vec<String>,
    /// Relations created while placing the member
    pub relations: Vec<NewRelation>,
    /// Buckets that will receive no further relations
    pub immutable: Vec<String>,
}

impl BucketAssignment {
    /// Empty assignment
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bucket unless already present
    pub fn push_bucket(&mut self, bucket: impl Into<String>) {
        let bucket = bucket.into();
        if !self.buckets.contains(&bucket) {
            self.buckets.push(bucket);
        }
    }

    /// Record a newly created relation
    pub fn push_relation(&mut self, relation: NewRelation) {
        self.relations.push(relation);
    }

    /// Mark a bucket immutable
    pub fn mark_immutable(&mut self, bucket: impl Into<String>) {
        let bucket = bucket.into();
        if !self.immutable.contains(&bucket) {
            self.immutable.push(bucket);
        }
    }

    /// Fold another assignment into this one
    pub fn merge(&mut self, other: BucketAssignment) {
        for bucket in other.buckets {
            self.push_bucket(bucket);
        }
        self.relations.extend(other.relations);
        for bucket in other.immutable {
            self.mark_immutable(bucket);
        }
    }

    /// True when no bucket was selected
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Partitioning strategy
///
/// Implementations hold only their own counters; the relation ledger, the
/// property path and fallback paging live in [`BucketizerCore`]. Both are
/// cloned before [`create_buckets`](Self::create_buckets) and restored when it
/// fails, so a failing strategy may leave its state half-updated.
pub trait BucketStrategy: Clone {
    /// Strategy-specific part of the exported state
    ///
    /// Flattened into the state object, so it must serialize as a map.
    type State: Serialize + DeserializeOwned;

    /// Short name used in log events
    fn name(&self) -> &'static str;

    /// Whether members are routed on property path values
    ///
    /// Strategies returning `false` receive no values and never trigger the
    /// no-match fallback.
    fn uses_property_path(&self) -> bool {
        true
    }

    /// Prepare the ledger once after construction
    fn init(&mut self, _core: &mut BucketizerCore) -> Result<()> {
        Ok(())
    }

    /// Select buckets for one member
    ///
    /// `values` are the property path matches, in document order. An error
    /// or an empty assignment sends the member to the fallback pages.
    fn create_buckets(
        &mut self,
        core: &mut BucketizerCore,
        values: &[Term],
    ) -> Result<BucketAssignment>;

    /// Snapshot the strategy counters
    fn export_state(&self) -> Self::State;

    /// Restore counters from a snapshot
    fn import_state(&mut self, state: Self::State) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;

    #[test]
    fn test_assignment_dedup_and_merge() {
        let mut a = BucketAssignment::new();
        a.push_bucket("x");
        a.push_bucket("x");
        a.mark_immutable("root");

        let mut b = BucketAssignment::new();
        b.push_bucket("x");
        b.push_bucket("y");
        b.push_relation(NewRelation::new("root", Relation::unconditional("y")));
        b.mark_immutable("root");

        a.merge(b);
        assert_eq!(a.buckets, vec!["x", "y"]);
        assert_eq!(a.relations.len(), 1);
        assert_eq!(a.immutable, vec!["root"]);
        assert!(!a.is_empty());
        assert!(BucketAssignment::new().is_empty());
    }
}
