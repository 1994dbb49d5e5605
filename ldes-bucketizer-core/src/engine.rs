//! Shared bucketizer state: options, property path, relation ledger and the
//! fallback allocator.

use crate::error::{BucketizerError, Result};
use crate::ledger::RelationLedger;
use crate::options::BucketizerOptions;
use crate::path::PropertyPath;
use crate::relation::{NewRelation, Relation};
use crate::strategy::BucketAssignment;
use ldes_graph_ir::{Quad, Term};
use tracing::debug;

/// Engine state every strategy operates on
///
/// Strategies receive `&mut BucketizerCore` in
/// [`BucketStrategy::create_buckets`](crate::BucketStrategy::create_buckets)
/// and record relations through it.
#[derive(Clone, Debug)]
pub struct BucketizerCore {
    pub(crate) options: BucketizerOptions,
    pub(crate) path: Option<PropertyPath>,
    pub(crate) ledger: RelationLedger,
    pub(crate) bucketless_page_number: usize,
    pub(crate) bucketless_page_member_counter: usize,
    pub(crate) blank_node_counter: u64,
}

impl BucketizerCore {
    /// Create the engine state from options
    ///
    /// When `requires_path` is set, a missing property path is a
    /// configuration error.
    pub fn new(options: BucketizerOptions, requires_path: bool) -> Result<Self> {
        let options = options.resolve()?;
        let path = match &options.property_path {
            Some(input) => Some(input.to_path()?),
            None if requires_path => {
                return Err(BucketizerError::config(
                    "expected propertyPath in options but found none",
                ))
            }
            None => None,
        };

        Ok(Self {
            options,
            path,
            ledger: RelationLedger::new(),
            bucketless_page_number: 0,
            bucketless_page_member_counter: 0,
            blank_node_counter: 0,
        })
    }

    /// Resolved options
    pub fn options(&self) -> &BucketizerOptions {
        &self.options
    }

    /// Root bucket id
    pub fn root(&self) -> &str {
        &self.options.root
    }

    /// Members per page
    pub fn page_size(&self) -> usize {
        self.options.page_size()
    }

    /// Property path, if configured
    pub fn path(&self) -> Option<&PropertyPath> {
        self.path.as_ref()
    }

    /// Term describing the property path in relations
    pub fn path_node(&self) -> Option<Term> {
        self.path.as_ref().map(PropertyPath::node)
    }

    /// Values the property path reaches from `member`
    pub fn extract(&self, quads: &[Quad], member: &Term) -> Vec<Term> {
        match &self.path {
            Some(path) => path.evaluate(quads, member),
            None => Vec::new(),
        }
    }

    // ========================================================================
    // Hypermedia controls
    // ========================================================================

    /// Full relation ledger
    pub fn ledger(&self) -> &RelationLedger {
        &self.ledger
    }

    /// Relations of a bucket
    pub fn hypermedia_controls(&self, bucket: &str) -> Option<&[Relation]> {
        self.ledger.get(bucket)
    }

    /// Mutable relations of a bucket, optionally creating an empty entry
    pub fn hypermedia_controls_mut(
        &mut self,
        bucket: &str,
        create: bool,
    ) -> Option<&mut Vec<Relation>> {
        if create {
            Some(self.ledger.entry(bucket))
        } else {
            self.ledger.get_mut(bucket)
        }
    }

    /// Replace the relations of a bucket (logged when an entry is replaced)
    pub fn set_hypermedia_controls(&mut self, bucket: &str, relations: Vec<Relation>) {
        self.ledger.set(bucket, relations);
    }

    /// Append relations to a bucket
    pub fn add_hypermedia_controls(
        &mut self,
        bucket: &str,
        relations: impl IntoIterator<Item = Relation>,
    ) {
        self.ledger.add(bucket, relations);
    }

    /// Append a relation to `from` and return it as newly created
    pub fn relate(&mut self, from: &str, relation: Relation) -> NewRelation {
        debug!(from = %from, to = %relation.node_id, kind = ?relation.kind, "new relation");
        self.ledger.add(from, [relation.clone()]);
        NewRelation::new(from, relation)
    }

    // ========================================================================
    // Output terms
    // ========================================================================

    /// IRI of a bucket
    pub fn bucket_node(&self, bucket: &str) -> Term {
        Term::iri(format!("{}{}", self.options.bucket_base, bucket))
    }

    /// Fresh blank node `{kind}-{n}`
    ///
    /// The counter is part of the exported state, so labels do not repeat
    /// across a restore.
    pub fn fresh_blank(&mut self, kind: &str) -> Term {
        let term = Term::blank(format!("{kind}-{}", self.blank_node_counter));
        self.blank_node_counter += 1;
        term
    }

    // ========================================================================
    // Fallback
    // ========================================================================

    /// Place a member in the current `bucketless-N` page
    ///
    /// The first member of each page links the page from the root.
    pub fn fallback(&mut self) -> BucketAssignment {
        if self.bucketless_page_member_counter >= self.page_size() {
            self.bucketless_page_number += 1;
            self.bucketless_page_member_counter = 0;
        }

        let bucket = format!("bucketless-{}", self.bucketless_page_number);
        let root = self.options.root.clone();

        let mut assignment = BucketAssignment::new();
        if !self.ledger.has_relation_to(&root, &bucket) {
            assignment.push_relation(self.relate(&root, Relation::unconditional(&bucket)));
        }

        self.bucketless_page_member_counter += 1;
        assignment.push_bucket(bucket);
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::RelationKind;

    fn core(page_size: usize) -> BucketizerCore {
        BucketizerCore::new(BucketizerOptions::new().with_page_size(page_size), false).unwrap()
    }

    #[test]
    fn test_missing_path_rejected_when_required() {
        let err = BucketizerCore::new(BucketizerOptions::new(), true).unwrap_err();
        assert!(matches!(err, BucketizerError::Config(_)));
        assert!(BucketizerCore::new(BucketizerOptions::new(), false).is_ok());
    }

    #[test]
    fn test_fallback_pages() {
        let mut core = core(2);
        let buckets: Vec<_> = (0..5)
            .map(|_| core.fallback().buckets.remove(0))
            .collect();
        assert_eq!(
            buckets,
            vec!["bucketless-0", "bucketless-0", "bucketless-1", "bucketless-1", "bucketless-2"]
        );

        let root: Vec<_> = core
            .hypermedia_controls("root")
            .unwrap()
            .iter()
            .map(|r| (r.node_id.as_str(), r.kind))
            .collect();
        assert_eq!(
            root,
            vec![
                ("bucketless-0", RelationKind::Relation),
                ("bucketless-1", RelationKind::Relation),
                ("bucketless-2", RelationKind::Relation),
            ]
        );
    }

    #[test]
    fn test_fallback_relation_is_new_once() {
        let mut core = core(10);
        assert_eq!(core.fallback().relations.len(), 1);
        assert!(core.fallback().relations.is_empty());
    }

    #[test]
    fn test_bucket_node_and_blank_labels() {
        let mut core = BucketizerCore::new(
            BucketizerOptions::new()
                .with_page_size(1)
                .with_bucket_base("http://example.org/b/"),
            false,
        )
        .unwrap();
        assert_eq!(core.bucket_node("7"), Term::iri("http://example.org/b/7"));
        assert_eq!(core.fresh_blank("record"), Term::blank("record-0"));
        assert_eq!(core.fresh_blank("rel"), Term::blank("rel-1"));
    }

    #[test]
    fn test_hypermedia_controls_mut() {
        let mut core = core(1);
        assert!(core.hypermedia_controls_mut("x", false).is_none());
        core.hypermedia_controls_mut("x", true)
            .unwrap()
            .push(Relation::unconditional("y"));
        assert_eq!(core.hypermedia_controls("x").unwrap().len(), 1);

        core.set_hypermedia_controls("x", Vec::new());
        assert!(core.hypermedia_controls("x").unwrap().is_empty());
    }
}
