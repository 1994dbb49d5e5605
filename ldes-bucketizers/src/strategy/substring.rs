//! Substring (trie) bucketizing.
//!
//! Values are normalized and split into words. A member is placed in the
//! first bucket along its character path that still has room; a full bucket
//! is refined by appending the next character, and words are joined with
//! `+` (`"john doe"` walks `j`, `jo`, ..., `john`, `john+d`, ...).

use ldes_bucketizer_core::normalize::normalize_substring;
use ldes_bucketizer_core::{
    BucketAssignment, BucketStrategy, Bucketizer, BucketizerCore, BucketizerError,
    BucketizerOptions, Relation, RelationKind, Result,
};
use ldes_graph_ir::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Bucketizer using [`SubstringStrategy`]
pub type SubstringBucketizer = Bucketizer<SubstringStrategy>;

/// Per-bucket member counters
#[derive(Debug, Clone, Default)]
pub struct SubstringStrategy {
    bucket_counter: BTreeMap<String, usize>,
}

/// Exported state of [`SubstringStrategy`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstringState {
    pub bucket_counter: BTreeMap<String, usize>,
}

impl SubstringStrategy {
    /// Build a substring bucketizer
    ///
    /// The page size decides when a bucket is refined, so it has no default
    /// here.
    pub fn bucketizer(options: BucketizerOptions) -> Result<SubstringBucketizer> {
        if options.page_size.is_none() {
            return Err(BucketizerError::config(
                "substring bucketizer requires an explicit pageSize",
            ));
        }
        Bucketizer::new(options, SubstringStrategy::default())
    }

    /// Members counted in a bucket
    pub fn count(&self, bucket: &str) -> usize {
        self.bucket_counter.get(bucket).copied().unwrap_or(0)
    }

    fn has_room(&self, bucket: &str, page_size: usize) -> bool {
        self.count(bucket) < page_size
    }

    fn place(&mut self, assignment: &mut BucketAssignment, bucket: &str) {
        // a member matching the same bucket through several values counts once
        if !assignment.buckets.iter().any(|b| b == bucket) {
            *self.bucket_counter.entry(bucket.to_string()).or_default() += 1;
            assignment.push_bucket(bucket);
        }
    }

    fn place_value(
        &mut self,
        core: &mut BucketizerCore,
        assignment: &mut BucketAssignment,
        value: &str,
        path: Option<&Term>,
    ) {
        let page_size = core.page_size();
        let normalized = normalize_substring(value);
        let parts: Vec<&str> = normalized.split(' ').collect();

        let mut current = core.root().to_string();
        let mut substring = String::new();

        for (i, part) in parts.iter().enumerate() {
            for c in part.chars() {
                if self.has_room(&current, page_size) {
                    self.place(assignment, &current);
                    return;
                }

                substring.push(c);
                if !core.ledger().has_relation_to(&current, &substring) {
                    let values = substring.split('+').map(Term::string).collect();
                    let mut relation =
                        Relation::new(&substring, RelationKind::Substring).with_values(values);
                    if let Some(path) = path {
                        relation = relation.with_path(path.clone());
                    }
                    assignment.push_relation(core.relate(&current, relation));
                    trace!(from = %current, to = %substring, "refined bucket");
                    self.place(assignment, &substring);
                    return;
                }
                current = substring.clone();
            }

            if i + 1 < parts.len() {
                substring.push('+');
            }
        }

        // value exhausted without room: the deepest bucket takes it anyway
        self.place(assignment, &current);
    }
}

impl BucketStrategy for SubstringStrategy {
    type State = SubstringState;

    fn name(&self) -> &'static str {
        "substring"
    }

    fn init(&mut self, core: &mut BucketizerCore) -> Result<()> {
        self.bucket_counter.entry(core.root().to_string()).or_insert(0);
        Ok(())
    }

    fn create_buckets(
        &mut self,
        core: &mut BucketizerCore,
        values: &[Term],
    ) -> Result<BucketAssignment> {
        let mut assignment = BucketAssignment::new();
        let path = core.path_node();
        for value in values {
            self.place_value(core, &mut assignment, value.value(), path.as_ref());
        }
        Ok(assignment)
    }

    fn export_state(&self) -> SubstringState {
        SubstringState {
            bucket_counter: self.bucket_counter.clone(),
        }
    }

    fn import_state(&mut self, state: SubstringState) -> Result<()> {
        self.bucket_counter = state.bucket_counter;
        Ok(())
    }
}
