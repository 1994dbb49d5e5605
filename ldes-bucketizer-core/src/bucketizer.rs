//! Bucketizer orchestration
//!
//! [`Bucketizer`] drives a [`BucketStrategy`]: it extracts property path
//! values, routes unmatched or failed members to the fallback pages, and turns
//! the resulting [`BucketAssignment`] into output statements.
//!
//! # Output
//!
//! For every member the returned statements are, in order:
//!
//! 1. each relation created for this member:
//!    `from sds:relation _:rel`, `_:rel sds:relationType <kind>`,
//!    `_:rel sds:relationBucket to`, `_:rel sds:relationValue v` per value and
//!    `_:rel sds:relationPath path` when the relation has a path
//! 2. `root sds:isRoot true` when the root bucket took part
//! 3. `bucket sds:immutable true` for buckets closed by this member
//! 4. the membership record: `_:record sds:payload member` and
//!    `_:record <bucketProperty> bucket` per bucket
//! 5. the RDF list describing a multi-step path, when a new relation uses it
//!
//! Input statements are never modified or echoed.

use crate::engine::BucketizerCore;
use crate::error::{BucketizerError, Result};
use crate::options::BucketizerOptions;
use crate::path::PropertyPath;
use crate::relation::NewRelation;
use crate::state::BucketizerState;
use crate::strategy::{BucketAssignment, BucketStrategy};
use ldes_graph_ir::{Quad, Term};
use ldes_vocab::sds;
use tracing::{debug, error, warn};

/// Type-erased bucketizer
///
/// Implemented by every [`Bucketizer`] and by composite bucketizers. The
/// registry hands out `Box<dyn Bucketize>`.
pub trait Bucketize {
    /// Place a member and return the new statements
    fn bucketize(&mut self, quads: &[Quad], member: &Term) -> Result<Vec<Quad>>;

    /// Snapshot as JSON
    fn export_state(&self) -> Result<serde_json::Value>;

    /// Restore from a JSON snapshot
    fn import_state(&mut self, state: serde_json::Value) -> Result<()>;
}

/// Engine plus strategy
#[derive(Debug)]
pub struct Bucketizer<S> {
    core: BucketizerCore,
    strategy: S,
}

impl<S: BucketStrategy> Bucketizer<S> {
    /// Create a bucketizer
    ///
    /// Fails when the strategy routes on a property path and none is
    /// configured, or when the path expression is invalid.
    pub fn new(options: BucketizerOptions, mut strategy: S) -> Result<Self> {
        let mut core = BucketizerCore::new(options, strategy.uses_property_path())?;
        strategy.init(&mut core)?;
        Ok(Self { core, strategy })
    }

    /// Engine state
    pub fn core(&self) -> &BucketizerCore {
        &self.core
    }

    /// Strategy
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Place a member and return the new statements
    pub fn bucketize(&mut self, quads: &[Quad], member: &Term) -> Result<Vec<Quad>> {
        let assignment = self.assign(quads, member);
        debug!(
            strategy = self.strategy.name(),
            member = %member,
            buckets = ?assignment.buckets,
            "member bucketized"
        );
        Ok(self.emit(member, assignment))
    }

    fn assign(&mut self, quads: &[Quad], member: &Term) -> BucketAssignment {
        let values = if self.strategy.uses_property_path() {
            let values = self.core.extract(quads, member);
            if values.is_empty() {
                warn!(
                    strategy = self.strategy.name(),
                    member = %member,
                    path = %self.core.path().map(PropertyPath::to_string).unwrap_or_default(),
                    "no matches for property path, applying fallback"
                );
                return self.core.fallback();
            }
            values
        } else {
            Vec::new()
        };

        let core_before = self.core.clone();
        let strategy_before = self.strategy.clone();

        match self.strategy.create_buckets(&mut self.core, &values) {
            Ok(assignment) if !assignment.is_empty() => assignment,
            Ok(mut assignment) => {
                warn!(
                    strategy = self.strategy.name(),
                    member = %member,
                    "strategy selected no bucket, applying fallback"
                );
                assignment.merge(self.core.fallback());
                assignment
            }
            Err(e) => {
                // the failed attempt must not leave relations or counters behind
                self.core = core_before;
                self.strategy = strategy_before;
                error!(
                    strategy = self.strategy.name(),
                    member = %member,
                    error = %e,
                    "error while creating buckets, applying fallback"
                );
                self.core.fallback()
            }
        }
    }

    fn emit(&mut self, member: &Term, assignment: BucketAssignment) -> Vec<Quad> {
        let mut out = Vec::new();
        let root = self.core.root().to_string();
        let mut touches_root = assignment.buckets.iter().any(|b| *b == root);

        for relation in &assignment.relations {
            touches_root |= relation.from == root || relation.relation.node_id == root;
            self.expand_relation(relation, &mut out);
        }

        let yes = Term::boolean(true);
        if touches_root {
            out.push(Quad::new(
                self.core.bucket_node(&root),
                Term::iri(sds::IS_ROOT),
                yes.clone(),
            ));
        }
        for bucket in &assignment.immutable {
            out.push(Quad::new(
                self.core.bucket_node(bucket),
                Term::iri(sds::IMMUTABLE),
                yes.clone(),
            ));
        }

        let record = self.core.fresh_blank("record");
        out.push(Quad::new(
            record.clone(),
            Term::iri(sds::PAYLOAD),
            member.clone(),
        ));
        let bucket_property = Term::iri(&self.core.options.bucket_property);
        for bucket in &assignment.buckets {
            out.push(Quad::new(
                record.clone(),
                bucket_property.clone(),
                self.core.bucket_node(bucket),
            ));
        }

        if let Some(path) = &self.core.path {
            let node = path.node();
            if assignment
                .relations
                .iter()
                .any(|r| r.relation.path.as_ref() == Some(&node))
            {
                out.extend(path.to_quads());
            }
        }

        out
    }

    fn expand_relation(&mut self, new: &NewRelation, out: &mut Vec<Quad>) {
        let rel = self.core.fresh_blank("rel");
        let relation = &new.relation;

        out.push(Quad::new(
            self.core.bucket_node(&new.from),
            Term::iri(sds::RELATION),
            rel.clone(),
        ));
        out.push(Quad::new(
            rel.clone(),
            Term::iri(sds::RELATION_TYPE),
            Term::iri(relation.kind.iri()),
        ));
        out.push(Quad::new(
            rel.clone(),
            Term::iri(sds::RELATION_BUCKET),
            self.core.bucket_node(&relation.node_id),
        ));
        for value in &relation.value {
            out.push(Quad::new(
                rel.clone(),
                Term::iri(sds::RELATION_VALUE),
                value.clone(),
            ));
        }
        if let Some(path) = &relation.path {
            out.push(Quad::new(rel, Term::iri(sds::RELATION_PATH), path.clone()));
        }
    }

    /// Typed snapshot
    pub fn state(&self) -> BucketizerState<S::State> {
        BucketizerState {
            hypermedia_controls: self.core.ledger.clone(),
            property_path_predicates: self.core.path.as_ref().map(|p| p.predicates().to_vec()),
            bucketizer_options: self.core.options.clone(),
            bucketless_page_number: self.core.bucketless_page_number,
            bucketless_page_member_counter: self.core.bucketless_page_member_counter,
            blank_node_counter: self.core.blank_node_counter,
            strategy: self.strategy.export_state(),
        }
    }

    /// Restore from a typed snapshot
    pub fn restore(&mut self, state: BucketizerState<S::State>) -> Result<()> {
        let path = match state.property_path_predicates {
            Some(predicates) => Some(PropertyPath::from_predicates(predicates)),
            None if self.strategy.uses_property_path() => {
                return Err(BucketizerError::state(
                    "snapshot has no property path for a path-based strategy",
                ))
            }
            None => None,
        };

        self.strategy.import_state(state.strategy)?;
        self.core.options = state.bucketizer_options.resolve()?;
        self.core.path = path;
        self.core.ledger = state.hypermedia_controls;
        self.core.bucketless_page_number = state.bucketless_page_number;
        self.core.bucketless_page_member_counter = state.bucketless_page_member_counter;
        self.core.blank_node_counter = state.blank_node_counter;
        Ok(())
    }
}

impl<S: BucketStrategy> Bucketize for Bucketizer<S> {
    fn bucketize(&mut self, quads: &[Quad], member: &Term) -> Result<Vec<Quad>> {
        Bucketizer::bucketize(self, quads, member)
    }

    fn export_state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.state())?)
    }

    fn import_state(&mut self, state: serde_json::Value) -> Result<()> {
        let state: BucketizerState<S::State> = serde_json::from_value(state)
            .map_err(|e| BucketizerError::state(e.to_string()))?;
        self.restore(state)
    }
}
