//! Multi-level bucketizing.
//!
//! A chain of strategies where each bucket of one level is partitioned again
//! by the next. The first config buckets every member; for every bucket it
//! produces, a separate instance of the second config is created, and so on.
//!
//! Child output is rewritten into the parent's namespace:
//! - the child's root bucket becomes the parent bucket
//! - other child buckets become `{parentBucket}/{childBucket}`
//! - child blank nodes become `{parentBucket}/{label}`
//! - child `sds:isRoot` markers are dropped
//!
//! Only the deepest membership record survives, so a member ends up in
//! `{level0}/{level1}/.../{levelN}`.

use crate::registry::{BucketizerRegistry, TypedConfig};
use ldes_bucketizer_core::{Bucketize, BucketizerError, Result};
use ldes_graph_ir::{Quad, Term};
use ldes_vocab::sds;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

/// Multi-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiOptions {
    /// One config per level, outermost first
    pub configs: Vec<TypedConfig>,
}

struct Level {
    current: Box<dyn Bucketize>,
    root: Option<Term>,
    children: BTreeMap<String, Level>,
}

impl Level {
    fn new(current: Box<dyn Bucketize>) -> Self {
        Self {
            current,
            root: None,
            children: BTreeMap::new(),
        }
    }
}

/// Exported state of one level and its children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    /// State of this level's bucketizer
    pub state: Value,
    /// Root bucket of this level as seen in its output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<Term>,
    /// Child levels keyed by parent bucket
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, LevelState>,
}

/// Bucketizer composing a chain of strategies
pub struct MultiBucketizer {
    registry: BucketizerRegistry,
    configs: Vec<TypedConfig>,
    levels: Level,
}

impl std::fmt::Debug for MultiBucketizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiBucketizer")
            .field("configs", &self.configs)
            .finish_non_exhaustive()
    }
}

impl MultiBucketizer {
    /// Build the outermost level; nested levels are built on first use
    ///
    /// Every nested config is built once here and discarded, so unknown
    /// types and invalid configs fail construction instead of a later
    /// `bucketize` call.
    pub fn new(registry: &BucketizerRegistry, options: MultiOptions) -> Result<Self> {
        let (first, nested) = options.configs.split_first().ok_or_else(|| {
            BucketizerError::config("multi bucketizer needs at least one config")
        })?;
        let current = registry.build_typed(first, None)?;
        for config in nested {
            registry.build_typed(config, None)?;
        }

        Ok(Self {
            registry: registry.clone(),
            configs: options.configs,
            levels: Level::new(current),
        })
    }

    /// Number of levels
    pub fn depth(&self) -> usize {
        self.configs.len()
    }
}

fn find_record(quads: &[Quad], member: &Term) -> Result<Term> {
    quads
        .iter()
        .find(|q| q.has_predicate(sds::PAYLOAD) && q.o == *member)
        .map(|q| q.s.clone())
        .ok_or_else(|| BucketizerError::MissingRecord(member.to_string()))
}

/// First bucket the record points at
fn record_bucket(quads: &[Quad], record: &Term, member: &Term) -> Result<Term> {
    quads
        .iter()
        .find(|q| q.s == *record && !q.has_predicate(sds::PAYLOAD))
        .map(|q| q.o.clone())
        .ok_or_else(|| BucketizerError::MissingRecord(member.to_string()))
}

/// Bucket terms appearing in a bucketizer's output
fn bucket_terms(quads: &[Quad], record: &Term) -> FxHashSet<Term> {
    let relation_nodes: FxHashSet<&Term> = quads
        .iter()
        .filter(|q| q.has_predicate(sds::RELATION))
        .map(|q| &q.o)
        .collect();

    let mut buckets = FxHashSet::default();
    for q in quads {
        if q.s == *record && !q.has_predicate(sds::PAYLOAD) {
            buckets.insert(q.o.clone());
        } else if q.has_predicate(sds::RELATION) || q.has_predicate(sds::IMMUTABLE) {
            buckets.insert(q.s.clone());
        } else if q.has_predicate(sds::RELATION_BUCKET) && relation_nodes.contains(&q.s) {
            buckets.insert(q.o.clone());
        }
    }
    buckets
}

fn bucketize_part(
    registry: &BucketizerRegistry,
    remaining: &[TypedConfig],
    level: &mut Level,
    quads: &[Quad],
    member: &Term,
) -> Result<Vec<Quad>> {
    let mut extras = level.current.bucketize(quads, member)?;

    let Some((next, rest)) = remaining.split_first() else {
        return Ok(extras);
    };

    let record = find_record(&extras, member)?;
    let bucket = record_bucket(&extras, &record, member)?;
    let bucket_value = bucket.value().to_string();

    let child = match level.children.entry(bucket_value.clone()) {
        Entry::Occupied(e) => e.into_mut(),
        Entry::Vacant(e) => {
            debug!(bucket = %bucket_value, kind = %next.kind, "creating nested bucketizer");
            e.insert(Level::new(registry.build_typed(next, None)?))
        }
    };

    let later = bucketize_part(registry, rest, child, quads, member)?;

    let yes = Term::boolean(true);
    if let Some(root) = later
        .iter()
        .find(|q| q.has_predicate(sds::IS_ROOT) && q.o == yes)
    {
        child.root = Some(root.s.clone());
    }

    let child_record = find_record(&later, member)?;
    let child_buckets = bucket_terms(&later, &child_record);
    let prefix = format!("{bucket_value}/");

    let rewrite = |t: &Term| -> Term {
        if child.root.as_ref() == Some(t) {
            bucket.clone()
        } else if t != member && (t.is_blank() || child_buckets.contains(t)) {
            t.prefixed(&prefix)
        } else {
            t.clone()
        }
    };

    extras.retain(|q| q.s != record);
    extras.extend(
        later
            .iter()
            .filter(|q| !q.has_predicate(sds::IS_ROOT))
            .map(|q| q.map_nodes(&rewrite)),
    );

    Ok(extras)
}

fn export_level(level: &Level) -> Result<LevelState> {
    let children = level
        .children
        .iter()
        .map(|(bucket, child)| Ok((bucket.clone(), export_level(child)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(LevelState {
        state: level.current.export_state()?,
        root: level.root.clone(),
        children,
    })
}

fn import_level(
    registry: &BucketizerRegistry,
    remaining: &[TypedConfig],
    level: &mut Level,
    state: LevelState,
) -> Result<()> {
    level.current.import_state(state.state)?;
    level.root = state.root;
    level.children.clear();

    if state.children.is_empty() {
        return Ok(());
    }
    let Some((next, rest)) = remaining.split_first() else {
        return Err(BucketizerError::state(
            "snapshot has more levels than configured",
        ));
    };

    for (bucket, child_state) in state.children {
        let mut child = Level::new(registry.build_typed(next, None)?);
        import_level(registry, rest, &mut child, child_state)?;
        level.children.insert(bucket, child);
    }
    Ok(())
}

impl Bucketize for MultiBucketizer {
    fn bucketize(&mut self, quads: &[Quad], member: &Term) -> Result<Vec<Quad>> {
        let Self {
            registry,
            configs,
            levels,
        } = self;
        bucketize_part(registry, &configs[1..], levels, quads, member)
    }

    fn export_state(&self) -> Result<Value> {
        Ok(serde_json::to_value(export_level(&self.levels)?)?)
    }

    fn import_state(&mut self, state: Value) -> Result<()> {
        let state: LevelState =
            serde_json::from_value(state).map_err(|e| BucketizerError::state(e.to_string()))?;
        let Self {
            registry,
            configs,
            levels,
        } = self;
        import_level(registry, &configs[1..], levels, state)
    }
}
