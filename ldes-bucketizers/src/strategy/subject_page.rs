//! Subject-page bucketizing.
//!
//! Every distinct subject gets its own bucket, named after the last path
//! segment of the value the property path reaches. Subject buckets are
//! indexed from a chain of root pages (`root`, `root-1`, `root-2`, ...), each
//! holding at most `maxRelations` subject relations. A root page that is full
//! is linked to the next one and marked immutable.

use ldes_bucketizer_core::normalize::normalize_subject;
use ldes_bucketizer_core::{
    BucketAssignment, BucketStrategy, Bucketizer, BucketizerCore, BucketizerError,
    BucketizerOptions, Relation, RelationKind, Result,
};
use ldes_graph_ir::Term;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default number of subject relations per root page
pub const DEFAULT_MAX_RELATIONS: usize = 100;

fn default_max_relations() -> usize {
    DEFAULT_MAX_RELATIONS
}

/// Bucketizer using [`SubjectPageStrategy`]
pub type SubjectPageBucketizer = Bucketizer<SubjectPageStrategy>;

/// Subject-page configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPageOptions {
    #[serde(flatten)]
    pub base: BucketizerOptions,

    /// Subject relations per root page
    #[serde(default = "default_max_relations")]
    pub max_relations: usize,

    /// Strip diacritics and punctuation from bucket ids
    #[serde(default)]
    pub normalize: bool,

    /// Suffix appended to every bucket id (`{id}-{salt}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    /// Generate a salt when none is given
    #[serde(default)]
    pub random_salt: bool,
}

impl SubjectPageOptions {
    /// Options with defaults around `base`
    pub fn new(base: BucketizerOptions) -> Self {
        Self {
            base,
            max_relations: DEFAULT_MAX_RELATIONS,
            normalize: false,
            salt: None,
            random_salt: false,
        }
    }
}

/// Subject-page counters
#[derive(Debug, Clone)]
pub struct SubjectPageStrategy {
    max_relations: usize,
    normalize: bool,
    salt: Option<String>,
    root_relation_count: usize,
    root_count: usize,
}

/// Exported state of [`SubjectPageStrategy`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPageState {
    pub max_relations: usize,
    pub normalize: bool,
    #[serde(default)]
    pub salt: Option<String>,
    pub root_relation_count: usize,
    pub root_count: usize,
}

impl SubjectPageStrategy {
    /// Create the strategy, generating a salt if requested
    ///
    /// `maxRelations` must be at least 1.
    pub fn new(options: &SubjectPageOptions) -> Result<Self> {
        if options.max_relations == 0 {
            return Err(BucketizerError::config("maxRelations must be greater than 0"));
        }

        let salt = match (&options.salt, options.random_salt) {
            (Some(salt), _) => Some(salt.clone()),
            (None, true) => {
                let salt = format!("{:08x}", rand::random::<u32>());
                info!(salt = %salt, "generated subject bucket salt");
                Some(salt)
            }
            (None, false) => None,
        };

        Ok(Self {
            max_relations: options.max_relations,
            normalize: options.normalize,
            salt,
            root_relation_count: 0,
            root_count: 0,
        })
    }

    /// Build a subject-page bucketizer
    pub fn bucketizer(options: SubjectPageOptions) -> Result<SubjectPageBucketizer> {
        let strategy = Self::new(&options)?;
        Bucketizer::new(options.base, strategy)
    }

    /// Salt in use, if any
    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref()
    }

    fn root_name(&self, root: &str) -> String {
        match self.root_count {
            0 => root.to_string(),
            n => format!("{root}-{n}"),
        }
    }

    /// Bucket id for a value
    pub fn subject_id(&self, value: &str) -> String {
        let last = match value.rfind('/') {
            Some(i) => &value[i + 1..],
            None => value,
        };
        let id = if self.normalize {
            normalize_subject(last)
        } else {
            last.to_string()
        };
        match &self.salt {
            Some(salt) => format!("{id}-{salt}"),
            None => id,
        }
    }
}

impl BucketStrategy for SubjectPageStrategy {
    type State = SubjectPageState;

    fn name(&self) -> &'static str {
        "subject"
    }

    fn create_buckets(
        &mut self,
        core: &mut BucketizerCore,
        values: &[Term],
    ) -> Result<BucketAssignment> {
        let mut assignment = BucketAssignment::new();
        let root = core.root().to_string();
        let path = core.path_node();

        for value in values {
            let id = self.subject_id(value.value());
            if id.is_empty() {
                continue;
            }

            if !core.ledger().contains(&id) {
                core.hypermedia_controls_mut(&id, true);

                if self.root_relation_count >= self.max_relations {
                    let full = self.root_name(&root);
                    self.root_count += 1;
                    self.root_relation_count = 0;
                    let next = self.root_name(&root);
                    debug!(from = %full, to = %next, "root page full");
                    assignment.push_relation(core.relate(&full, Relation::unconditional(next)));
                    assignment.mark_immutable(full);
                }

                let mut relation = Relation::new(&id, RelationKind::EqualTo).with_value(value.clone());
                if let Some(path) = &path {
                    relation = relation.with_path(path.clone());
                }
                let current = self.root_name(&root);
                assignment.push_relation(core.relate(&current, relation));
                self.root_relation_count += 1;
            }

            assignment.push_bucket(id);
        }

        Ok(assignment)
    }

    fn export_state(&self) -> SubjectPageState {
        SubjectPageState {
            max_relations: self.max_relations,
            normalize: self.normalize,
            salt: self.salt.clone(),
            root_relation_count: self.root_relation_count,
            root_count: self.root_count,
        }
    }

    fn import_state(&mut self, state: SubjectPageState) -> Result<()> {
        if state.max_relations == 0 {
            return Err(BucketizerError::state("maxRelations must be greater than 0"));
        }
        self.max_relations = state.max_relations;
        self.normalize = state.normalize;
        self.salt = state.salt;
        self.root_relation_count = state.root_relation_count;
        self.root_count = state.root_count;
        Ok(())
    }
}
