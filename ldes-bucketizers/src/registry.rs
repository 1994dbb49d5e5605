//! Strategy factory registry.
//!
//! Maps strategy type names (`basic`, `subject`, ...) to constructors. The
//! registry is a plain value: callers create one, optionally register their
//! own strategies, and pass it where bucketizers are built. The multi
//! strategy keeps a clone to build its nested levels.

use crate::ld;
use crate::multi::{MultiBucketizer, MultiOptions};
use crate::strategy::{
    BasicStrategy, GeospatialOptions, GeospatialStrategy, SubjectPageOptions,
    SubjectPageStrategy, SubstringStrategy,
};
use ldes_bucketizer_core::{Bucketize, BucketizerError, BucketizerOptions, Result};
use ldes_graph_ir::{Quad, Term};
use ldes_vocab::{ldes, rdf};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Builds a bucketizer from a JSON config and an optional state snapshot
pub type BuildFn =
    Arc<dyn Fn(&BucketizerRegistry, Value, Option<Value>) -> Result<Box<dyn Bucketize>> + Send + Sync>;

/// Reads a JSON config from a linked-data strategy description
pub type LdConfigFn = Arc<dyn Fn(&BucketizerRegistry, &[Quad], &Term) -> Result<Value> + Send + Sync>;

/// Strategy type plus its configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypedConfig {
    /// Registered strategy type
    #[serde(rename = "type")]
    pub kind: String,
    /// Strategy configuration
    #[serde(default)]
    pub config: Value,
}

impl TypedConfig {
    /// Pair a type name with a config
    pub fn new(kind: impl Into<String>, config: Value) -> Self {
        Self {
            kind: kind.into(),
            config,
        }
    }
}

#[derive(Clone)]
struct Factory {
    build: BuildFn,
    ld_config: LdConfigFn,
}

/// Strategy type → constructor
#[derive(Clone, Default)]
pub struct BucketizerRegistry {
    factories: BTreeMap<String, Factory>,
}

impl std::fmt::Debug for BucketizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketizerRegistry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn parse_config<T: DeserializeOwned>(kind: &str, config: Value) -> Result<T> {
    serde_json::from_value(config)
        .map_err(|e| BucketizerError::config(format!("invalid {kind} config: {e}")))
}

fn with_state<B: Bucketize + 'static>(
    mut bucketizer: B,
    state: Option<Value>,
) -> Result<Box<dyn Bucketize>> {
    if let Some(state) = state {
        bucketizer.import_state(state)?;
    }
    Ok(Box::new(bucketizer))
}

fn read_flat_options(_: &BucketizerRegistry, quads: &[Quad], subject: &Term) -> Result<Value> {
    ld::read_options(quads, subject).map(Value::Object)
}

impl BucketizerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in strategies
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(
            "basic",
            |_, config, state| {
                let options: BucketizerOptions = parse_config("basic", config)?;
                with_state(BasicStrategy::bucketizer(options)?, state)
            },
            read_flat_options,
        );

        registry.register(
            "subject",
            |_, config, state| {
                let options: SubjectPageOptions = parse_config("subject", config)?;
                with_state(SubjectPageStrategy::bucketizer(options)?, state)
            },
            read_flat_options,
        );

        registry.register(
            "geospatial",
            |_, config, state| {
                let options: GeospatialOptions = parse_config("geospatial", config)?;
                with_state(GeospatialStrategy::bucketizer(options)?, state)
            },
            read_flat_options,
        );

        registry.register(
            "substring",
            |_, config, state| {
                let options: BucketizerOptions = parse_config("substring", config)?;
                with_state(SubstringStrategy::bucketizer(options)?, state)
            },
            read_flat_options,
        );

        registry.register(
            "multi",
            |registry, config, state| {
                let options: MultiOptions = parse_config("multi", config)?;
                with_state(MultiBucketizer::new(registry, options)?, state)
            },
            |registry, quads, subject| {
                let configs = ld::read_configs(quads, subject)?
                    .iter()
                    .map(|node| registry.config_from_ld(quads, node))
                    .collect::<Result<Vec<_>>>()?;
                Ok(serde_json::to_value(MultiOptions { configs })?)
            },
        );

        registry
    }

    /// Register a strategy type (case-insensitive), replacing any previous one
    pub fn register<B, L>(&mut self, kind: &str, build: B, ld_config: L)
    where
        B: Fn(&BucketizerRegistry, Value, Option<Value>) -> Result<Box<dyn Bucketize>>
            + Send
            + Sync
            + 'static,
        L: Fn(&BucketizerRegistry, &[Quad], &Term) -> Result<Value> + Send + Sync + 'static,
    {
        self.factories.insert(
            kind.to_lowercase(),
            Factory {
                build: Arc::new(build),
                ld_config: Arc::new(ld_config),
            },
        );
    }

    /// Registered type names
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    fn factory(&self, kind: &str) -> Result<&Factory> {
        self.factories
            .get(&kind.to_lowercase())
            .ok_or_else(|| BucketizerError::UnknownType(kind.to_string()))
    }

    /// Build a bucketizer, restoring `state` when given
    pub fn build(
        &self,
        kind: &str,
        config: Value,
        state: Option<Value>,
    ) -> Result<Box<dyn Bucketize>> {
        let factory = self.factory(kind)?;
        debug!(kind = %kind, restore = state.is_some(), "building bucketizer");
        (factory.build)(self, config, state)
    }

    /// Build from a [`TypedConfig`]
    pub fn build_typed(
        &self,
        config: &TypedConfig,
        state: Option<Value>,
    ) -> Result<Box<dyn Bucketize>> {
        self.build(&config.kind, config.config.clone(), state)
    }

    /// Read the typed config described on `subject`
    pub fn config_from_ld(&self, quads: &[Quad], subject: &Term) -> Result<TypedConfig> {
        let kind = ld::bucket_type(quads, subject)?;
        let factory = self.factory(&kind)?;
        let config = (factory.ld_config)(self, quads, subject)?;
        Ok(TypedConfig {
            kind: kind.to_lowercase(),
            config,
        })
    }

    /// Build the bucketizer described on `subject`
    pub fn build_ld(
        &self,
        quads: &[Quad],
        subject: &Term,
        state: Option<Value>,
    ) -> Result<Box<dyn Bucketize>> {
        let config = self.config_from_ld(quads, subject)?;
        self.build_typed(&config, state)
    }

    /// Subjects typed `ldes:BucketizeStrategy`, in document order
    pub fn find_strategy_subjects(quads: &[Quad]) -> Vec<Term> {
        let mut subjects: Vec<Term> = Vec::new();
        for quad in quads {
            if quad.has_predicate(rdf::TYPE)
                && quad.o.as_iri() == Some(ldes::BUCKETIZE_STRATEGY)
                && !subjects.contains(&quad.s)
            {
                subjects.push(quad.s.clone());
            }
        }
        subjects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_registered() {
        let registry = BucketizerRegistry::with_defaults();
        let types: Vec<_> = registry.types().collect();
        assert_eq!(types, vec!["basic", "geospatial", "multi", "subject", "substring"]);
    }

    #[test]
    fn test_unknown_type() {
        let registry = BucketizerRegistry::with_defaults();
        let err = registry.build("timebased", json!({}), None).err().unwrap();
        assert!(matches!(err, BucketizerError::UnknownType(t) if t == "timebased"));
    }

    #[test]
    fn test_type_lookup_is_case_insensitive() {
        let registry = BucketizerRegistry::with_defaults();
        assert!(registry.build("Basic", json!({"pageSize": 2}), None).is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let registry = BucketizerRegistry::with_defaults();
        let missing_zoom = registry.build(
            "geospatial",
            json!({"propertyPath": "<http://example.org/p>", "pageSize": 2}),
            None,
        );
        assert!(matches!(missing_zoom, Err(BucketizerError::Config(_))));

        let missing_path = registry.build("subject", json!({"pageSize": 2}), None);
        assert!(matches!(missing_path, Err(BucketizerError::Config(_))));

        let missing_page_size =
            registry.build("substring", json!({"propertyPath": "<http://example.org/p>"}), None);
        assert!(matches!(missing_page_size, Err(BucketizerError::Config(_))));
    }

    #[test]
    fn test_typed_config_json() {
        let config: TypedConfig =
            serde_json::from_value(json!({"type": "basic", "config": {"pageSize": 1}})).unwrap();
        assert_eq!(config, TypedConfig::new("basic", json!({"pageSize": 1})));
    }

    #[test]
    fn test_custom_strategy() {
        let mut registry = BucketizerRegistry::new();
        registry.register(
            "Pages",
            |_, config, state| {
                let options: BucketizerOptions = parse_config("pages", config)?;
                with_state(BasicStrategy::bucketizer(options)?, state)
            },
            read_flat_options,
        );
        assert!(registry.build("pages", json!({"pageSize": 3}), None).is_ok());
        assert!(registry.build("basic", json!({}), None).is_err());
    }
}
