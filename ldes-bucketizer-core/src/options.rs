//! Options shared by every bucketizer
//!
//! Strategy option structs embed [`BucketizerOptions`] with
//! `#[serde(flatten)]`, so a single camelCase JSON object configures both the
//! engine and the strategy.

use crate::error::{BucketizerError, Result};
use crate::path::PropertyPath;
use ldes_vocab::sds;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Root bucket id used when none is configured
pub const DEFAULT_ROOT: &str = "root";

/// Property path as written in configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathInput {
    /// Path expression, e.g. `"<http://example.org/p>"`
    Expression(String),
    /// Predicate IRIs in order
    Predicates(Vec<String>),
}

impl PathInput {
    /// Parse into a [`PropertyPath`]
    ///
    /// Blank expressions are a configuration error rather than a parse error.
    pub fn to_path(&self) -> Result<PropertyPath> {
        match self {
            PathInput::Expression(expr) if expr.trim().is_empty() => {
                Err(BucketizerError::config("propertyPath is blank"))
            }
            PathInput::Expression(expr) => PropertyPath::parse(expr),
            PathInput::Predicates(preds) => Ok(PropertyPath::from_predicates(preds.clone())),
        }
    }
}

impl From<&str> for PathInput {
    fn from(expr: &str) -> Self {
        PathInput::Expression(expr.to_string())
    }
}

fn default_bucket_property() -> String {
    sds::BUCKET.to_string()
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

/// Engine options
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketizerOptions {
    /// Predicate linking a record to its buckets
    #[serde(default = "default_bucket_property")]
    pub bucket_property: String,

    /// Members per page; defaults to [`DEFAULT_PAGE_SIZE`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    /// Path to the value a strategy partitions on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_path: Option<PathInput>,

    /// Root bucket id
    #[serde(default = "default_root")]
    pub root: String,

    /// Prefix turning bucket ids into bucket IRIs
    #[serde(default)]
    pub bucket_base: String,
}

impl Default for BucketizerOptions {
    fn default() -> Self {
        Self {
            bucket_property: default_bucket_property(),
            page_size: None,
            property_path: None,
            root: default_root(),
            bucket_base: String::new(),
        }
    }
}

impl BucketizerOptions {
    /// Options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bucket property IRI
    pub fn with_bucket_property(mut self, iri: impl Into<String>) -> Self {
        self.bucket_property = iri.into();
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the property path
    pub fn with_property_path(mut self, path: impl Into<PathInput>) -> Self {
        self.property_path = Some(path.into());
        self
    }

    /// Set the root bucket id
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the bucket IRI prefix
    pub fn with_bucket_base(mut self, base: impl Into<String>) -> Self {
        self.bucket_base = base.into();
        self
    }

    /// Fill in defaults that are announced in the log
    ///
    /// A missing page size becomes [`DEFAULT_PAGE_SIZE`] and an empty root
    /// becomes [`DEFAULT_ROOT`].
    pub fn resolve(mut self) -> Result<Self> {
        match self.page_size {
            Some(0) => return Err(BucketizerError::config("pageSize must be positive")),
            Some(_) => {}
            None => {
                warn!(
                    page_size = DEFAULT_PAGE_SIZE,
                    "no page size provided, using default"
                );
                self.page_size = Some(DEFAULT_PAGE_SIZE);
            }
        }
        if self.root.is_empty() {
            self.root = default_root();
        }
        Ok(self)
    }

    /// Configured page size, or the default
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_json() {
        let opts: BucketizerOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(opts, BucketizerOptions::default());
        assert_eq!(opts.bucket_property, sds::BUCKET);
        assert_eq!(opts.root, "root");

        let resolved = opts.resolve().unwrap();
        assert_eq!(resolved.page_size, Some(DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_path_input_forms() {
        let opts: BucketizerOptions = serde_json::from_value(json!({
            "propertyPath": "<http://example.org/p>",
            "pageSize": 3,
            "bucketBase": "http://example.org/buckets/"
        }))
        .unwrap();
        assert_eq!(opts.page_size(), 3);
        assert_eq!(opts.bucket_base, "http://example.org/buckets/");
        assert_eq!(
            opts.property_path.unwrap().to_path().unwrap().predicates(),
            &["http://example.org/p".to_string()]
        );

        let list: BucketizerOptions = serde_json::from_value(json!({
            "propertyPath": ["http://example.org/a", "http://example.org/b"]
        }))
        .unwrap();
        assert_eq!(list.property_path.unwrap().to_path().unwrap().len(), 2);
    }

    #[test]
    fn test_blank_path_is_config_error() {
        let err = PathInput::from("  ").to_path().unwrap_err();
        assert!(matches!(err, BucketizerError::Config(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = BucketizerOptions::new().with_page_size(0).resolve().unwrap_err();
        assert!(matches!(err, BucketizerError::Config(_)));
    }
}
