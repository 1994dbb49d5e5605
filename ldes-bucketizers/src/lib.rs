//! # LDES Bucketizers
//!
//! Concrete partitioning strategies on top of `ldes-bucketizer-core`:
//!
//! | Type | Strategy | Bucket ids |
//! |------|----------|------------|
//! | `basic` | [`BasicStrategy`] | `0`, `1`, ... |
//! | `subject` | [`SubjectPageStrategy`] | last path segment of the subject |
//! | `geospatial` | [`GeospatialStrategy`] | `{zoom}/{x}/{y}-{page}` |
//! | `substring` | [`SubstringStrategy`] | accreted prefix, words joined by `+` |
//! | `multi` | [`MultiBucketizer`] | `{parent}/{child}` |
//!
//! Bucketizers are usually built through a [`BucketizerRegistry`], either
//! from a JSON config or from a linked-data description:
//!
//! ```ignore
//! let registry = BucketizerRegistry::with_defaults();
//! let mut bucketizer = registry.build(
//!     "subject",
//!     json!({ "propertyPath": "<http://purl.org/dc/terms/isVersionOf>" }),
//!     None,
//! )?;
//! let statements = bucketizer.bucketize(&member_quads, &member_id)?;
//! ```

pub mod ld;
pub mod multi;
pub mod registry;
pub mod strategy;

pub use multi::{LevelState, MultiBucketizer, MultiOptions};
pub use registry::{BucketizerRegistry, TypedConfig};
pub use strategy::{
    BasicBucketizer, BasicStrategy, GeospatialBucketizer, GeospatialOptions, GeospatialStrategy,
    SubjectPageBucketizer, SubjectPageOptions, SubjectPageStrategy, SubstringBucketizer,
    SubstringStrategy,
};

pub use ldes_bucketizer_core::{
    Bucketize, Bucketizer, BucketizerError, BucketizerOptions, BucketizerState, Result,
};
