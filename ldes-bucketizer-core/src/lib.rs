//! # LDES Bucketizer Core
//!
//! The engine shared by all bucketizing strategies. A bucketizer receives the
//! statements of one stream member and returns new statements that place the
//! member in one or more buckets and link buckets to each other.
//!
//! - [`Bucketizer`] drives a [`BucketStrategy`]: property path extraction,
//!   fallback placement, and output of membership records and relations.
//! - [`BucketizerCore`] owns the [`RelationLedger`], the [`PropertyPath`] and
//!   the fallback (`bucketless-N`) pages.
//! - [`Bucketize`] is the object-safe surface used by registries and
//!   composite strategies.
//!
//! ## Example
//!
//! ```ignore
//! let mut bucketizer = Bucketizer::new(options, strategy)?;
//! let statements = bucketizer.bucketize(&member_quads, &member_id)?;
//! let snapshot = bucketizer.export_state()?;
//! ```

mod bucketizer;
mod engine;
pub mod error;
mod ledger;
pub mod normalize;
mod options;
mod path;
mod relation;
mod state;
mod strategy;

pub use bucketizer::{Bucketize, Bucketizer};
pub use engine::BucketizerCore;
pub use error::{BucketizerError, Result};
pub use ledger::RelationLedger;
pub use options::{BucketizerOptions, PathInput, DEFAULT_PAGE_SIZE, DEFAULT_ROOT};
pub use path::PropertyPath;
pub use relation::{NewRelation, Relation, RelationKind};
pub use state::BucketizerState;
pub use strategy::{BucketAssignment, BucketStrategy};
