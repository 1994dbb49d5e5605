//! Partitioning strategies.

pub mod basic;
pub mod geospatial;
pub mod subject_page;
pub mod substring;

pub use basic::{BasicBucketizer, BasicStrategy};
pub use geospatial::{GeospatialBucketizer, GeospatialOptions, GeospatialStrategy};
pub use subject_page::{SubjectPageBucketizer, SubjectPageOptions, SubjectPageStrategy};
pub use substring::{SubstringBucketizer, SubstringStrategy};
