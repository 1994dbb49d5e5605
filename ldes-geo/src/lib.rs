//! Geometry utilities for geospatial bucketizing.
//!
//! The geospatial bucketizer only needs three operations from this crate:
//!
//! - [`SlippyMap::calculate_tiles`]: which slippy-map tiles a WKT literal touches
//! - [`SlippyMap::tile_bounding_box_wkt`]: the bounding polygon of one tile
//! - [`merge_polygons`]: the union of two (multi)polygons, as WKT
//!
//! WKT parsing goes through the `wkt` crate, all geometry math through `geo`.
//!
//! # Modules
//!
//! - [`geometry`]: WKT literal parsing and polygon union
//! - [`tiles`]: slippy-map tile math
//! - [`error`]: Error types

pub mod error;
pub mod geometry;
pub mod tiles;

pub use error::{GeoError, Result};
pub use geometry::{merge_polygons, parse_wkt, parse_wkt_literal};
pub use tiles::{SlippyMap, TileSet};
