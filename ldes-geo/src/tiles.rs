//! Slippy-map tile math.
//!
//! Tiles follow the OSM/web-mercator scheme: at zoom `z` the world is split
//! into `2^z × 2^z` tiles, `x` growing eastwards from -180° and `y` growing
//! southwards from the northern mercator limit.

use crate::error::{GeoError, Result};
use crate::geometry::parse_wkt_literal;
use geo::CoordsIter;
use geo_types::{Geometry, LineString, Polygon};
use ldes_graph_ir::Term;
use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;
use wkt::ToWkt;

/// Tiles touched by a geometry: tile `x` → set of tile `y`.
pub type TileSet = BTreeMap<u32, BTreeSet<u32>>;

/// Latitude limit of the web-mercator projection.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Highest supported zoom level.
const MAX_ZOOM: u8 = 30;

/// Slippy-map tiling at a fixed zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlippyMap {
    zoom: u8,
}

impl SlippyMap {
    /// Create a tiling for the given zoom level.
    pub fn new(zoom: u8) -> Result<Self> {
        if zoom > MAX_ZOOM {
            return Err(GeoError::InvalidZoom(zoom));
        }
        Ok(Self { zoom })
    }

    /// Zoom level of this tiling.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    fn tiles_per_axis(&self) -> f64 {
        2f64.powi(i32::from(self.zoom))
    }

    fn clamp_tile(&self, raw: f64) -> u32 {
        let max = self.tiles_per_axis() - 1.0;
        raw.floor().clamp(0.0, max) as u32
    }

    /// Tile column containing a longitude.
    pub fn longitude_to_tile(&self, longitude: f64) -> u32 {
        self.clamp_tile((longitude + 180.0) / 360.0 * self.tiles_per_axis())
    }

    /// Tile row containing a latitude.
    ///
    /// Latitudes beyond the mercator limit land in the first/last row.
    pub fn latitude_to_tile(&self, latitude: f64) -> u32 {
        let lat = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let raw = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * self.tiles_per_axis();
        self.clamp_tile(raw)
    }

    /// Tiles touched by the vertices of a WKT literal.
    ///
    /// Only vertices are considered: a polygon spanning several tiles without
    /// a vertex inside one of them does not report that tile.
    pub fn calculate_tiles(&self, term: &Term) -> Result<TileSet> {
        let geometry = parse_wkt_literal(term)?;
        Ok(self.tiles_for_geometry(&geometry))
    }

    /// Tiles touched by the vertices of a parsed geometry.
    pub fn tiles_for_geometry(&self, geometry: &Geometry<f64>) -> TileSet {
        let mut tiles = TileSet::new();
        for coord in geometry.coords_iter() {
            let x = self.longitude_to_tile(coord.x);
            let y = self.latitude_to_tile(coord.y);
            tiles.entry(x).or_default().insert(y);
        }
        tiles
    }

    fn tile_to_longitude(&self, x: u32) -> f64 {
        f64::from(x) / self.tiles_per_axis() * 360.0 - 180.0
    }

    fn tile_to_latitude(&self, y: u32) -> f64 {
        let n = PI * (1.0 - 2.0 * f64::from(y) / self.tiles_per_axis());
        n.sinh().atan().to_degrees()
    }

    /// Bounding polygon of tile `(x, y)`.
    ///
    /// Ring order is west-south, east-south, east-north, west-north.
    pub fn tile_bounding_box(&self, x: u32, y: u32) -> Polygon<f64> {
        let west = self.tile_to_longitude(x);
        let east = self.tile_to_longitude(x + 1);
        let north = self.tile_to_latitude(y);
        let south = self.tile_to_latitude(y + 1);

        Polygon::new(
            LineString::from(vec![
                (west, south),
                (east, south),
                (east, north),
                (west, north),
                (west, south),
            ]),
            vec![],
        )
    }

    /// Bounding polygon of tile `(x, y)` as WKT.
    pub fn tile_bounding_box_wkt(&self, x: u32, y: u32) -> String {
        self.tile_bounding_box(x, y).wkt_string()
    }
}

pub(crate) fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        _ => "Geometry", // Line, Rect, Triangle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{merge_polygons, parse_wkt};
    use geo::BoundingRect;

    #[test]
    fn test_point_tiles() {
        let map = SlippyMap::new(4).unwrap();
        let tiles = map
            .calculate_tiles(&Term::wkt("POINT(-149.41251025911623 80.58142160919965)"))
            .unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[&1], BTreeSet::from([1]));

        let tiles = map
            .calculate_tiles(&Term::wkt("POINT(-148.79727588411623 77.06742539146222)"))
            .unwrap();
        assert_eq!(tiles[&1], BTreeSet::from([2]));
    }

    #[test]
    fn test_multipolygon_vertices_are_flattened() {
        let map = SlippyMap::new(4).unwrap();
        let tiles = map
            .calculate_tiles(&Term::wkt(
                "MULTIPOLYGON (((40 40, 20 45, 45 30, 40 40)), ((20 35, 45 20, 30 5, 10 10, 10 30, 20 35), (30 20, 20 25, 20 15, 30 20)))",
            ))
            .unwrap();
        assert!(!tiles.is_empty());
        // lon 10..=45 at zoom 4 spans columns 8..=10
        assert!(tiles.keys().all(|x| (8..=10).contains(x)));
        assert!(tiles.contains_key(&10));
    }

    #[test]
    fn test_extreme_coordinates_are_clamped() {
        let map = SlippyMap::new(2).unwrap();
        assert_eq!(map.longitude_to_tile(180.0), 3);
        assert_eq!(map.longitude_to_tile(-180.0), 0);
        assert_eq!(map.latitude_to_tile(90.0), 0);
        assert_eq!(map.latitude_to_tile(-90.0), 3);
    }

    #[test]
    fn test_invalid_zoom() {
        assert!(matches!(SlippyMap::new(31), Err(GeoError::InvalidZoom(31))));
    }

    #[test]
    fn test_tile_bounding_box() {
        let map = SlippyMap::new(1).unwrap();
        let bbox = map.tile_bounding_box(0, 0).bounding_rect().unwrap();
        assert_eq!(bbox.min().x, -180.0);
        assert_eq!(bbox.max().x, 0.0);
        assert_eq!(bbox.min().y, 0.0);
        assert!((bbox.max().y - MAX_LATITUDE).abs() < 1e-9);

        let wkt = map.tile_bounding_box_wkt(0, 0);
        assert!(wkt.starts_with("POLYGON"));
        assert!(matches!(parse_wkt(&wkt).unwrap(), Geometry::Polygon(_)));
    }

    #[test]
    fn test_merge_adjacent_tiles() {
        let map = SlippyMap::new(4).unwrap();
        let upper = map.tile_bounding_box_wkt(1, 1);
        let lower = map.tile_bounding_box_wkt(1, 2);

        let merged = merge_polygons(&upper, &lower).unwrap();
        let rect = parse_wkt(&merged).unwrap().bounding_rect().unwrap();

        let expected_north = map.tile_bounding_box(1, 1).bounding_rect().unwrap().max().y;
        let expected_south = map.tile_bounding_box(1, 2).bounding_rect().unwrap().min().y;
        // boolean ops snap to an internal integer grid
        assert!((rect.max().y - expected_north).abs() < 1e-4);
        assert!((rect.min().y - expected_south).abs() < 1e-4);
    }
}
