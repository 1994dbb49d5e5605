//! WKT literal parsing and polygon union.
//!
//! Geometry literals arrive as `geo:wktLiteral` terms, optionally prefixed
//! with a CRS IRI (`<http://...> POINT(1 2)`). The CRS prefix is stripped and
//! coordinates are interpreted as lon/lat.

use crate::error::{GeoError, Result};
use geo::BooleanOps;
use geo_types::{Geometry, MultiPolygon};
use ldes_graph_ir::Term;
use wkt::ToWkt;

/// Parse a WKT string into a geo-types geometry.
pub fn parse_wkt(wkt: &str) -> Result<Geometry<f64>> {
    use std::str::FromStr;
    let parsed = wkt::Wkt::<f64>::from_str(wkt)
        .map_err(|e| GeoError::WktParse(format!("{:?}", e)))?;
    Geometry::<f64>::try_from(parsed).map_err(|e| GeoError::WktParse(format!("{:?}", e)))
}

/// Parse a `geo:wktLiteral` term.
///
/// Any other datatype (GML, GeoJSON, plain strings) is rejected.
pub fn parse_wkt_literal(term: &Term) -> Result<Geometry<f64>> {
    let (value, datatype, _) = term
        .as_literal()
        .ok_or_else(|| GeoError::NotALiteral(term.to_string()))?;

    if !datatype.is_wkt() {
        return Err(GeoError::UnsupportedDatatype(datatype.to_string()));
    }

    parse_wkt(strip_crs(value))
}

fn strip_crs(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.starts_with('<') {
        if let Some(end) = trimmed.find('>') {
            return trimmed[end + 1..].trim();
        }
    }
    trimmed
}

fn to_multi_polygon(geometry: Geometry<f64>) -> Result<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p])),
        Geometry::MultiPolygon(mp) => Ok(mp),
        Geometry::Rect(r) => Ok(MultiPolygon::new(vec![r.to_polygon()])),
        other => Err(GeoError::UnsupportedGeometry(format!(
            "cannot merge {}",
            crate::tiles::geometry_kind(&other)
        ))),
    }
}

/// Union of two (multi)polygon WKT strings, as WKT.
///
/// A union that dissolves into a single polygon is written as `POLYGON`,
/// anything else as `MULTIPOLYGON`.
pub fn merge_polygons(wkt_a: &str, wkt_b: &str) -> Result<String> {
    let a = to_multi_polygon(parse_wkt(strip_crs(wkt_a))?)?;
    let b = to_multi_polygon(parse_wkt(strip_crs(wkt_b))?)?;

    let merged = a.union(&b);
    match merged.0.as_slice() {
        [single] => Ok(single.wkt_string()),
        _ => Ok(merged.wkt_string()),
    }
}
