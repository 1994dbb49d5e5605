//! Geospatial tiling.
//!
//! Geometries are placed in every slippy-map tile one of their vertices falls
//! in. The bucket hierarchy is `root` → column `{zoom}/{x}` → leaf page
//! `{zoom}/{x}/{y}-{page}`; each leaf tile is paged by `pageSize`. All
//! relations are `GeospatiallyContains` relations whose value is the bounding
//! polygon of the target. A column's polygon grows (by union) as new tiles
//! in that column are discovered.
//!
//! A grown `root → column` relation is emitted again under a fresh relation
//! node; earlier statements for that relation are not retracted. Consumers
//! keep the last relation seen per `(root, column)` pair, which always
//! carries the union of every tile below it. The ledger holds only that
//! latest relation.

use ldes_bucketizer_core::{
    BucketAssignment, BucketStrategy, Bucketizer, BucketizerCore, BucketizerError,
    BucketizerOptions, NewRelation, Relation, RelationKind, Result,
};
use ldes_geo::{merge_polygons, GeoError, SlippyMap};
use ldes_graph_ir::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Bucketizer using [`GeospatialStrategy`]
pub type GeospatialBucketizer = Bucketizer<GeospatialStrategy>;

/// Geospatial configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeospatialOptions {
    #[serde(flatten)]
    pub base: BucketizerOptions,

    /// Slippy-map zoom level
    pub zoom: u8,
}

/// Paging state of one leaf tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMetadata {
    pub page_number: usize,
    pub member_counter: usize,
}

/// Exported state of [`GeospatialStrategy`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeospatialState {
    pub zoom: u8,
    pub tile_metadata: BTreeMap<String, TileMetadata>,
}

/// Tile paging counters
#[derive(Debug, Clone)]
pub struct GeospatialStrategy {
    map: SlippyMap,
    tile_metadata: BTreeMap<String, TileMetadata>,
}

fn geo_error(err: GeoError) -> BucketizerError {
    BucketizerError::strategy(err.to_string())
}

impl GeospatialStrategy {
    /// Create the strategy for a zoom level
    pub fn new(zoom: u8) -> Result<Self> {
        let map = SlippyMap::new(zoom).map_err(|e| BucketizerError::config(e.to_string()))?;
        Ok(Self {
            map,
            tile_metadata: BTreeMap::new(),
        })
    }

    /// Build a geospatial bucketizer
    pub fn bucketizer(options: GeospatialOptions) -> Result<GeospatialBucketizer> {
        Bucketizer::new(options.base, Self::new(options.zoom)?)
    }

    /// Paging state of a leaf tile (`{zoom}/{x}/{y}`)
    pub fn tile(&self, leaf: &str) -> Option<&TileMetadata> {
        self.tile_metadata.get(leaf)
    }

    fn contains(target: String, bbox: &Term, path: Option<&Term>) -> Relation {
        let relation =
            Relation::new(target, RelationKind::GeospatiallyContains).with_value(bbox.clone());
        match path {
            Some(path) => relation.with_path(path.clone()),
            None => relation,
        }
    }

    /// Link `root` to `column`, growing the column polygon if already linked
    fn link_column(
        core: &mut BucketizerCore,
        column: &str,
        bbox: &Term,
        path: Option<&Term>,
    ) -> Result<NewRelation> {
        let root = core.root().to_string();

        let updated = match core
            .hypermedia_controls_mut(&root, true)
            .and_then(|rels| rels.iter_mut().find(|r| r.node_id == column))
        {
            Some(existing) => {
                let merged = match existing.value.first() {
                    Some(polygon) => merge_polygons(polygon.value(), bbox.value()).map_err(geo_error)?,
                    None => bbox.value().to_string(),
                };
                existing.value = vec![Term::wkt(merged)];
                Some(existing.clone())
            }
            None => None,
        };

        Ok(match updated {
            Some(relation) => NewRelation::new(root, relation),
            None => core.relate(&root, Self::contains(column.to_string(), bbox, path)),
        })
    }
}

impl BucketStrategy for GeospatialStrategy {
    type State = GeospatialState;

    fn name(&self) -> &'static str {
        "geospatial"
    }

    fn init(&mut self, core: &mut BucketizerCore) -> Result<()> {
        let root = core.root().to_string();
        core.hypermedia_controls_mut(&root, true);
        Ok(())
    }

    fn create_buckets(
        &mut self,
        core: &mut BucketizerCore,
        values: &[Term],
    ) -> Result<BucketAssignment> {
        let mut assignment = BucketAssignment::new();
        let page_size = core.page_size();
        let path = core.path_node();
        let zoom = self.map.zoom();

        for value in values {
            let tiles = self.map.calculate_tiles(value).map_err(geo_error)?;

            for (x, ys) in tiles {
                let column = format!("{zoom}/{x}");
                for y in ys {
                    let leaf = format!("{column}/{y}");
                    let bbox = Term::wkt(self.map.tile_bounding_box_wkt(x, y));

                    if !self.tile_metadata.contains_key(&leaf) {
                        debug!(tile = %leaf, "new tile");
                        assignment.push_relation(
                            core.relate(&column, Self::contains(format!("{leaf}-0"), &bbox, path.as_ref())),
                        );
                        assignment.push_relation(Self::link_column(core, &column, &bbox, path.as_ref())?);
                    }

                    let meta = self.tile_metadata.entry(leaf.clone()).or_default();
                    let current = format!("{leaf}-{}", meta.page_number);
                    if meta.member_counter >= page_size && !assignment.buckets.contains(&current) {
                        meta.page_number += 1;
                        meta.member_counter = 0;
                        let page = format!("{leaf}-{}", meta.page_number);
                        debug!(tile = %leaf, page = %page, "tile page full");
                        assignment
                            .push_relation(core.relate(&column, Self::contains(page, &bbox, path.as_ref())));
                    }

                    let bucket = format!("{leaf}-{}", meta.page_number);
                    if !assignment.buckets.contains(&bucket) {
                        meta.member_counter += 1;
                        assignment.push_bucket(bucket);
                    }
                }
            }
        }

        Ok(assignment)
    }

    fn export_state(&self) -> GeospatialState {
        GeospatialState {
            zoom: self.map.zoom(),
            tile_metadata: self.tile_metadata.clone(),
        }
    }

    fn import_state(&mut self, state: GeospatialState) -> Result<()> {
        self.map = SlippyMap::new(state.zoom).map_err(|e| BucketizerError::state(e.to_string()))?;
        self.tile_metadata = state.tile_metadata;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT: &str = "POINT(-149.41251025911623 80.58142160919965)";

    fn setup(page_size: usize) -> (BucketizerCore, GeospatialStrategy) {
        let options = BucketizerOptions::new()
            .with_page_size(page_size)
            .with_property_path("<http://www.opengis.net/ont/geosparql#asWKT>");
        let mut core = BucketizerCore::new(options, true).unwrap();
        let mut strategy = GeospatialStrategy::new(4).unwrap();
        strategy.init(&mut core).unwrap();
        (core, strategy)
    }

    #[test]
    fn test_root_registered_at_init() {
        let (core, _) = setup(2);
        assert_eq!(core.hypermedia_controls("root"), Some(&[][..]));
    }

    #[test]
    fn test_first_tile_creates_column_and_root_relations() {
        let (mut core, mut strategy) = setup(2);
        let a = strategy.create_buckets(&mut core, &[Term::wkt(POINT)]).unwrap();

        assert_eq!(a.buckets, vec!["4/1/1-0"]);
        let edges: Vec<_> = a
            .relations
            .iter()
            .map(|r| (r.from.as_str(), r.relation.node_id.as_str()))
            .collect();
        assert_eq!(edges, vec![("4/1", "4/1/1-0"), ("root", "4/1")]);
        assert!(a.relations.iter().all(|r| {
            r.relation.kind == RelationKind::GeospatiallyContains && r.relation.path.is_some()
        }));
        assert_eq!(strategy.tile("4/1/1"), Some(&TileMetadata { page_number: 0, member_counter: 1 }));
    }

    #[test]
    fn test_second_tile_in_column_grows_root_polygon() {
        let (mut core, mut strategy) = setup(2);
        strategy.create_buckets(&mut core, &[Term::wkt(POINT)]).unwrap();
        let before = core.hypermedia_controls("root").unwrap()[0].value[0].clone();

        let a = strategy
            .create_buckets(&mut core, &[Term::wkt("POINT(-148.79727588411623 77.06742539146222)")])
            .unwrap();
        assert_eq!(a.buckets, vec!["4/1/2-0"]);

        let root = core.hypermedia_controls("root").unwrap();
        assert_eq!(root.len(), 1);
        assert_ne!(root[0].value[0], before);
        // the grown relation is reported again
        assert!(a.relations.iter().any(|r| r.from == "root" && r.relation.node_id == "4/1"));
    }

    #[test]
    fn test_unsupported_literal_is_error() {
        let (mut core, mut strategy) = setup(2);
        let err = strategy
            .create_buckets(&mut core, &[Term::string("not a geometry")])
            .unwrap_err();
        assert!(matches!(err, BucketizerError::Strategy(_)));
    }

    #[test]
    fn test_invalid_zoom_is_config_error() {
        assert!(matches!(
            GeospatialStrategy::new(40),
            Err(BucketizerError::Config(_))
        ));
    }
}
