//! Integration tests for geospatial tiling.

mod support;

use ldes_bucketizer_core::RelationKind;
use ldes_graph_ir::{Quad, Term};
use ldes_vocab::{geosparql, sds};
use serde_json::json;
use support::{build, edge, member, record_buckets, relation_edges, run};

const AS_WKT: &str = "http://www.opengis.net/ont/geosparql#asWKT";
const POINT_1_1: &str = "POINT(-149.41251025911623 80.58142160919965)";
const POINT_1_2: &str = "POINT(-148.79727588411623 77.06742539146222)";

fn config() -> serde_json::Value {
    json!({
        "propertyPath": format!("<{AS_WKT}>"),
        "pageSize": 2,
        "zoom": 4
    })
}

fn geo_member(id: &str, wkt: &str) -> (Term, Vec<Quad>) {
    member(id, AS_WKT, vec![Term::wkt(wkt)])
}

#[test]
fn same_tile_pages_by_page_size() {
    let mut b = build("geospatial", config());

    let first = run(b.as_mut(), &geo_member("m1", POINT_1_1));
    let second = run(b.as_mut(), &geo_member("m2", POINT_1_1));
    let third = run(b.as_mut(), &geo_member("m3", POINT_1_1));

    assert_eq!(record_buckets(&first), vec!["4/1/1-0"]);
    assert_eq!(record_buckets(&second), vec!["4/1/1-0"]);
    assert_eq!(record_buckets(&third), vec!["4/1/1-1"]);

    assert_eq!(
        relation_edges(&first),
        vec![edge("4/1", "4/1/1-0"), edge("root", "4/1")]
    );
    assert!(relation_edges(&second).is_empty());
    assert_eq!(relation_edges(&third), vec![edge("4/1", "4/1/1-1")]);
}

#[test]
fn relations_are_geospatial_with_wkt_values() {
    let mut b = build("geospatial", config());
    let out = run(b.as_mut(), &geo_member("m1", POINT_1_1));

    let types: Vec<_> = out
        .iter()
        .filter(|q| q.has_predicate(sds::RELATION_TYPE))
        .map(|q| q.o.clone())
        .collect();
    assert_eq!(types.len(), 2);
    assert!(types
        .iter()
        .all(|t| *t == Term::iri(RelationKind::GeospatiallyContains.iri())));

    let values: Vec<_> = out
        .iter()
        .filter(|q| q.has_predicate(sds::RELATION_VALUE))
        .collect();
    assert_eq!(values.len(), 2);
    for q in values {
        let (wkt, datatype, _) = q.o.as_literal().expect("literal value");
        assert_eq!(datatype.as_iri(), geosparql::WKT_LITERAL);
        assert!(wkt.starts_with("POLYGON"));
    }
}

#[test]
fn new_tile_in_known_column_reemits_grown_root_relation() {
    let mut b = build("geospatial", config());
    let first = run(b.as_mut(), &geo_member("m1", POINT_1_1));
    let second = run(b.as_mut(), &geo_member("m2", POINT_1_2));

    assert_eq!(record_buckets(&second), vec!["4/1/2-0"]);
    assert_eq!(
        relation_edges(&second),
        vec![edge("4/1", "4/1/2-0"), edge("root", "4/1")]
    );

    let root_value = |out: &[Quad]| -> Term {
        let rel = out
            .iter()
            .find(|q| q.has_predicate(sds::RELATION) && q.s == Term::iri("root"))
            .map(|q| q.o.clone())
            .expect("root relation");
        out.iter()
            .find(|q| q.s == rel && q.has_predicate(sds::RELATION_VALUE))
            .map(|q| q.o.clone())
            .expect("root relation value")
    };
    assert_ne!(root_value(&first), root_value(&second));
}

#[test]
fn geometry_spanning_tiles_lands_in_each() {
    let mut b = build("geospatial", config());
    let line = "LINESTRING(-149.41251025911623 80.58142160919965, -148.79727588411623 77.06742539146222)";
    let out = run(b.as_mut(), &geo_member("m1", line));
    assert_eq!(record_buckets(&out), vec!["4/1/1-0", "4/1/2-0"]);
}

#[test]
fn unsupported_literal_falls_back() {
    let mut b = build("geospatial", config());
    let out = run(
        b.as_mut(),
        &member("m1", AS_WKT, vec![Term::string("somewhere")]),
    );
    assert_eq!(record_buckets(&out), vec!["bucketless-0"]);
}

#[test]
fn failed_member_leaves_no_tile_behind() {
    let mut b = build("geospatial", config());
    let mixed = member(
        "m1",
        AS_WKT,
        vec![Term::wkt(POINT_1_1), Term::string("garbage")],
    );
    let out = run(b.as_mut(), &mixed);
    assert_eq!(record_buckets(&out), vec!["bucketless-0"]);
    assert_eq!(relation_edges(&out), vec![edge("root", "bucketless-0")]);

    let state = b.export_state().expect("export");
    assert!(state["tileMetadata"].as_object().is_some_and(|t| t.is_empty()));

    // the tile is created, linked and counted by the first member that lands in it
    let out = run(b.as_mut(), &geo_member("m2", POINT_1_1));
    assert_eq!(record_buckets(&out), vec!["4/1/1-0"]);
    assert_eq!(
        relation_edges(&out),
        vec![edge("4/1", "4/1/1-0"), edge("root", "4/1")]
    );
    let state = b.export_state().expect("export");
    assert_eq!(state["tileMetadata"]["4/1/1"]["memberCounter"], json!(1));
}

#[test]
fn missing_zoom_is_rejected() {
    let registry = ldes_bucketizers::BucketizerRegistry::with_defaults();
    let result = registry.build(
        "geospatial",
        json!({"propertyPath": format!("<{AS_WKT}>"), "pageSize": 2}),
        None,
    );
    assert!(result.is_err());
}

#[test]
fn state_roundtrip_continues_paging() {
    let mut original = build("geospatial", config());
    run(original.as_mut(), &geo_member("m1", POINT_1_1));
    run(original.as_mut(), &geo_member("m2", POINT_1_1));

    let state = original.export_state().expect("export");
    let mut restored = support::restore("geospatial", config(), state);

    let m3 = geo_member("m3", POINT_1_1);
    let a = run(original.as_mut(), &m3);
    let b = run(restored.as_mut(), &m3);
    assert_eq!(a, b);
    assert_eq!(record_buckets(&b), vec!["4/1/1-1"]);
}
