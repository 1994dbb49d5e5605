//! Integration tests for subject-page bucketizing.

mod support;

use ldes_bucketizer_core::RelationKind;
use ldes_graph_ir::{Quad, Term};
use ldes_vocab::sds;
use serde_json::json;
use support::{build, edge, ex, member, record_buckets, relation_edges, run};

fn subject_member(id: &str, subject: &str) -> (Term, Vec<Quad>) {
    member(id, &ex("isVersionOf"), vec![Term::iri(ex(subject))])
}

fn config() -> serde_json::Value {
    json!({"propertyPath": "<http://example.org/isVersionOf>", "pageSize": 10})
}

#[test]
fn same_subject_same_bucket() {
    let mut b = build("subject", config());

    let first = run(b.as_mut(), &subject_member("v1", "things/alice"));
    let other = run(b.as_mut(), &subject_member("v2", "things/bob"));
    let again = run(b.as_mut(), &subject_member("v3", "things/alice"));

    assert_eq!(record_buckets(&first), vec!["alice"]);
    assert_eq!(record_buckets(&other), vec!["bob"]);
    assert_eq!(record_buckets(&again), vec!["alice"]);

    assert_eq!(relation_edges(&first), vec![edge("root", "alice")]);
    assert_eq!(relation_edges(&other), vec![edge("root", "bob")]);
    assert!(relation_edges(&again).is_empty());
}

#[test]
fn subject_relation_carries_value_and_path() {
    let mut b = build("subject", config());
    let out = run(b.as_mut(), &subject_member("v1", "things/alice"));

    let has = |p: &str, o: &Term| out.iter().any(|q| q.has_predicate(p) && q.o == *o);
    assert!(has(sds::RELATION_TYPE, &Term::iri(RelationKind::EqualTo.iri())));
    assert!(has(sds::RELATION_VALUE, &Term::iri(ex("things/alice"))));
    assert!(has(sds::RELATION_PATH, &Term::iri(ex("isVersionOf"))));
    assert!(has(sds::IS_ROOT, &Term::boolean(true)));
}

#[test]
fn root_pages_roll_over() {
    let mut b = build(
        "subject",
        json!({
            "propertyPath": "<http://example.org/isVersionOf>",
            "pageSize": 10,
            "maxRelations": 2
        }),
    );

    run(b.as_mut(), &subject_member("v1", "a"));
    run(b.as_mut(), &subject_member("v2", "b"));
    let third = run(b.as_mut(), &subject_member("v3", "c"));
    let fourth = run(b.as_mut(), &subject_member("v4", "d"));

    assert_eq!(record_buckets(&third), vec!["c"]);
    assert_eq!(
        relation_edges(&third),
        vec![edge("root", "root-1"), edge("root-1", "c")]
    );
    assert!(third.iter().any(|q| {
        q.has_predicate(sds::IMMUTABLE) && q.s == Term::iri("root") && q.o == Term::boolean(true)
    }));

    assert_eq!(relation_edges(&fourth), vec![edge("root-1", "d")]);
    assert!(!fourth.iter().any(|q| q.has_predicate(sds::IMMUTABLE)));
}

#[test]
fn normalized_and_salted_ids() {
    let mut b = build(
        "subject",
        json!({
            "propertyPath": "<http://example.org/isVersionOf>",
            "pageSize": 10,
            "normalize": true,
            "salt": "s1"
        }),
    );
    let out = run(b.as_mut(), &subject_member("v1", "people/Jos\u{00E9}#Main"));
    assert_eq!(record_buckets(&out), vec!["jose-main-s1"]);
}

#[test]
fn multiple_values_fan_out() {
    let mut b = build("subject", config());
    let m = member(
        "v1",
        &ex("isVersionOf"),
        vec![Term::iri(ex("a")), Term::iri(ex("b")), Term::iri(ex("x/a"))],
    );
    let out = run(b.as_mut(), &m);
    assert_eq!(record_buckets(&out), vec!["a", "b"]);
    assert_eq!(relation_edges(&out).len(), 2);
}

#[test]
fn state_roundtrip_keeps_rollover_counters() {
    let config = json!({
        "propertyPath": "<http://example.org/isVersionOf>",
        "pageSize": 10,
        "maxRelations": 2,
        "randomSalt": true
    });
    let mut original = build("subject", config.clone());
    run(original.as_mut(), &subject_member("v1", "a"));
    run(original.as_mut(), &subject_member("v2", "b"));

    let state = original.export_state().expect("export");
    let mut restored = support::restore("subject", config, state.clone());
    assert_eq!(restored.export_state().expect("export"), state);

    for (id, subject) in [("v3", "c"), ("v4", "a"), ("v5", "d")] {
        let m = subject_member(id, subject);
        assert_eq!(run(original.as_mut(), &m), run(restored.as_mut(), &m));
    }
}
