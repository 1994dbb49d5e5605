//! Shared helpers for ldes-bucketizers integration tests.

// Each test crate uses a different subset of these helpers.
#![allow(dead_code)]

use ldes_bucketizers::{Bucketize, BucketizerRegistry};
use ldes_graph_ir::{Quad, Term};
use ldes_vocab::sds;
use serde_json::Value as JsonValue;

pub const EX: &str = "http://example.org/";

pub fn ex(local: &str) -> String {
    format!("{EX}{local}")
}

/// Member `ex:{id}` with one statement per object
pub fn member(id: &str, predicate: &str, objects: Vec<Term>) -> (Term, Vec<Quad>) {
    let m = Term::iri(ex(id));
    let quads = objects
        .into_iter()
        .map(|o| Quad::new(m.clone(), Term::iri(predicate), o))
        .collect();
    (m, quads)
}

pub fn build(kind: &str, config: JsonValue) -> Box<dyn Bucketize> {
    BucketizerRegistry::with_defaults()
        .build(kind, config, None)
        .expect("build bucketizer")
}

pub fn restore(kind: &str, config: JsonValue, state: JsonValue) -> Box<dyn Bucketize> {
    BucketizerRegistry::with_defaults()
        .build(kind, config, Some(state))
        .expect("restore bucketizer")
}

pub fn run(b: &mut dyn Bucketize, member: &(Term, Vec<Quad>)) -> Vec<Quad> {
    b.bucketize(&member.1, &member.0).expect("bucketize")
}

/// Buckets the membership record points at
pub fn record_buckets(out: &[Quad]) -> Vec<String> {
    out.iter()
        .filter(|q| q.has_predicate(sds::BUCKET))
        .map(|q| q.o.value().to_string())
        .collect()
}

/// `(from, to)` for every relation in the output
pub fn relation_edges(out: &[Quad]) -> Vec<(String, String)> {
    out.iter()
        .filter(|q| q.has_predicate(sds::RELATION))
        .filter_map(|q| {
            out.iter()
                .find(|r| r.s == q.o && r.has_predicate(sds::RELATION_BUCKET))
                .map(|r| (q.s.value().to_string(), r.o.value().to_string()))
        })
        .collect()
}

pub fn edge(from: &str, to: &str) -> (String, String) {
    (from.to_string(), to.to_string())
}

pub fn count_predicate(out: &[Quad], predicate: &str) -> usize {
    out.iter().filter(|q| q.has_predicate(predicate)).count()
}
