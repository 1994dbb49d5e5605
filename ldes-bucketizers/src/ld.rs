//! Reading bucketizer configuration from linked data.
//!
//! A strategy description is a node typed `ldes:BucketizeStrategy`:
//!
//! ```text
//! <#fragmentation> a ldes:BucketizeStrategy ;
//!     ldes:bucketType ldes:subject ;
//!     tree:path ( <http://example.org/a> <http://example.org/b> ) ;
//!     ldes:pageSize 50 .
//! ```
//!
//! The functions here turn such a node into the same camelCase JSON object
//! accepted by the strategy option structs.

use ldes_bucketizer_core::{BucketizerError, Result};
use ldes_graph_ir::{Quad, Term};
use ldes_vocab::{ldes, rdf, tree};
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

/// First object of `subject predicate ?o`
pub fn find_object<'a>(quads: &'a [Quad], subject: &Term, predicate: &str) -> Option<&'a Term> {
    quads
        .iter()
        .find(|q| q.s == *subject && q.has_predicate(predicate))
        .map(|q| &q.o)
}

/// Members of the RDF list starting at `head`
pub fn read_list(quads: &[Quad], head: &Term) -> Result<Vec<Term>> {
    let mut items = Vec::new();
    let mut seen = FxHashSet::default();
    let mut current = head;

    while current.as_iri() != Some(rdf::NIL) {
        if !seen.insert(current) {
            return Err(BucketizerError::config(format!("cyclic RDF list at {current}")));
        }
        let first = find_object(quads, current, rdf::FIRST).ok_or_else(|| {
            BucketizerError::config(format!("RDF list node {current} has no rdf:first"))
        })?;
        items.push(first.clone());
        current = find_object(quads, current, rdf::REST).ok_or_else(|| {
            BucketizerError::config(format!("RDF list node {current} has no rdf:rest"))
        })?;
    }

    Ok(items)
}

/// Strategy type named by `ldes:bucketType`
///
/// IRIs in the LDES namespace are reduced to their local name.
pub fn bucket_type(quads: &[Quad], subject: &Term) -> Result<String> {
    let term = find_object(quads, subject, ldes::BUCKET_TYPE).ok_or_else(|| {
        BucketizerError::config(format!("{subject} has no ldes:bucketType"))
    })?;
    Ok(ldes::local_name(term.value()).to_string())
}

fn parse_number<T: std::str::FromStr>(term: &Term, key: &str) -> Result<T> {
    term.value()
        .trim()
        .parse()
        .map_err(|_| BucketizerError::config(format!("{key} must be a number, found {term}")))
}

fn read_path(quads: &[Quad], term: &Term) -> Result<Value> {
    match term {
        Term::Literal { value, .. } => Ok(Value::String(value.to_string())),
        Term::Iri(iri) => Ok(Value::Array(vec![Value::String(iri.to_string())])),
        Term::BlankNode(_) => {
            let predicates = read_list(quads, term)?
                .into_iter()
                .map(|t| match t.as_iri() {
                    Some(iri) => Ok(Value::String(iri.to_string())),
                    None => Err(BucketizerError::config(format!(
                        "tree:path list may only hold predicate IRIs, found {t}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(predicates))
        }
    }
}

/// Engine and strategy options described on `subject`
///
/// Absent properties are left out so the option structs apply their
/// defaults.
pub fn read_options(quads: &[Quad], subject: &Term) -> Result<Map<String, Value>> {
    let mut config = Map::new();

    if let Some(t) = find_object(quads, subject, ldes::BUCKET_PROPERTY) {
        config.insert("bucketProperty".into(), t.value().into());
    }
    if let Some(t) = find_object(quads, subject, ldes::PAGE_SIZE) {
        config.insert("pageSize".into(), parse_number::<u64>(t, "ldes:pageSize")?.into());
    }
    if let Some(t) = find_object(quads, subject, tree::PATH) {
        config.insert("propertyPath".into(), read_path(quads, t)?);
    }
    if let Some(t) = find_object(quads, subject, ldes::ROOT) {
        config.insert("root".into(), t.value().into());
    }
    if let Some(t) = find_object(quads, subject, ldes::BUCKET_BASE) {
        config.insert("bucketBase".into(), t.value().into());
    }
    if let Some(t) = find_object(quads, subject, ldes::ZOOM) {
        config.insert("zoom".into(), parse_number::<u8>(t, "ldes:zoom")?.into());
    }
    if let Some(t) = find_object(quads, subject, ldes::MAX_RELATIONS) {
        config.insert(
            "maxRelations".into(),
            parse_number::<u64>(t, "ldes:maxRelations")?.into(),
        );
    }

    Ok(config)
}

/// Nested strategy nodes listed by `ldes:configs`
pub fn read_configs(quads: &[Quad], subject: &Term) -> Result<Vec<Term>> {
    match find_object(quads, subject, ldes::CONFIGS) {
        Some(head) => read_list(quads, head),
        None => Ok(Vec::new()),
    }
}
