//! Property paths restricted to predicate sequences
//!
//! A path `[p1, .., pn]` is followed from the member node: each step collects
//! the objects of statements whose subject is in the current node set and
//! whose predicate is the step's IRI.
//!
//! Accepted expression forms:
//! - `<iri>` - single predicate
//! - `(<a> <b> ...)` - RDF list syntax
//! - `<a>/<b>` - SPARQL sequence path syntax
//! - `()` - empty sequence (the member itself)

use crate::error::{BucketizerError, Result};
use ldes_graph_ir::{Quad, Term};
use ldes_vocab::rdf;
use rustc_hash::FxHashSet;

/// Sequence of predicate IRIs
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PropertyPath {
    predicates: Vec<String>,
}

impl PropertyPath {
    /// Parse a path expression
    pub fn parse(expr: &str) -> Result<Self> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(BucketizerError::PropertyPath("empty expression".into()));
        }

        let body = match trimmed.strip_prefix('(') {
            Some(rest) => rest.strip_suffix(')').ok_or_else(|| {
                BucketizerError::PropertyPath(format!("unterminated list in '{trimmed}'"))
            })?,
            None => trimmed,
        };

        let mut predicates = Vec::new();
        let mut rest = body.trim_start();
        while !rest.is_empty() {
            let inner = rest.strip_prefix('<').ok_or_else(|| {
                BucketizerError::PropertyPath(format!("expected '<' at '{rest}'"))
            })?;
            let end = inner.find('>').ok_or_else(|| {
                BucketizerError::PropertyPath(format!("unterminated IRI in '{trimmed}'"))
            })?;
            let iri = &inner[..end];
            if iri.is_empty() || iri.contains(char::is_whitespace) {
                return Err(BucketizerError::PropertyPath(format!("invalid IRI <{iri}>")));
            }
            predicates.push(iri.to_string());

            rest = inner[end + 1..].trim_start();
            if let Some(after) = rest.strip_prefix('/') {
                rest = after.trim_start();
                if rest.is_empty() {
                    return Err(BucketizerError::PropertyPath(format!(
                        "dangling '/' in '{trimmed}'"
                    )));
                }
            }
        }

        // "()" is the only expression allowed to be empty
        if predicates.is_empty() && body.len() == trimmed.len() {
            return Err(BucketizerError::PropertyPath(format!("no predicates in '{trimmed}'")));
        }

        Ok(Self { predicates })
    }

    /// Build from predicate IRIs
    pub fn from_predicates<I, S>(predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            predicates: predicates.into_iter().map(Into::into).collect(),
        }
    }

    /// Predicate IRIs in order
    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True for the empty sequence
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Nodes reached by following the path from `member`
    ///
    /// Results are deduplicated and keep first-seen order.
    pub fn evaluate(&self, quads: &[Quad], member: &Term) -> Vec<Term> {
        let mut current = vec![member.clone()];

        for predicate in &self.predicates {
            let next = {
                let subjects: FxHashSet<&Term> = current.iter().collect();
                let mut seen = FxHashSet::default();
                let mut next = Vec::new();
                for quad in quads {
                    if quad.has_predicate(predicate)
                        && subjects.contains(&quad.s)
                        && seen.insert(&quad.o)
                    {
                        next.push(quad.o.clone());
                    }
                }
                next
            };
            if next.is_empty() {
                return Vec::new();
            }
            current = next;
        }

        current
    }

    /// Term used as `sds:relationPath`
    ///
    /// The predicate IRI itself for a one-step path, otherwise the head of the
    /// RDF list produced by [`to_quads`](Self::to_quads).
    pub fn node(&self) -> Term {
        match self.predicates.as_slice() {
            [single] => Term::iri(single),
            [] => Term::iri(rdf::NIL),
            _ => Term::blank(list_label(0)),
        }
    }

    /// RDF list statements describing a multi-step path
    ///
    /// Empty for one-step and empty paths.
    pub fn to_quads(&self) -> Vec<Quad> {
        if self.predicates.len() < 2 {
            return Vec::new();
        }

        let last = self.predicates.len() - 1;
        let mut quads = Vec::with_capacity(self.predicates.len() * 2);
        for (i, predicate) in self.predicates.iter().enumerate() {
            let cell = Term::blank(list_label(i));
            quads.push(Quad::new(cell.clone(), Term::iri(rdf::FIRST), Term::iri(predicate)));
            let rest = if i == last {
                Term::iri(rdf::NIL)
            } else {
                Term::blank(list_label(i + 1))
            };
            quads.push(Quad::new(cell, Term::iri(rdf::REST), rest));
        }
        quads
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.predicates.as_slice() {
            [single] => write!(f, "<{single}>"),
            preds => {
                write!(f, "(")?;
                for (i, p) in preds.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "<{p}>")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn list_label(i: usize) -> String {
    format!("path-{i}")
}
