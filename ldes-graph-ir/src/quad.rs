//! RDF quad: a triple plus an optional graph name

use crate::Term;
use serde::{Deserialize, Serialize};

/// An RDF statement
///
/// `g` is `None` for the default graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quad {
    /// Subject
    pub s: Term,
    /// Predicate
    pub p: Term,
    /// Object
    pub o: Term,
    /// Graph name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<Term>,
}

impl Quad {
    /// Create a quad in the default graph
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o, g: None }
    }

    /// Create a quad in a named graph
    pub fn in_graph(s: Term, p: Term, o: Term, g: Term) -> Self {
        Self {
            s,
            p,
            o,
            g: Some(g),
        }
    }

    /// Check whether the predicate is the given IRI
    pub fn has_predicate(&self, iri: &str) -> bool {
        self.p.as_iri() == Some(iri)
    }

    /// Same quad with subject and object passed through `f`
    ///
    /// Predicates and graph names are left untouched.
    pub fn map_nodes(&self, mut f: impl FnMut(&Term) -> Term) -> Quad {
        Quad {
            s: f(&self.s),
            p: self.p.clone(),
            o: f(&self.o),
            g: self.g.clone(),
        }
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.g {
            Some(g) => write!(f, "{} {} {} {} .", self.s, self.p, self.o, g),
            None => write!(f, "{} {} {} .", self.s, self.p, self.o),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nquads() {
        let q = Quad::new(Term::blank("r0"), Term::iri("p"), Term::string("v"));
        assert_eq!(q.to_string(), "_:r0 <p> \"v\" .");

        let q = Quad::in_graph(Term::iri("s"), Term::iri("p"), Term::iri("o"), Term::iri("g"));
        assert_eq!(q.to_string(), "<s> <p> <o> <g> .");
    }

    #[test]
    fn test_map_nodes_keeps_predicate() {
        let q = Quad::new(Term::iri("a"), Term::iri("a"), Term::iri("a"));
        let mapped = q.map_nodes(|t| t.prefixed("x/"));
        assert_eq!(mapped.s, Term::iri("x/a"));
        assert_eq!(mapped.p, Term::iri("a"));
        assert_eq!(mapped.o, Term::iri("x/a"));
        assert!(mapped.has_predicate("a"));
    }
}
