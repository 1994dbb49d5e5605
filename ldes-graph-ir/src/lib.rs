//! Minimal RDF term and quad model
//!
//! Bucketizers only need to compare terms, read their lexical values and
//! emit new statements, so this crate keeps the model deliberately small:
//!
//! 1. **Expanded IRIs only** - `Term::Iri` never holds a prefixed name.
//! 2. **Explicit datatypes** - every literal carries a datatype; plain strings
//!    use `xsd:string`, language-tagged strings use `rdf:langString`.
//! 3. **Lexical literals** - literal values are stored in lexical form, the
//!    only form the partitioning algorithms look at.
//! 4. **Serializable** - terms and quads derive serde traits so bucketizer
//!    state snapshots can embed them directly.
//!
//! # Example
//!
//! ```
//! use ldes_graph_ir::{Quad, Term};
//!
//! let quad = Quad::new(
//!     Term::iri("http://example.org/alice"),
//!     Term::iri("http://xmlns.com/foaf/0.1/name"),
//!     Term::string("Alice"),
//! );
//! assert_eq!(quad.o.value(), "Alice");
//! ```

pub mod datatype;
mod quad;
mod term;

pub use datatype::Datatype;
pub use quad::Quad;
pub use term::{BlankId, Term};
