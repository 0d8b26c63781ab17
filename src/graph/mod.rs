//! Directed-graph utilities used by the resolver.
//!
//! The only consumer today is cycle-breaking: when every pending visit is
//! waiting on another, the resolver builds an actor → target graph from the
//! active roleblocks and asks which players sit on a cycle.

mod cycles;

pub use cycles::{nodes_in_cycles, Graph};
