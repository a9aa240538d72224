//! Reverse-mode automatic differentiation.
//!
//! This crate provides a minimal backpropagation engine: given the output of
//! a computation graph and a seed derivative, it delivers to every reachable
//! leaf the exact derivative of the output with respect to that leaf, in one
//! backward sweep.
//!
//! # Architecture
//!
//! The engine is built around four pieces:
//!
//! 1. **Variable**: The capability set a graph node exposes to the engine
//! 2. **Context**: Per-operation storage for forward values needed backward
//! 3. **Sort**: Orders reachable nodes so each is complete before it is visited
//! 4. **Backward**: Sums contributions per node and hands leaves their totals
//!
//! [`graph::Graph`] is a small arena-backed scalar graph implementing
//! [`Variable`], with the scalar functions from [`functions`].
//!
//! # Example
//!
//! ```
//! use minigrad_autodiff::prelude::*;
//!
//! let graph = Graph::new();
//! let a = graph.leaf(2.0);
//! let b = graph.leaf(3.0);
//! let y = a.add(b)?.mul(a)?;
//!
//! backpropagate(&y, 1.0)?;
//! assert_eq!(a.derivative(), Some(7.0));
//! assert_eq!(b.derivative(), Some(2.0));
//! # Ok::<(), minigrad_core::AutodiffError>(())
//! ```

pub mod backward;
pub mod config;
pub mod context;
pub mod functions;
pub mod graph;
pub mod sort;
pub mod variable;

// Re-export key types
pub use backward::{backpropagate, backpropagate_with, DerivativeMap};
pub use config::{BackpropConfig, TraversalOrder};
pub use context::Context;
pub use functions::ScalarFunction;
pub use graph::{Graph, ScalarVar};
pub use sort::{breadth_first_sort, sort_with, topological_sort};
pub use variable::Variable;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::backward::{backpropagate, backpropagate_with};
    pub use crate::config::{BackpropConfig, TraversalOrder};
    pub use crate::context::Context;
    pub use crate::functions::ScalarFunction;
    pub use crate::graph::{Graph, ScalarVar};
    pub use crate::sort::{breadth_first_sort, topological_sort};
    pub use crate::variable::Variable;
}
