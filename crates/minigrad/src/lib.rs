//! Minimal reverse-mode automatic differentiation.
//!
//! This crate re-exports the pieces of the workspace under one name:
//!
//! - [`base`]: error types, node identity, scalar operators and
//!   finite-difference checks
//! - [`autodiff`]: the `Variable` abstraction, traversal sorts, the
//!   backpropagation driver and an arena-backed scalar graph
//!
//! # Example
//!
//! ```
//! use minigrad::prelude::*;
//!
//! let graph = Graph::new();
//! let x = graph.leaf(3.0);
//! let f = x.mul(x)?.add(x)?;
//!
//! f.backward()?;
//! assert_eq!(x.derivative(), Some(7.0));
//! # Ok::<(), AutodiffError>(())
//! ```

pub use minigrad_autodiff as autodiff;
pub use minigrad_core as base;

pub use minigrad_autodiff::{backpropagate, backpropagate_with, Context, Graph, ScalarVar, Variable};
pub use minigrad_core::{AutodiffError, NodeId, NodeKind, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use minigrad_autodiff::prelude::*;
    pub use minigrad_core::prelude::*;
}
