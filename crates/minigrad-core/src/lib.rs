//! Core types for the minigrad autodiff engine.
//!
//! This crate holds everything the backward pass relies on that is not the
//! backward pass itself: the error taxonomy, node identity and
//! classification, the elementary scalar operators used by derivative
//! formulas, and a finite-difference oracle for checking them.
//!
//! # Modules
//!
//! - [`error`]: Error types shared by the workspace
//! - [`types`]: Node identifiers, node kinds and the scalar trait
//! - [`operators`]: Scalar math, derivative helpers and list combinators
//! - [`numerical`]: Central-difference derivative estimates

pub mod error;
pub mod numerical;
pub mod operators;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{AutodiffError, Result};
pub use numerical::{central_difference, central_difference_with_epsilon};
pub use types::{NodeId, NodeKind, Scalar};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{AutodiffError, Result};
    pub use crate::numerical::{central_difference, central_difference_with_epsilon};
    pub use crate::operators;
    pub use crate::types::{NodeId, NodeKind, Scalar};
}
