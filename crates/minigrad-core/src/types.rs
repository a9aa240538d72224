//! Type definitions shared by the autodiff crates.
//!
//! This module provides the node identity and classification types used
//! throughout the engine, and the scalar trait the operators are written
//! against.

use num_traits::Float;
use std::fmt::{self, Debug, Display};

/// Unique identifier for nodes in a computation graph.
///
/// Identifiers are handed out by whoever builds the graph and only need to be
/// unique and stable for the lifetime of that graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Creates an identifier from a raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index of this identifier.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node{}", self.0)
    }
}

/// The role a node plays during differentiation.
///
/// Every node is exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Input node with no parents; receives the accumulated derivative.
    Leaf,
    /// Result of an operation; forwards derivatives to its parents.
    Intermediate,
    /// Excluded from differentiation entirely.
    Constant,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Leaf => "leaf",
            Self::Intermediate => "intermediate",
            Self::Constant => "constant",
        };
        f.write_str(name)
    }
}

/// Trait for scalar types the operators work on (f32 or f64).
pub trait Scalar: Float + Display + Debug + 'static {
    /// Tolerance used by [`crate::operators::is_close`].
    const CLOSE_TOLERANCE: Self;

    /// Default step for central differences.
    const DIFFERENCE_EPSILON: Self;
}

impl Scalar for f32 {
    const CLOSE_TOLERANCE: Self = 1e-2;
    const DIFFERENCE_EPSILON: Self = 1e-3;
}

impl Scalar for f64 {
    const CLOSE_TOLERANCE: Self = 1e-2;
    const DIFFERENCE_EPSILON: Self = 1e-6;
}
