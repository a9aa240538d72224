//! Error types for the autodiff engine.
//!
//! Every fault in this workspace is a programming-logic fault: a malformed
//! graph, a broken ordering, or a capability used on the wrong kind of node.
//! None of them are recoverable inside a backward pass, so they surface as
//! `Err` and abort the call that hit them.

use crate::types::{NodeId, NodeKind};
use thiserror::Error;

/// Errors that can occur while building or differentiating a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutodiffError {
    /// A reduction was asked to combine zero elements.
    #[error("Cannot reduce an empty sequence")]
    EmptyReduction,

    /// A node was visited during backpropagation without any derivative.
    ///
    /// This means the ordering or the graph construction is broken: every
    /// visited node must have received at least one contribution.
    #[error("No derivative accumulated for {id} when it was visited")]
    MissingDerivative {
        /// Node that had no entry
        id: NodeId,
    },

    /// `accumulate_derivative` was called on a node that is not a leaf.
    #[error("Cannot accumulate a derivative into {id}: it is not a leaf")]
    NotALeaf {
        /// Offending node
        id: NodeId,
    },

    /// `chain_rule` was called on a leaf or a constant.
    #[error("Cannot apply the chain rule on {id}: it is a {kind}")]
    NotDifferentiable {
        /// Offending node
        id: NodeId,
        /// What the node actually is
        kind: NodeKind,
    },

    /// A node handle does not belong to the graph it was used with.
    #[error("Unknown node {id}")]
    UnknownNode {
        /// Identifier that could not be resolved
        id: NodeId,
    },

    /// A function received or produced the wrong number of values.
    #[error("{function} expects {expected} values, got {actual}")]
    ArityMismatch {
        /// Name of the function
        function: String,
        /// Number of values expected
        expected: usize,
        /// Number of values received
        actual: usize,
    },

    /// A backward rule found fewer saved values than it needs.
    ///
    /// Happens when the forward pass ran with gradients disabled, so its
    /// context never stored anything.
    #[error("{function} needs {expected} saved values, found {actual}")]
    MissingSavedValues {
        /// Name of the function
        function: String,
        /// Number of values the backward rule reads
        expected: usize,
        /// Number of values actually saved
        actual: usize,
    },
}

impl AutodiffError {
    /// Create a MissingDerivative error.
    pub const fn missing_derivative(id: NodeId) -> Self {
        Self::MissingDerivative { id }
    }

    /// Create a NotALeaf error.
    pub const fn not_a_leaf(id: NodeId) -> Self {
        Self::NotALeaf { id }
    }

    /// Create a NotDifferentiable error.
    pub const fn not_differentiable(id: NodeId, kind: NodeKind) -> Self {
        Self::NotDifferentiable { id, kind }
    }

    /// Create an UnknownNode error.
    pub const fn unknown_node(id: NodeId) -> Self {
        Self::UnknownNode { id }
    }

    /// Create an ArityMismatch error.
    pub fn arity_mismatch<S: Into<String>>(function: S, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            function: function.into(),
            expected,
            actual,
        }
    }

    /// Create a MissingSavedValues error.
    pub fn missing_saved_values<S: Into<String>>(function: S, expected: usize, actual: usize) -> Self {
        Self::MissingSavedValues {
            function: function.into(),
            expected,
            actual,
        }
    }
}

/// Result type alias for autodiff operations.
pub type Result<T> = std::result::Result<T, AutodiffError>;
