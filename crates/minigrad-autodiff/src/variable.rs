//! The capability set every differentiable graph node provides.
//!
//! The backward pass never looks inside a node. It only asks for the node's
//! identity, its role, its parents, and (for non-leaves) the per-parent
//! contributions of its chain rule. Whatever numeric layer builds the graph
//! implements [`Variable`] for its node handles.

use minigrad_core::{NodeId, NodeKind, Result};
use std::ops::Add;

/// A node of a computation graph, as seen by the backward pass.
///
/// Implementors are expected to be cheap handles (an index, a reference
/// counted pointer, ...): the traversal clones them freely.
pub trait Variable: Clone {
    /// The type of derivative flowing through this graph.
    type Derivative: Add<Output = Self::Derivative>;

    /// Identity of this node; unique and stable for the graph's lifetime.
    fn unique_id(&self) -> NodeId;

    /// Whether this node is a leaf, an intermediate result or a constant.
    fn kind(&self) -> NodeKind;

    /// True for nodes that receive an accumulated derivative.
    fn is_leaf(&self) -> bool {
        self.kind() == NodeKind::Leaf
    }

    /// True for nodes excluded from differentiation.
    fn is_constant(&self) -> bool {
        self.kind() == NodeKind::Constant
    }

    /// Direct predecessors of this node. Empty for leaves and constants.
    fn parents(&self) -> Vec<Self>;

    /// Maps the derivative flowing into this node to one contribution per
    /// parent.
    ///
    /// Fails with [`minigrad_core::AutodiffError::NotDifferentiable`] on
    /// leaves and constants.
    fn chain_rule(&self, d_output: &Self::Derivative) -> Result<Vec<(Self, Self::Derivative)>>;

    /// Adds `d` into this leaf's stored derivative.
    ///
    /// Fails with [`minigrad_core::AutodiffError::NotALeaf`] on any other
    /// kind of node.
    fn accumulate_derivative(&self, d: Self::Derivative) -> Result<()>;
}
