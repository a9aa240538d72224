//! Configuration for the backward pass.

use std::fmt;

/// How the backward pass orders the nodes it visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraversalOrder {
    /// Reverse postorder of a depth-first walk from the output.
    ///
    /// Every node comes before all of its parents, so each node has its full
    /// derivative when it is visited, whatever the shape of the DAG.
    #[default]
    Topological,
    /// Breadth-first discovery order from the output.
    ///
    /// Only exact when every path from the output to a shared ancestor has
    /// the same length. With unequal paths an ancestor can be visited
    /// before all contributions have reached it.
    BreadthFirst,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topological => f.write_str("topological"),
            Self::BreadthFirst => f.write_str("breadth-first"),
        }
    }
}

/// Settings for [`crate::backward::backpropagate_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackpropConfig {
    /// Node ordering used for the sweep
    pub order: TraversalOrder,
}

impl BackpropConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the traversal order.
    pub const fn with_order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }
}
