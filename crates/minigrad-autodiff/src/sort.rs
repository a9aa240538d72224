//! Orderings of the nodes reachable from an output.
//!
//! Both orderings start at the output, skip constants, contain every other
//! reachable node exactly once, and never recurse, so deep graphs do not
//! exhaust the stack.

use crate::config::TraversalOrder;
use crate::variable::Variable;
use minigrad_core::NodeId;
use std::collections::HashSet;

/// Orders the graph behind `output` according to `order`.
pub fn sort_with<V: Variable>(output: &V, order: TraversalOrder) -> Vec<V> {
    match order {
        TraversalOrder::Topological => topological_sort(output),
        TraversalOrder::BreadthFirst => breadth_first_sort(output),
    }
}

/// A depth-first walk's visit state for one node.
struct Frame<V> {
    node: V,
    pending: Vec<V>,
}

impl<V: Variable> Frame<V> {
    fn new(node: V) -> Self {
        let mut pending = node.parents();
        // Popped from the back; reverse to explore parents in their given order.
        pending.reverse();
        Self { node, pending }
    }
}

/// Non-constant nodes reachable from `output`, each before all its parents.
///
/// Computed as the reverse postorder of an iterative depth-first walk: a
/// node is finished only after every parent below it is finished, so once
/// reversed the output comes first and every node precedes its ancestors.
pub fn topological_sort<V: Variable>(output: &V) -> Vec<V> {
    if output.is_constant() {
        return Vec::new();
    }

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut finished = Vec::new();
    let mut stack = vec![Frame::new(output.clone())];
    visited.insert(output.unique_id());

    while let Some(frame) = stack.last_mut() {
        let next = frame.pending.pop();
        match next {
            Some(parent) => {
                if parent.is_constant() || !visited.insert(parent.unique_id()) {
                    continue;
                }
                stack.push(Frame::new(parent));
            }
            None => {
                if let Some(done) = stack.pop() {
                    finished.push(done.node);
                }
            }
        }
    }

    finished.reverse();
    finished
}

/// Non-constant nodes reachable from `output`, in breadth-first discovery order.
///
/// The list is seeded with the output and only ever appended to; a cursor
/// walks it, appending every unseen non-constant parent of the node under
/// the cursor, until it reaches the end.
pub fn breadth_first_sort<V: Variable>(output: &V) -> Vec<V> {
    if output.is_constant() {
        return Vec::new();
    }

    let mut results = vec![output.clone()];
    let mut seen: HashSet<NodeId> = HashSet::new();
    seen.insert(output.unique_id());

    let mut cursor = 0;
    while cursor < results.len() {
        for parent in results[cursor].parents() {
            if !parent.is_constant() && seen.insert(parent.unique_id()) {
                results.push(parent);
            }
        }
        cursor += 1;
    }

    results
}
