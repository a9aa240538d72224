//! Backward pass implementation for automatic differentiation.
//!
//! This module implements the backpropagation algorithm: one sweep over the
//! ordered graph that sums derivative contributions per node and hands each
//! leaf its total.

use crate::config::BackpropConfig;
use crate::sort::sort_with;
use crate::variable::Variable;
use log::{debug, trace};
use minigrad_core::{AutodiffError, NodeId, NodeKind, Result};
use std::collections::HashMap;

/// Type alias for the running derivative of each node during one pass.
pub type DerivativeMap<D> = HashMap<NodeId, D>;

/// Propagates `seed` from `output` back to every reachable leaf.
///
/// Uses the default [`BackpropConfig`]. See [`backpropagate_with`].
pub fn backpropagate<V: Variable>(output: &V, seed: V::Derivative) -> Result<()> {
    backpropagate_with(output, seed, &BackpropConfig::default())
}

/// Propagates `seed` from `output` back to every reachable leaf.
///
/// Each reachable leaf receives exactly one `accumulate_derivative` call
/// carrying the sum of all contributions that reached it. The accumulation
/// map is local to this call, so repeated calls never see each other's
/// state.
///
/// # Errors
///
/// Any fault aborts the pass immediately; leaves visited before the fault
/// keep what they were given.
///
/// * `NotDifferentiable` if `output` is a constant
/// * `MissingDerivative` if a node is visited before anything reached it
/// * whatever the graph's own `chain_rule` / `accumulate_derivative` report
pub fn backpropagate_with<V: Variable>(
    output: &V,
    seed: V::Derivative,
    config: &BackpropConfig,
) -> Result<()> {
    let output_id = output.unique_id();
    if output.is_constant() {
        return Err(AutodiffError::not_differentiable(output_id, NodeKind::Constant));
    }

    let order = sort_with(output, config.order);
    debug!(
        "backpropagate: output {} with {} nodes ({} order)",
        output_id,
        order.len(),
        config.order
    );

    let mut derivatives: DerivativeMap<V::Derivative> = HashMap::with_capacity(order.len());
    derivatives.insert(output_id, seed);

    let mut leaves = 0usize;
    for node in &order {
        let id = node.unique_id();
        let d = derivatives
            .remove(&id)
            .ok_or_else(|| AutodiffError::missing_derivative(id))?;

        if node.is_leaf() {
            trace!("backpropagate: delivering derivative to leaf {}", id);
            node.accumulate_derivative(d)?;
            leaves += 1;
            continue;
        }

        trace!("backpropagate: applying chain rule at {}", id);
        for (parent, contribution) in node.chain_rule(&d)? {
            if parent.is_constant() {
                continue;
            }
            let parent_id = parent.unique_id();
            trace!("backpropagate:   {} -> {}", id, parent_id);
            accumulate(&mut derivatives, parent_id, contribution);
        }
    }

    debug!("backpropagate: finished, {} leaves updated", leaves);
    Ok(())
}

/// Adds `contribution` into `id`'s entry, creating it if absent.
fn accumulate<D>(derivatives: &mut DerivativeMap<D>, id: NodeId, contribution: D)
where
    D: std::ops::Add<Output = D>,
{
    let total = match derivatives.remove(&id) {
        Some(existing) => existing + contribution,
        None => contribution,
    };
    derivatives.insert(id, total);
}
