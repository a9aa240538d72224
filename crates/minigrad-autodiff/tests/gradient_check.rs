//! Cross-checks analytic derivatives against central differences.

use approx::assert_abs_diff_eq;
use minigrad_autodiff::prelude::*;
use minigrad_core::{central_difference, operators, NodeId, Result};
use proptest::prelude::*;

/// Smooth unary steps that keep values inside [-1, 1].
#[derive(Debug, Clone, Copy)]
enum Step {
    Neg,
    Sigmoid,
    Square,
    Half,
}

fn apply_step<'g>(step: Step, x: ScalarVar<'g>) -> Result<ScalarVar<'g>> {
    match step {
        Step::Neg => x.neg(),
        Step::Sigmoid => x.sigmoid(),
        Step::Square => x.mul(x),
        Step::Half => x.mul(x.graph().constant(0.5)),
    }
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Neg),
        Just(Step::Sigmoid),
        Just(Step::Square),
        Just(Step::Half),
    ]
}

/// Builds the chain on a fresh graph and returns its value at `x`.
fn eval_chain(steps: &[Step], x: f64) -> f64 {
    let graph = Graph::new();
    let mut y = graph.leaf(x);
    for &step in steps {
        y = apply_step(step, y).unwrap();
    }
    y.value()
}

/// `f(x, y) = sigmoid(x) * (x * y) + x`, with x reached along three
/// paths of different lengths.
fn diamond<'g>(x: ScalarVar<'g>, y: ScalarVar<'g>) -> Result<ScalarVar<'g>> {
    let left = x.sigmoid()?;
    let right = x.mul(y)?;
    left.mul(right)?.add(x)
}

fn eval_diamond(vals: &[f64]) -> f64 {
    let graph = Graph::new();
    let x = graph.leaf(vals[0]);
    let y = graph.leaf(vals[1]);
    diamond(x, y).unwrap().value()
}

#[test]
fn test_chain_matches_finite_difference() {
    let steps = [Step::Sigmoid, Step::Square, Step::Neg, Step::Half, Step::Sigmoid];
    let graph = Graph::new();
    let x = graph.leaf(0.3);
    let mut y = x;
    for &step in &steps {
        y = apply_step(step, y).unwrap();
    }
    y.backward().unwrap();

    let numeric = central_difference(|v: &[f64]| eval_chain(&steps, v[0]), &[0.3], 0).unwrap();
    assert!(operators::is_close(x.derivative().unwrap(), numeric));
}

#[test]
fn test_diamond_matches_finite_difference() {
    let graph = Graph::new();
    let x = graph.leaf(0.7);
    let y = graph.leaf(-1.2);
    diamond(x, y).unwrap().backward().unwrap();

    let dx = central_difference(eval_diamond, &[0.7, -1.2], 0).unwrap();
    let dy = central_difference(eval_diamond, &[0.7, -1.2], 1).unwrap();
    assert_abs_diff_eq!(x.derivative().unwrap(), dx, epsilon = 1e-6);
    assert_abs_diff_eq!(y.derivative().unwrap(), dy, epsilon = 1e-6);
}

proptest! {
    #[test]
    fn prop_random_chain(steps in proptest::collection::vec(step_strategy(), 1..8), x0 in -1.0f64..1.0) {
        let graph = Graph::new();
        let x = graph.leaf(x0);
        let mut y = x;
        for &step in &steps {
            y = apply_step(step, y).unwrap();
        }
        backpropagate(&y, 1.0).unwrap();

        let numeric = central_difference(|v: &[f64]| eval_chain(&steps, v[0]), &[x0], 0).unwrap();
        let analytic = x.derivative().unwrap();
        prop_assert!(operators::is_close(analytic, numeric), "analytic {} vs numeric {}", analytic, numeric);
    }

    #[test]
    fn prop_random_diamond(x0 in -2.0f64..2.0, y0 in -2.0f64..2.0) {
        let graph = Graph::new();
        let x = graph.leaf(x0);
        let y = graph.leaf(y0);
        backpropagate(&diamond(x, y).unwrap(), 1.0).unwrap();

        let dx = central_difference(eval_diamond, &[x0, y0], 0).unwrap();
        let dy = central_difference(eval_diamond, &[x0, y0], 1).unwrap();
        prop_assert!(operators::is_close(x.derivative().unwrap(), dx));
        prop_assert!(operators::is_close(y.derivative().unwrap(), dy));
    }

    #[test]
    fn prop_topological_order_respects_edges(steps in proptest::collection::vec(step_strategy(), 1..12)) {
        let graph = Graph::new();
        let x = graph.leaf(0.5);
        let mut y = x;
        for &step in &steps {
            // Re-use x at every level to create many shared-ancestor paths.
            y = apply_step(step, y).unwrap().add(x).unwrap();
        }

        let order = topological_sort(&y);
        let position = |id: NodeId| order.iter().position(|v| v.unique_id() == id);
        for (i, node) in order.iter().enumerate() {
            prop_assert!(!node.is_constant());
            for parent in node.parents() {
                if parent.is_constant() {
                    prop_assert!(position(parent.unique_id()).is_none());
                } else {
                    prop_assert!(position(parent.unique_id()).unwrap() > i);
                }
            }
        }
    }
}
