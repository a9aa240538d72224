//! Scalar functions that can be recorded in a [`crate::graph::Graph`].
//!
//! Each function computes its forward value, saves what its backward rule
//! needs into the [`Context`] it is given, and later maps an incoming
//! derivative to one contribution per input.

use crate::context::Context;
use minigrad_core::operators;
use minigrad_core::{AutodiffError, Result};
use std::fmt::Debug;

/// Trait for differentiable scalar functions.
pub trait ScalarFunction: Debug {
    /// Returns the name of this function.
    fn name(&self) -> &str;

    /// Number of inputs the function takes.
    fn arity(&self) -> usize;

    /// Computes the output from `inputs`, saving state into `ctx`.
    ///
    /// `inputs` always has exactly [`ScalarFunction::arity`] elements.
    fn forward(&self, ctx: &mut Context<f64>, inputs: &[f64]) -> f64;

    /// Computes the derivative contribution for each input.
    ///
    /// # Arguments
    /// * `ctx` - The context filled during the forward pass
    /// * `d_output` - The derivative flowing into the function's output
    ///
    /// # Returns
    /// A vector of contributions, one for each input, in input order
    fn backward(&self, ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>>;
}

/// Reads exactly `N` saved values out of `ctx`.
fn saved<const N: usize>(function: &str, ctx: &Context<f64>) -> Result<[f64; N]> {
    let values = ctx.saved_tensors();
    <[f64; N]>::try_from(values)
        .map_err(|_| AutodiffError::missing_saved_values(function, N, values.len()))
}

/// Addition.
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl ScalarFunction for Add {
    fn name(&self) -> &str {
        "Add"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, _ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        operators::add(inputs[0], inputs[1])
    }

    fn backward(&self, _ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>> {
        Ok(vec![d_output, d_output])
    }
}

/// Multiplication.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mul;

impl ScalarFunction for Mul {
    fn name(&self) -> &str {
        "Mul"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        ctx.save_for_backward([inputs[0], inputs[1]]);
        operators::mul(inputs[0], inputs[1])
    }

    fn backward(&self, ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>> {
        let [x, y] = saved(self.name(), ctx)?;
        Ok(vec![d_output * y, d_output * x])
    }
}

/// Negation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neg;

impl ScalarFunction for Neg {
    fn name(&self) -> &str {
        "Neg"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, _ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        operators::neg(inputs[0])
    }

    fn backward(&self, _ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>> {
        Ok(vec![operators::neg(d_output)])
    }
}

/// Reciprocal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inv;

impl ScalarFunction for Inv {
    fn name(&self) -> &str {
        "Inv"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        ctx.save_for_backward([inputs[0]]);
        operators::inv(inputs[0])
    }

    fn backward(&self, ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>> {
        let [x] = saved(self.name(), ctx)?;
        Ok(vec![operators::inv_back(x, d_output)])
    }
}

/// Natural logarithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct Log;

impl ScalarFunction for Log {
    fn name(&self) -> &str {
        "Log"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        ctx.save_for_backward([inputs[0]]);
        operators::log(inputs[0])
    }

    fn backward(&self, ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>> {
        let [x] = saved(self.name(), ctx)?;
        Ok(vec![operators::log_back(x, d_output)])
    }
}

/// Exponential. Saves its output, which is also its derivative.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl ScalarFunction for Exp {
    fn name(&self) -> &str {
        "Exp"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        let out = operators::exp(inputs[0]);
        ctx.save_for_backward([out]);
        out
    }

    fn backward(&self, ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>> {
        let [out] = saved(self.name(), ctx)?;
        Ok(vec![out * d_output])
    }
}

/// Logistic sigmoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl ScalarFunction for Sigmoid {
    fn name(&self) -> &str {
        "Sigmoid"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        let out = operators::sigmoid(inputs[0]);
        ctx.save_for_backward([out]);
        out
    }

    fn backward(&self, ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>> {
        let [s] = saved(self.name(), ctx)?;
        Ok(vec![s * (1.0 - s) * d_output])
    }
}

/// Rectified linear unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReLU;

impl ScalarFunction for ReLU {
    fn name(&self) -> &str {
        "ReLU"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        ctx.save_for_backward([inputs[0]]);
        operators::relu(inputs[0])
    }

    fn backward(&self, ctx: &Context<f64>, d_output: f64) -> Result<Vec<f64>> {
        let [x] = saved(self.name(), ctx)?;
        Ok(vec![operators::relu_back(x, d_output)])
    }
}

/// Less-than comparison, producing 1.0 or 0.0. Flat everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct LessThan;

impl ScalarFunction for LessThan {
    fn name(&self) -> &str {
        "LessThan"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, _ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        if operators::lt(inputs[0], inputs[1]) {
            1.0
        } else {
            0.0
        }
    }

    fn backward(&self, _ctx: &Context<f64>, _d_output: f64) -> Result<Vec<f64>> {
        Ok(vec![0.0, 0.0])
    }
}

/// Equality comparison, producing 1.0 or 0.0. Flat everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Equal;

impl ScalarFunction for Equal {
    fn name(&self) -> &str {
        "Equal"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, _ctx: &mut Context<f64>, inputs: &[f64]) -> f64 {
        if operators::eq(inputs[0], inputs[1]) {
            1.0
        } else {
            0.0
        }
    }

    fn backward(&self, _ctx: &Context<f64>, _d_output: f64) -> Result<Vec<f64>> {
        Ok(vec![0.0, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(function: &dyn ScalarFunction, inputs: &[f64], d_output: f64) -> (f64, Vec<f64>) {
        let mut ctx = Context::default();
        let out = function.forward(&mut ctx, inputs);
        let grads = function.backward(&ctx, d_output).unwrap();
        (out, grads)
    }

    #[test]
    fn test_add_mul() {
        assert_eq!(run(&Add, &[2.0, 3.0], 1.0), (5.0, vec![1.0, 1.0]));
        assert_eq!(run(&Mul, &[2.0, 3.0], 2.0), (6.0, vec![6.0, 4.0]));
    }

    #[test]
    fn test_unary() {
        assert_eq!(run(&Neg, &[2.0], 1.5), (-2.0, vec![-1.5]));
        assert_eq!(run(&Inv, &[2.0], 1.0), (0.5, vec![-0.25]));
        assert_eq!(run(&ReLU, &[-1.0], 1.0), (0.0, vec![0.0]));
        assert_eq!(run(&ReLU, &[2.0], 3.0), (2.0, vec![3.0]));

        let (out, grads) = run(&Log, &[2.0], 1.0);
        assert_relative_eq!(out, 2.0f64.ln());
        assert_relative_eq!(grads[0], 0.5);

        let (out, grads) = run(&Exp, &[1.0], 2.0);
        assert_relative_eq!(out, 1.0f64.exp());
        assert_relative_eq!(grads[0], 2.0 * 1.0f64.exp());

        let (out, grads) = run(&Sigmoid, &[0.0], 1.0);
        assert_relative_eq!(out, 0.5);
        assert_relative_eq!(grads[0], 0.25);
    }

    #[test]
    fn test_comparisons_are_flat() {
        assert_eq!(run(&LessThan, &[1.0, 2.0], 1.0), (1.0, vec![0.0, 0.0]));
        assert_eq!(run(&LessThan, &[2.0, 1.0], 1.0), (0.0, vec![0.0, 0.0]));
        assert_eq!(run(&Equal, &[2.0, 2.0], 1.0), (1.0, vec![0.0, 0.0]));
    }

    #[test]
    fn test_backward_without_saved_values() {
        let mut ctx = Context::new(true);
        let out = Mul.forward(&mut ctx, &[2.0, 3.0]);
        assert_eq!(out, 6.0);

        let err = Mul.backward(&ctx, 1.0).unwrap_err();
        assert_eq!(err, AutodiffError::missing_saved_values("Mul", 2, 0));
    }
}
