//! Finite-difference derivative estimates.
//!
//! These are used to cross-check analytic derivatives produced by the
//! backward pass; nothing in the engine itself depends on them.

use crate::error::{AutodiffError, Result};
use crate::types::Scalar;

/// Estimates `df/dx_arg` at `vals` with the scalar's default step.
///
/// See [`central_difference_with_epsilon`].
pub fn central_difference<T, F>(f: F, vals: &[T], arg: usize) -> Result<T>
where
    T: Scalar,
    F: Fn(&[T]) -> T,
{
    central_difference_with_epsilon(f, vals, arg, T::DIFFERENCE_EPSILON)
}

/// Estimates `df/dx_arg` at `vals` as `(f(x + e) - f(x - e)) / 2e`.
///
/// Only argument `arg` is perturbed; the others are passed through unchanged.
pub fn central_difference_with_epsilon<T, F>(f: F, vals: &[T], arg: usize, epsilon: T) -> Result<T>
where
    T: Scalar,
    F: Fn(&[T]) -> T,
{
    if arg >= vals.len() {
        return Err(AutodiffError::arity_mismatch(
            "central_difference",
            arg + 1,
            vals.len(),
        ));
    }

    let mut shifted = vals.to_vec();
    let original = vals[arg];

    shifted[arg] = original - epsilon;
    let lower = f(&shifted);

    shifted[arg] = original + epsilon;
    let upper = f(&shifted);

    let two = T::one() + T::one();
    Ok((upper - lower) / (two * epsilon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_central_difference_square() {
        let d = central_difference(|v: &[f64]| v[0] * v[0], &[3.0], 0).unwrap();
        assert_abs_diff_eq!(d, 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_central_difference_picks_argument() {
        let f = |v: &[f64]| v[0] * v[1] + v[1];
        let dx = central_difference(f, &[2.0, 5.0], 0).unwrap();
        let dy = central_difference(f, &[2.0, 5.0], 1).unwrap();
        assert_abs_diff_eq!(dx, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(dy, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_central_difference_custom_epsilon() {
        let d = central_difference_with_epsilon(|v: &[f64]| v[0].exp(), &[0.0], 0, 1e-4).unwrap();
        assert_abs_diff_eq!(d, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_central_difference_bad_argument() {
        let err = central_difference(|v: &[f64]| v[0], &[1.0], 1).unwrap_err();
        assert!(matches!(err, AutodiffError::ArityMismatch { .. }));
    }
}
