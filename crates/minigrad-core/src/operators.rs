//! Elementary scalar operators and their derivative helpers.
//!
//! The `*_back` functions return `b * f'(x)`, i.e. the derivative of the
//! operator scaled by the derivative flowing in from the output. The list
//! helpers at the bottom are small eager combinators built on
//! [`map`], [`zip_with`] and [`reduce`].

use crate::error::{AutodiffError, Result};
use crate::types::Scalar;

/// Multiplies two numbers.
#[inline]
pub fn mul<T: Scalar>(x: T, y: T) -> T {
    x * y
}

/// Returns its input unchanged.
#[inline]
pub fn id<T: Scalar>(x: T) -> T {
    x
}

/// Adds two numbers.
#[inline]
pub fn add<T: Scalar>(x: T, y: T) -> T {
    x + y
}

/// Negates a number.
#[inline]
pub fn neg<T: Scalar>(x: T) -> T {
    -x
}

/// Returns `true` if `x < y`.
#[inline]
pub fn lt<T: Scalar>(x: T, y: T) -> bool {
    x < y
}

/// Returns `true` if `x == y`.
#[inline]
#[allow(clippy::float_cmp)]
pub fn eq<T: Scalar>(x: T, y: T) -> bool {
    x == y
}

/// Returns the larger of `x` and `y`, preferring `y` on ties.
#[inline]
pub fn max<T: Scalar>(x: T, y: T) -> T {
    if x > y {
        x
    } else {
        y
    }
}

/// Returns `true` if `|x - y|` is below the scalar's close tolerance (1e-2).
#[inline]
pub fn is_close<T: Scalar>(x: T, y: T) -> bool {
    (x - y).abs() < T::CLOSE_TOLERANCE
}

/// Logistic sigmoid.
///
/// Evaluated as `e^x / (1 + e^x)` for negative inputs and
/// `1 / (1 + e^-x)` otherwise so neither branch overflows.
pub fn sigmoid<T: Scalar>(x: T) -> T {
    if x < T::zero() {
        let ex = x.exp();
        ex / (T::one() + ex)
    } else {
        T::one() / (T::one() + (-x).exp())
    }
}

/// Rectified linear unit.
#[inline]
pub fn relu<T: Scalar>(x: T) -> T {
    max(x, T::zero())
}

/// Natural logarithm.
#[inline]
pub fn log<T: Scalar>(x: T) -> T {
    x.ln()
}

/// Exponential.
#[inline]
pub fn exp<T: Scalar>(x: T) -> T {
    x.exp()
}

/// Reciprocal, with `1/0 = +inf`.
#[inline]
pub fn inv<T: Scalar>(x: T) -> T {
    if x == T::zero() {
        T::infinity()
    } else {
        T::one() / x
    }
}

/// `b * d/dx ln(x)`.
#[inline]
pub fn log_back<T: Scalar>(x: T, b: T) -> T {
    inv(x) * b
}

/// `b * d/dx (1/x)`.
#[inline]
pub fn inv_back<T: Scalar>(x: T, b: T) -> T {
    -(T::one() / (x * x)) * b
}

/// `b * d/dx relu(x)`.
#[inline]
pub fn relu_back<T: Scalar>(x: T, b: T) -> T {
    if x > T::zero() {
        b
    } else {
        T::zero()
    }
}

/// Applies `f` to every element.
pub fn map<I, U, F>(it: I, f: F) -> Vec<U>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> U,
{
    it.into_iter().map(f).collect()
}

/// Applies `f` pairwise; stops at the end of the shorter input.
pub fn zip_with<I, J, U, F>(it1: I, it2: J, mut f: F) -> Vec<U>
where
    I: IntoIterator,
    J: IntoIterator,
    F: FnMut(I::Item, J::Item) -> U,
{
    it1.into_iter().zip(it2).map(|(a, b)| f(a, b)).collect()
}

/// Folds a sequence left to right, seeding with its first element.
///
/// Fails with [`AutodiffError::EmptyReduction`] when there is nothing to fold.
pub fn reduce<I, F>(it: I, f: F) -> Result<I::Item>
where
    I: IntoIterator,
    F: FnMut(I::Item, I::Item) -> I::Item,
{
    it.into_iter().reduce(f).ok_or(AutodiffError::EmptyReduction)
}

/// Negates every element.
pub fn neg_list<T: Scalar>(it: impl IntoIterator<Item = T>) -> Vec<T> {
    map(it, neg)
}

/// Adds two sequences elementwise.
pub fn add_lists<T: Scalar>(
    it1: impl IntoIterator<Item = T>,
    it2: impl IntoIterator<Item = T>,
) -> Vec<T> {
    zip_with(it1, it2, add)
}

/// Sums a sequence. The empty sum is zero.
pub fn sum<T: Scalar>(it: impl IntoIterator<Item = T>) -> T {
    reduce(it, add).unwrap_or_else(|_| T::zero())
}

/// Multiplies a sequence. There is no empty product.
pub fn prod<T: Scalar>(it: impl IntoIterator<Item = T>) -> Result<T> {
    reduce(it, mul)
}
