//! Per-operation storage for values needed by a backward rule.

/// Values an operation saves during its forward pass.
///
/// A fresh context is created for every function application and is owned
/// by the node that application produces. When `no_grad` is set nothing is
/// ever stored, so [`Context::saved_tensors`] stays empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Context<T> {
    no_grad: bool,
    saved_values: Vec<T>,
}

impl<T> Context<T> {
    /// Creates an empty context.
    pub const fn new(no_grad: bool) -> Self {
        Self {
            no_grad,
            saved_values: Vec::new(),
        }
    }

    /// Whether gradient tracking was disabled for this operation.
    pub const fn no_grad(&self) -> bool {
        self.no_grad
    }

    /// Stores `values` for the backward pass, replacing any previous save.
    ///
    /// Does nothing when `no_grad` is set.
    pub fn save_for_backward<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        if self.no_grad {
            return;
        }
        self.saved_values = values.into_iter().collect();
    }

    /// The saved values, in the order they were given.
    pub fn saved_tensors(&self) -> &[T] {
        &self.saved_values
    }
}

impl<T> Default for Context<T> {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_before_save() {
        let ctx = Context::<f64>::default();
        assert!(!ctx.no_grad());
        assert!(ctx.saved_tensors().is_empty());
    }

    #[test]
    fn test_save_preserves_order() {
        let mut ctx = Context::default();
        ctx.save_for_backward([3.0, 1.0, 2.0]);
        assert_eq!(ctx.saved_tensors(), &[3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_save_replaces_previous() {
        let mut ctx = Context::default();
        ctx.save_for_backward([1.0, 2.0]);
        ctx.save_for_backward([5.0]);
        assert_eq!(ctx.saved_tensors(), &[5.0]);
    }

    #[test]
    fn test_no_grad_never_stores() {
        let mut ctx = Context::new(true);
        ctx.save_for_backward(vec![1.0, 2.0]);
        assert!(ctx.no_grad());
        assert!(ctx.saved_tensors().is_empty());
    }

    #[test]
    fn test_non_float_payload() {
        let mut ctx = Context::default();
        ctx.save_for_backward(vec!["lhs".to_string(), "rhs".to_string()]);
        assert_eq!(ctx.saved_tensors().len(), 2);
        assert_eq!(ctx.saved_tensors()[1], "rhs");
    }
}
