//! Arena-backed scalar computation graph.
//!
//! Nodes live in a single arena owned by the [`Graph`]; the arena index is
//! the node's identity. Handles ([`ScalarVar`]) are a graph reference plus
//! an index, so any number of nodes can share a parent without reference
//! counting. A node can only name parents that already exist, which keeps
//! the graph acyclic.

use crate::backward::backpropagate;
use crate::context::Context;
use crate::functions::{self, ScalarFunction};
use crate::variable::Variable;
use log::trace;
use minigrad_core::{AutodiffError, NodeId, NodeKind, Result};
use std::cell::RefCell;
use std::fmt;

/// What a node does during differentiation, with the data that role needs.
#[derive(Debug)]
enum Role {
    Leaf {
        derivative: Option<f64>,
    },
    Intermediate {
        function: Box<dyn ScalarFunction>,
        parents: Vec<NodeId>,
        ctx: Context<f64>,
    },
    Constant,
}

impl Role {
    const fn kind(&self) -> NodeKind {
        match self {
            Self::Leaf { .. } => NodeKind::Leaf,
            Self::Intermediate { .. } => NodeKind::Intermediate,
            Self::Constant => NodeKind::Constant,
        }
    }
}

/// A node in the computation graph.
#[derive(Debug)]
struct Node {
    value: f64,
    name: Option<String>,
    role: Role,
}

/// The computation graph structure.
#[derive(Debug)]
pub struct Graph {
    /// All nodes, indexed by their id
    nodes: RefCell<Vec<Node>>,
    /// Whether function applications record history
    track_gradients: bool,
}

impl Graph {
    /// Creates a new empty computation graph.
    pub const fn new() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
            track_gradients: true,
        }
    }

    /// Creates a new graph with gradient tracking disabled.
    ///
    /// Every function applied in this graph produces a constant, and its
    /// context saves nothing.
    pub const fn no_grad() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
            track_gradients: false,
        }
    }

    /// Whether function applications record history.
    pub const fn tracks_gradients(&self) -> bool {
        self.track_gradients
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    fn push(&self, node: Node) -> ScalarVar<'_> {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId::new(nodes.len());
        trace!("graph: created {} ({})", id, node.role.kind());
        nodes.push(node);
        ScalarVar { graph: self, id }
    }

    /// Creates a new leaf holding `value`.
    pub fn leaf(&self, value: f64) -> ScalarVar<'_> {
        self.push(Node {
            value,
            name: None,
            role: Role::Leaf { derivative: None },
        })
    }

    /// Creates a new leaf with a name.
    pub fn named_leaf(&self, value: f64, name: impl Into<String>) -> ScalarVar<'_> {
        self.push(Node {
            value,
            name: Some(name.into()),
            role: Role::Leaf { derivative: None },
        })
    }

    /// Creates a constant (non-differentiable) node.
    pub fn constant(&self, value: f64) -> ScalarVar<'_> {
        self.push(Node {
            value,
            name: None,
            role: Role::Constant,
        })
    }

    /// Applies `function` to `inputs`, recording the result in the graph.
    ///
    /// The result is an intermediate node when the graph tracks gradients
    /// and at least one input is not a constant; otherwise it is a constant
    /// and the function runs with a `no_grad` context.
    pub fn apply<'g, F>(&'g self, function: F, inputs: &[ScalarVar<'g>]) -> Result<ScalarVar<'g>>
    where
        F: ScalarFunction + 'static,
    {
        if inputs.len() != function.arity() {
            return Err(AutodiffError::arity_mismatch(
                function.name(),
                function.arity(),
                inputs.len(),
            ));
        }

        let (values, parents, requires_grad) = {
            let nodes = self.nodes.borrow();
            let mut values = Vec::with_capacity(inputs.len());
            let mut parents = Vec::with_capacity(inputs.len());
            let mut requires_grad = false;
            for input in inputs {
                if !std::ptr::eq(input.graph, self) {
                    return Err(AutodiffError::unknown_node(input.id));
                }
                let node = nodes
                    .get(input.id.index())
                    .ok_or_else(|| AutodiffError::unknown_node(input.id))?;
                values.push(node.value);
                parents.push(input.id);
                requires_grad |= node.role.kind() != NodeKind::Constant;
            }
            (values, parents, requires_grad && self.track_gradients)
        };

        let mut ctx = Context::new(!requires_grad);
        let value = function.forward(&mut ctx, &values);

        let role = if requires_grad {
            Role::Intermediate {
                function: Box::new(function),
                parents,
                ctx,
            }
        } else {
            Role::Constant
        };

        Ok(self.push(Node {
            value,
            name: None,
            role,
        }))
    }

    /// Clears the derivative of every leaf.
    pub fn zero_grad(&self) {
        for node in self.nodes.borrow_mut().iter_mut() {
            if let Role::Leaf { derivative } = &mut node.role {
                *derivative = None;
            }
        }
    }

    /// Runs `f` on the node behind `id`.
    ///
    /// Ids reach this point only through handles this graph created, and
    /// nodes are never removed, so the lookup always succeeds.
    fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&Node) -> R) -> R {
        f(&self.nodes.borrow()[id.index()])
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a node of a [`Graph`].
#[derive(Clone, Copy)]
pub struct ScalarVar<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> ScalarVar<'g> {
    /// The node's identifier.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The graph this node belongs to.
    pub const fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// The value computed for this node in the forward pass.
    pub fn value(&self) -> f64 {
        self.graph.with_node(self.id, |node| node.value)
    }

    /// The node's name, if it was given one.
    pub fn name(&self) -> Option<String> {
        self.graph.with_node(self.id, |node| node.name.clone())
    }

    /// The derivative accumulated so far. Always `None` for non-leaves.
    pub fn derivative(&self) -> Option<f64> {
        self.graph.with_node(self.id, |node| match node.role {
            Role::Leaf { derivative } => derivative,
            _ => None,
        })
    }

    /// Backpropagates a derivative of 1.0 from this node.
    pub fn backward(&self) -> Result<()> {
        backpropagate(self, 1.0)
    }

    fn unary<F: ScalarFunction + 'static>(self, function: F) -> Result<Self> {
        self.graph.apply(function, &[self])
    }

    fn binary<F: ScalarFunction + 'static>(self, function: F, other: Self) -> Result<Self> {
        self.graph.apply(function, &[self, other])
    }

    /// `self + other`
    pub fn add(self, other: Self) -> Result<Self> {
        self.binary(functions::Add, other)
    }

    /// `self - other`
    pub fn sub(self, other: Self) -> Result<Self> {
        self.add(other.neg()?)
    }

    /// `self * other`
    pub fn mul(self, other: Self) -> Result<Self> {
        self.binary(functions::Mul, other)
    }

    /// `self / other`
    pub fn div(self, other: Self) -> Result<Self> {
        self.mul(other.inv()?)
    }

    /// `-self`
    pub fn neg(self) -> Result<Self> {
        self.unary(functions::Neg)
    }

    /// `1 / self`
    pub fn inv(self) -> Result<Self> {
        self.unary(functions::Inv)
    }

    /// `ln(self)`
    pub fn log(self) -> Result<Self> {
        self.unary(functions::Log)
    }

    /// `e^self`
    pub fn exp(self) -> Result<Self> {
        self.unary(functions::Exp)
    }

    /// Logistic sigmoid of `self`.
    pub fn sigmoid(self) -> Result<Self> {
        self.unary(functions::Sigmoid)
    }

    /// `max(self, 0)`
    pub fn relu(self) -> Result<Self> {
        self.unary(functions::ReLU)
    }

    /// 1.0 if `self < other`, else 0.0.
    pub fn lt(self, other: Self) -> Result<Self> {
        self.binary(functions::LessThan, other)
    }

    /// 1.0 if `self == other`, else 0.0.
    pub fn eq(self, other: Self) -> Result<Self> {
        self.binary(functions::Equal, other)
    }
}

impl fmt::Debug for ScalarVar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.graph.with_node(self.id, |node| {
            f.debug_struct("ScalarVar")
                .field("id", &self.id)
                .field("kind", &node.role.kind())
                .field("value", &node.value)
                .field("name", &node.name)
                .finish()
        })
    }
}

impl Variable for ScalarVar<'_> {
    type Derivative = f64;

    fn unique_id(&self) -> NodeId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        self.graph.with_node(self.id, |node| node.role.kind())
    }

    fn parents(&self) -> Vec<Self> {
        self.graph.with_node(self.id, |node| match &node.role {
            Role::Intermediate { parents, .. } => parents
                .iter()
                .map(|&id| ScalarVar {
                    graph: self.graph,
                    id,
                })
                .collect(),
            Role::Leaf { .. } | Role::Constant => Vec::new(),
        })
    }

    fn chain_rule(&self, d_output: &f64) -> Result<Vec<(Self, f64)>> {
        self.graph.with_node(self.id, |node| match &node.role {
            Role::Intermediate {
                function,
                parents,
                ctx,
            } => {
                let contributions = function.backward(ctx, *d_output)?;
                if contributions.len() != parents.len() {
                    return Err(AutodiffError::arity_mismatch(
                        function.name(),
                        parents.len(),
                        contributions.len(),
                    ));
                }
                Ok(parents
                    .iter()
                    .zip(contributions)
                    .map(|(&id, d)| {
                        (
                            ScalarVar {
                                graph: self.graph,
                                id,
                            },
                            d,
                        )
                    })
                    .collect())
            }
            role => Err(AutodiffError::not_differentiable(self.id, role.kind())),
        })
    }

    fn accumulate_derivative(&self, d: f64) -> Result<()> {
        let mut nodes = self.graph.nodes.borrow_mut();
        let node = nodes
            .get_mut(self.id.index())
            .ok_or_else(|| AutodiffError::unknown_node(self.id))?;
        match &mut node.role {
            Role::Leaf { derivative } => {
                *derivative = Some(derivative.unwrap_or(0.0) + d);
                Ok(())
            }
            _ => Err(AutodiffError::not_a_leaf(self.id)),
        }
    }
}
