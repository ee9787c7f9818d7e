//! Nodes of the rule graph.
//!
//! A [`Node`] lives in a [`NodeArena`](super::NodeArena) and is addressed by
//! its [`NodeId`]. Argument bindings point from a parent to its children by
//! id; every node also records who owns it, which keeps ownership exclusive
//! and lets cycle checks walk upwards in O(depth).
//!
//! [`NodeTree`] is the detached, id-free form of a subtree. Two nodes are
//! structurally equal when their trees are equal, regardless of which arena
//! they live in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::scenario::TriggerId;

use super::schema::VariantId;
use super::types::{Literal, NodeKind, ValueType};

/// Stable identifier of a node within its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Who holds a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    /// Not yet attached anywhere.
    Detached,
    /// Bound as an argument of another node.
    Argument(NodeId),
    /// Listed directly in a trigger's events, conditions or actions.
    Trigger(TriggerId),
}

/// One argument binding: parameter name to child node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Parameter name.
    pub param: String,
    /// Bound child.
    pub child: NodeId,
}

/// A node of the rule graph.
///
/// Kind and result type are copied from the variant at creation; they never
/// change for the lifetime of the node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) variant: VariantId,
    pub(crate) kind: NodeKind,
    pub(crate) result: ValueType,
    pub(crate) literal: Option<Literal>,
    pub(crate) arguments: SmallVec<[Binding; 4]>,
    pub(crate) owner: Owner,
}

impl Node {
    /// The node's id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's variant.
    #[must_use]
    pub fn variant(&self) -> &VariantId {
        &self.variant
    }

    /// The node's kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The type this node evaluates to.
    #[must_use]
    pub fn result_type(&self) -> ValueType {
        self.result
    }

    /// The literal of a value node.
    #[must_use]
    pub fn literal(&self) -> Option<&Literal> {
        self.literal.as_ref()
    }

    /// The child bound to a parameter, if any.
    #[must_use]
    pub fn argument(&self, param: &str) -> Option<NodeId> {
        self.arguments
            .iter()
            .find(|b| b.param == param)
            .map(|b| b.child)
    }

    /// All current bindings, in binding order.
    pub fn arguments(&self) -> impl Iterator<Item = &Binding> {
        self.arguments.iter()
    }

    /// Who holds this node.
    #[must_use]
    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Whether the node is held by nothing.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.owner == Owner::Detached
    }
}

/// Owned, id-free snapshot of a node subtree.
///
/// ```
/// use scenario_script::graph::NodeTree;
///
/// let sum = NodeTree::new("AddInt")
///     .with_arg("left", NodeTree::int(2))
///     .with_arg("right", NodeTree::int(3));
///
/// assert_eq!(sum.arguments.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTree {
    /// Variant of the root.
    pub variant: VariantId,
    /// Literal of the root, for value nodes.
    pub literal: Option<Literal>,
    /// Bound children by parameter name.
    pub arguments: BTreeMap<String, NodeTree>,
}

impl NodeTree {
    /// Create a tree root with no literal and no arguments.
    pub fn new(variant: impl Into<VariantId>) -> Self {
        Self {
            variant: variant.into(),
            literal: None,
            arguments: BTreeMap::new(),
        }
    }

    /// Set the literal (builder pattern).
    #[must_use]
    pub fn with_literal(mut self, literal: impl Into<Literal>) -> Self {
        self.literal = Some(literal.into());
        self
    }

    /// Bind a child (builder pattern).
    #[must_use]
    pub fn with_arg(mut self, param: impl Into<String>, child: NodeTree) -> Self {
        self.arguments.insert(param.into(), child);
        self
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.arguments.values().map(NodeTree::size).sum::<usize>()
    }

    /// Longest root-to-leaf path, counting nodes.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.arguments.values().map(NodeTree::depth).max().unwrap_or(0)
    }
}
