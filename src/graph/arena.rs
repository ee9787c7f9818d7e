//! Node storage and schema-checked mutation.
//!
//! The arena owns every node of a scenario, keyed by stable [`NodeId`]s.
//! All mutation goes through methods that validate against the
//! [`VariantRegistry`] first and only then touch the graph, so a rejected
//! request leaves the arena exactly as it was.
//!
//! Uses `im` persistent maps so the arena (and the scenario holding it)
//! clones in O(1).
//!
//! ## Invariants
//!
//! - Every binding's child has the result type the parameter declares.
//! - Every node has at most one owner: a parent binding, a trigger list, or
//!   nothing.
//! - The graph reachable from any node is acyclic.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::node::{Binding, Node, NodeId, NodeTree, Owner};
use super::schema::{VariantDef, VariantRegistry};
use super::types::{Comparator, DamageType, Literal, NodeKind, ValueType};

/// Storage for the nodes of one scenario.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeArena {
    nodes: ImHashMap<NodeId, Node>,
    next_id: u32,
}

impl NodeArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a node by ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Check if a node exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get the total node count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate all nodes (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Create a fully specified node.
    ///
    /// Every supplied child must exist, be detached, and have the result
    /// type its parameter declares. Every parameter without a default must
    /// be supplied. Value variants require a literal of their type; other
    /// variants reject one.
    ///
    /// # Errors
    /// Returns a `SchemaError` describing the first violation. Nothing is
    /// created or bound on failure.
    pub fn create_node(
        &mut self,
        registry: &VariantRegistry,
        variant: &str,
        args: &[(&str, NodeId)],
        literal: Option<Literal>,
    ) -> Result<NodeId, SchemaError> {
        let def = registry.require(variant)?;
        check_literal(def, literal.as_ref())?;

        for (i, &(param, child)) in args.iter().enumerate() {
            if args[..i].iter().any(|&(p, _)| p == param) {
                return Err(SchemaError::InvalidParameterName {
                    variant: def.id.clone(),
                    param: param.to_string(),
                });
            }
            if args[..i].iter().any(|&(_, c)| c == child) {
                return Err(SchemaError::AlreadyBound(child));
            }
            self.check_binding(def, param, child)?;
        }

        if let Some(missing) = def
            .params
            .iter()
            .filter(|spec| spec.is_required())
            .find(|spec| !args.iter().any(|&(p, _)| p == spec.name))
        {
            return Err(SchemaError::MissingParameter {
                variant: def.id.clone(),
                param: missing.name.to_string(),
            });
        }

        let id = self.insert(def, literal);
        for &(param, child) in args {
            self.bind(id, param, child);
        }
        Ok(id)
    }

    /// Create a node with every slot unset, as the editor does when the user
    /// picks a variant from a list.
    ///
    /// Value drafts start from a neutral literal (`0`, `""`, `False`,
    /// `Equal`, `Generic`); reference-valued variants have no neutral value
    /// and must be built with [`create_node`](Self::create_node).
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownVariant` or `SchemaError::LiteralMismatch`.
    pub fn create_draft(
        &mut self,
        registry: &VariantRegistry,
        variant: &str,
    ) -> Result<NodeId, SchemaError> {
        let def = registry.require(variant)?;
        let literal = match def.literal {
            None => None,
            Some(ty) => Some(neutral_literal(ty).ok_or_else(|| SchemaError::LiteralMismatch {
                variant: def.id.clone(),
                expected: Some(ty),
                found: None,
            })?),
        };
        Ok(self.insert(def, literal))
    }

    /// Replace the literal of a value node.
    ///
    /// # Errors
    /// Returns `SchemaError::LiteralMismatch` if the node is not a value node
    /// or the literal has the wrong type.
    pub fn set_literal(&mut self, id: NodeId, literal: Literal) -> Result<(), SchemaError> {
        let node = self.require(id)?;
        if node.kind != NodeKind::Value || literal.value_type() != node.result {
            return Err(SchemaError::LiteralMismatch {
                variant: node.variant.clone(),
                expected: (node.kind == NodeKind::Value).then_some(node.result),
                found: Some(literal.value_type()),
            });
        }

        if let Some(node) = self.nodes.get_mut(&id) {
            node.literal = Some(literal);
        }
        Ok(())
    }

    /// The child bound to `param` on `node`, if any.
    #[must_use]
    pub fn get_argument(&self, node: NodeId, param: &str) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.argument(param))
    }

    /// Bind `child` to `param` on `node`, discarding any previous child.
    ///
    /// # Errors
    /// Rejects unknown nodes or parameters, children that are already owned,
    /// type mismatches, and bindings that would create a cycle. The graph is
    /// unchanged on failure.
    pub fn set_argument(
        &mut self,
        registry: &VariantRegistry,
        node: NodeId,
        param: &str,
        child: NodeId,
    ) -> Result<(), SchemaError> {
        let parent = self.require(node)?;
        let def = registry.require(parent.variant.as_str())?;
        self.check_binding(def, param, child)?;
        if self.is_ancestor_or_self(child, node) {
            return Err(SchemaError::Cycle { node, child });
        }

        let previous = parent.argument(param);
        if let Some(previous) = previous {
            // Unhook first so removal does not touch the parent's bindings.
            if let Some(old) = self.nodes.get_mut(&previous) {
                old.owner = Owner::Detached;
            }
            if let Some(parent) = self.nodes.get_mut(&node) {
                parent.arguments.retain(|b| b.param != param);
            }
            self.remove_subtree(previous);
        }

        self.bind(node, param, child);
        Ok(())
    }

    /// Unbind and discard the child bound to `param`.
    ///
    /// Returns whether a child was bound.
    ///
    /// # Errors
    /// Returns an error if the node does not exist or the variant has no
    /// such parameter.
    pub fn clear_argument(
        &mut self,
        registry: &VariantRegistry,
        node: NodeId,
        param: &str,
    ) -> Result<bool, SchemaError> {
        let parent = self.require(node)?;
        let def = registry.require(parent.variant.as_str())?;
        if def.param_spec(param).is_none() {
            return Err(SchemaError::UnknownParameter {
                variant: def.id.clone(),
                param: param.to_string(),
            });
        }

        match parent.argument(param) {
            Some(child) => {
                self.remove_subtree(child);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a node and everything below it.
    ///
    /// If the node is bound as an argument, the parent's slot becomes unset.
    /// Trigger lists are not touched; callers holding the node in a list must
    /// remove it there. Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.get(&id) else {
            return 0;
        };

        if let Owner::Argument(parent) = node.owner {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.arguments.retain(|b| b.child != id);
            }
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.arguments.iter().map(|b| b.child));
                removed += 1;
            }
        }
        removed
    }

    /// Ids of a node and all its descendants, parent first.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(&next) {
                out.push(next);
                stack.extend(node.arguments.iter().rev().map(|b| b.child));
            }
        }
        out
    }

    /// Take an id-free snapshot of a subtree.
    #[must_use]
    pub fn snapshot(&self, id: NodeId) -> Option<NodeTree> {
        let node = self.nodes.get(&id)?;
        let mut tree = NodeTree::new(node.variant.clone());
        tree.literal = node.literal.clone();
        for binding in &node.arguments {
            tree.arguments
                .insert(binding.param.clone(), self.snapshot(binding.child)?);
        }
        Some(tree)
    }

    /// Rebuild a snapshot as new, detached nodes.
    ///
    /// Unset slots stay unset, so drafts survive a snapshot/insert cycle.
    ///
    /// # Errors
    /// Returns the first schema violation; nothing is left behind on failure.
    pub fn insert_tree(
        &mut self,
        registry: &VariantRegistry,
        tree: &NodeTree,
    ) -> Result<NodeId, SchemaError> {
        let def = registry.require(tree.variant.as_str())?;
        check_literal(def, tree.literal.as_ref())?;
        let root = self.insert(def, tree.literal.clone());

        for (param, child_tree) in &tree.arguments {
            let bound = match self.insert_tree(registry, child_tree) {
                Ok(child) => self
                    .set_argument(registry, root, param, child)
                    .inspect_err(|_| {
                        self.remove_subtree(child);
                    }),
                Err(e) => Err(e),
            };
            if let Err(e) = bound {
                self.remove_subtree(root);
                return Err(e);
            }
        }
        Ok(root)
    }

    pub(crate) fn set_owner(&mut self, id: NodeId, owner: Owner) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.owner = owner;
        }
    }

    pub(crate) fn require(&self, id: NodeId) -> Result<&Node, SchemaError> {
        self.nodes.get(&id).ok_or(SchemaError::UnknownNode(id))
    }

    fn insert(&mut self, def: &VariantDef, literal: Option<Literal>) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        self.nodes.insert(
            id,
            Node {
                id,
                variant: def.id.clone(),
                kind: def.kind,
                result: def.result,
                literal,
                arguments: Default::default(),
                owner: Owner::Detached,
            },
        );
        id
    }

    fn bind(&mut self, node: NodeId, param: &str, child: NodeId) {
        if let Some(parent) = self.nodes.get_mut(&node) {
            parent.arguments.push(Binding {
                param: param.to_string(),
                child,
            });
        }
        self.set_owner(child, Owner::Argument(node));
    }

    fn check_binding(&self, def: &VariantDef, param: &str, child: NodeId) -> Result<(), SchemaError> {
        let spec = def
            .param_spec(param)
            .ok_or_else(|| SchemaError::UnknownParameter {
                variant: def.id.clone(),
                param: param.to_string(),
            })?;

        let child_node = self.require(child)?;
        if !child_node.is_detached() {
            return Err(SchemaError::AlreadyBound(child));
        }
        if child_node.result != spec.ty {
            return Err(SchemaError::ArgumentType {
                variant: def.id.clone(),
                param: param.to_string(),
                expected: spec.ty,
                found: child_node.result,
            });
        }
        Ok(())
    }

    /// Whether `candidate` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == candidate {
                return true;
            }
            match self.nodes.get(&current).map(|n| n.owner) {
                Some(Owner::Argument(parent)) => current = parent,
                _ => return false,
            }
        }
    }
}

fn check_literal(def: &VariantDef, literal: Option<&Literal>) -> Result<(), SchemaError> {
    let found = literal.map(Literal::value_type);
    if def.literal == found {
        Ok(())
    } else {
        Err(SchemaError::LiteralMismatch {
            variant: def.id.clone(),
            expected: def.literal,
            found,
        })
    }
}

fn neutral_literal(ty: ValueType) -> Option<Literal> {
    match ty {
        ValueType::Int => Some(Literal::Int(0)),
        ValueType::Text => Some(Literal::Text(String::new())),
        ValueType::Bool => Some(Literal::Bool(false)),
        ValueType::Comparator => Some(Literal::Comparator(Comparator::Equal)),
        ValueType::DamageType => Some(Literal::DamageType(DamageType::Generic)),
        ValueType::Entity
        | ValueType::Block
        | ValueType::Item
        | ValueType::Region
        | ValueType::Unit => None,
    }
}
