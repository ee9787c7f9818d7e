//! Editing operations, one per GUI request.
//!
//! Every operation validates before it mutates: a rejected request returns a
//! `SchemaError` and leaves the scenario unchanged.

use tracing::debug;
use uuid::Uuid;

use crate::error::SchemaError;
use crate::eval::display_node;
use crate::graph::{Literal, NodeId, NodeTree, Owner, VariantRegistry};

use super::region::{Region, RegionBounds, RegionId};
use super::trigger::{Trigger, TriggerId, TriggerList};
use super::Scenario;

impl Scenario {
    /// Append a new, enabled, empty trigger.
    pub fn add_trigger(&mut self, name: impl Into<String>) -> TriggerId {
        let id = TriggerId::new(self.next_trigger);
        self.next_trigger += 1;
        self.triggers.push_back(Trigger::new(id, name.into()));
        id
    }

    /// Delete a trigger together with every node it owns.
    ///
    /// Returns the number of nodes removed.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTrigger`.
    pub fn delete_trigger(&mut self, id: TriggerId) -> Result<usize, SchemaError> {
        let index = self
            .trigger_index(id)
            .ok_or(SchemaError::UnknownTrigger(id))?;
        let trigger = self.triggers.remove(index);

        let removed: usize = TriggerList::ALL
            .into_iter()
            .flat_map(|list| trigger.list(list).collect::<Vec<_>>())
            .map(|root| self.nodes.remove_subtree(root))
            .sum();
        debug!(trigger = %id, removed, "deleted trigger");
        Ok(removed)
    }

    /// Rename a trigger.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTrigger`.
    pub fn rename_trigger(&mut self, id: TriggerId, name: impl Into<String>) -> Result<(), SchemaError> {
        self.trigger_mut(id)?.name = name.into();
        Ok(())
    }

    /// Enable or disable a trigger. Disabled triggers never match.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTrigger`.
    pub fn set_trigger_enabled(&mut self, id: TriggerId, enabled: bool) -> Result<(), SchemaError> {
        self.trigger_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// Move a trigger to a new position in dispatch order.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTrigger` or `SchemaError::IndexOutOfBounds`.
    pub fn move_trigger(&mut self, id: TriggerId, to: usize) -> Result<(), SchemaError> {
        let from = self
            .trigger_index(id)
            .ok_or(SchemaError::UnknownTrigger(id))?;
        let len = self.triggers.len();
        if to >= len {
            return Err(SchemaError::IndexOutOfBounds { index: to, len });
        }
        let trigger = self.triggers.remove(from);
        self.triggers.insert(to, trigger);
        Ok(())
    }

    /// Add a draft event of `variant` to a trigger.
    ///
    /// # Errors
    /// Returns an error if the trigger or variant is unknown, or the variant
    /// is not an event.
    pub fn add_event(
        &mut self,
        registry: &VariantRegistry,
        trigger: TriggerId,
        variant: &str,
    ) -> Result<NodeId, SchemaError> {
        self.add_draft(registry, trigger, TriggerList::Events, variant)
    }

    /// Add a draft condition of `variant` to a trigger.
    ///
    /// # Errors
    /// Returns an error if the trigger or variant is unknown, or the variant
    /// does not produce a boolean.
    pub fn add_condition(
        &mut self,
        registry: &VariantRegistry,
        trigger: TriggerId,
        variant: &str,
    ) -> Result<NodeId, SchemaError> {
        self.add_draft(registry, trigger, TriggerList::Conditions, variant)
    }

    /// Add a draft action of `variant` to a trigger.
    ///
    /// # Errors
    /// Returns an error if the trigger or variant is unknown, or the variant
    /// is not an action.
    pub fn add_action(
        &mut self,
        registry: &VariantRegistry,
        trigger: TriggerId,
        variant: &str,
    ) -> Result<NodeId, SchemaError> {
        self.add_draft(registry, trigger, TriggerList::Actions, variant)
    }

    /// Append an already built, detached node to one of a trigger's lists.
    ///
    /// # Errors
    /// Rejects unknown triggers or nodes, nodes that are already owned, and
    /// nodes the list does not accept.
    pub fn attach(&mut self, trigger: TriggerId, list: TriggerList, node: NodeId) -> Result<(), SchemaError> {
        let index = self
            .trigger_index(trigger)
            .ok_or(SchemaError::UnknownTrigger(trigger))?;
        let root = self.nodes.require(node)?;
        if !root.is_detached() {
            return Err(SchemaError::AlreadyBound(node));
        }
        if !list.accepts(root) {
            return Err(SchemaError::WrongKind {
                variant: root.variant().clone(),
                expected: list.expects(),
                found: root.kind(),
            });
        }

        self.nodes.set_owner(node, Owner::Trigger(trigger));
        if let Some(t) = self.triggers.get_mut(index) {
            t.list_mut(list).push_back(node);
        }
        Ok(())
    }

    /// Delete a node and its subtree.
    ///
    /// A list root is removed from its trigger's list; an argument child
    /// leaves its parent's slot unset. Returns the number of nodes removed.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownNode`.
    pub fn delete_node(&mut self, node: NodeId) -> Result<usize, SchemaError> {
        let owner = self.nodes.require(node)?.owner();
        if let Owner::Trigger(trigger) = owner {
            let t = self.trigger_mut(trigger)?;
            if let Some((list, index)) = t.position_of(node) {
                t.list_mut(list).remove(index);
            }
        }
        Ok(self.nodes.remove_subtree(node))
    }

    /// Move a list root to a new position within its list.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownNode` if the node is not a list root, or
    /// `SchemaError::IndexOutOfBounds`.
    pub fn move_node(&mut self, node: NodeId, to: usize) -> Result<(), SchemaError> {
        let Owner::Trigger(trigger) = self.nodes.require(node)?.owner() else {
            return Err(SchemaError::UnknownNode(node));
        };
        let t = self.trigger_mut(trigger)?;
        let (list, from) = t.position_of(node).ok_or(SchemaError::UnknownNode(node))?;
        let nodes = t.list_mut(list);
        let len = nodes.len();
        if to >= len {
            return Err(SchemaError::IndexOutOfBounds { index: to, len });
        }
        let moved = nodes.remove(from);
        nodes.insert(to, moved);
        Ok(())
    }

    /// Create a fully specified, detached node.
    ///
    /// # Errors
    /// See [`NodeArena::create_node`](crate::graph::NodeArena::create_node).
    pub fn create_node(
        &mut self,
        registry: &VariantRegistry,
        variant: &str,
        args: &[(&str, NodeId)],
        literal: Option<Literal>,
    ) -> Result<NodeId, SchemaError> {
        self.nodes.create_node(registry, variant, args, literal)
    }

    /// Create a detached node with every slot unset.
    ///
    /// # Errors
    /// See [`NodeArena::create_draft`](crate::graph::NodeArena::create_draft).
    pub fn create_draft(&mut self, registry: &VariantRegistry, variant: &str) -> Result<NodeId, SchemaError> {
        self.nodes.create_draft(registry, variant)
    }

    /// Build a detached subtree from a snapshot.
    ///
    /// # Errors
    /// See [`NodeArena::insert_tree`](crate::graph::NodeArena::insert_tree).
    pub fn insert_tree(&mut self, registry: &VariantRegistry, tree: &NodeTree) -> Result<NodeId, SchemaError> {
        self.nodes.insert_tree(registry, tree)
    }

    /// Bind a detached child to a parameter, discarding the previous child.
    ///
    /// # Errors
    /// See [`NodeArena::set_argument`](crate::graph::NodeArena::set_argument).
    pub fn set_argument(
        &mut self,
        registry: &VariantRegistry,
        node: NodeId,
        param: &str,
        child: NodeId,
    ) -> Result<(), SchemaError> {
        self.nodes.set_argument(registry, node, param, child)
    }

    /// Unbind and discard the child of a parameter.
    ///
    /// # Errors
    /// See [`NodeArena::clear_argument`](crate::graph::NodeArena::clear_argument).
    pub fn clear_argument(
        &mut self,
        registry: &VariantRegistry,
        node: NodeId,
        param: &str,
    ) -> Result<bool, SchemaError> {
        self.nodes.clear_argument(registry, node, param)
    }

    /// Replace the literal of a value node.
    ///
    /// # Errors
    /// See [`NodeArena::set_literal`](crate::graph::NodeArena::set_literal).
    pub fn set_literal(&mut self, node: NodeId, literal: Literal) -> Result<(), SchemaError> {
        self.nodes.set_literal(node, literal)
    }

    /// Editor text for a node.
    #[must_use]
    pub fn display(&self, registry: &VariantRegistry, node: NodeId) -> String {
        display_node(registry, self, node)
    }

    /// Add a region without a stable id.
    pub fn add_region(&mut self, name: impl Into<String>, bounds: RegionBounds) -> RegionId {
        self.push_region(name.into(), None, bounds)
    }

    /// Add a region with a freshly generated stable id.
    pub fn add_stable_region(&mut self, name: impl Into<String>, bounds: RegionBounds) -> RegionId {
        self.push_region(name.into(), Some(Uuid::new_v4()), bounds)
    }

    /// Add a region with a known stable id (e.g. one shared with other
    /// scenarios).
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateStableId` if another region already
    /// uses the stable id.
    pub fn add_region_with_stable_id(
        &mut self,
        name: impl Into<String>,
        stable_id: Uuid,
        bounds: RegionBounds,
    ) -> Result<RegionId, SchemaError> {
        if self.region_by_stable_id(stable_id).is_some() {
            return Err(SchemaError::DuplicateStableId(stable_id));
        }
        Ok(self.push_region(name.into(), Some(stable_id), bounds))
    }

    /// Rename a region.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownRegion`.
    pub fn rename_region(&mut self, id: RegionId, name: impl Into<String>) -> Result<(), SchemaError> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(SchemaError::UnknownRegion(id))?;
        region.name = name.into();
        Ok(())
    }

    /// Remove a region. Nodes still referring to it become dangling and fail
    /// at evaluation.
    pub fn remove_region(&mut self, id: RegionId) -> Option<Region> {
        let index = self.regions.iter().position(|r| r.id == id)?;
        Some(self.regions.remove(index))
    }

    fn push_region(&mut self, name: String, stable_id: Option<Uuid>, bounds: RegionBounds) -> RegionId {
        let id = RegionId::new(self.next_region);
        self.next_region += 1;
        self.regions.push_back(Region {
            id,
            name,
            stable_id,
            bounds,
        });
        id
    }

    fn add_draft(
        &mut self,
        registry: &VariantRegistry,
        trigger: TriggerId,
        list: TriggerList,
        variant: &str,
    ) -> Result<NodeId, SchemaError> {
        if self.trigger_index(trigger).is_none() {
            return Err(SchemaError::UnknownTrigger(trigger));
        }
        let node = self.nodes.create_draft(registry, variant)?;
        if let Err(e) = self.attach(trigger, list, node) {
            self.nodes.remove_subtree(node);
            return Err(e);
        }
        Ok(node)
    }

    fn trigger_mut(&mut self, id: TriggerId) -> Result<&mut Trigger, SchemaError> {
        self.triggers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(SchemaError::UnknownTrigger(id))
    }
}
