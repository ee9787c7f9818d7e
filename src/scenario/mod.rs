//! Scenario: the root aggregate of a script.
//!
//! A scenario owns the node arena, the ordered list of triggers and the
//! ordered list of regions. Editing requests from the GUI are methods on
//! [`Scenario`] (see the `editor` submodule); dispatch only ever borrows it
//! immutably, so edits and evaluation cannot interleave.
//!
//! ## Key Components
//!
//! - [`Scenario`]: the aggregate, with persistence via `bincode`
//! - [`Trigger`], [`TriggerId`], [`TriggerList`]: rule definitions
//! - [`Region`], [`RegionId`], [`RegionBounds`]: named world volumes
//!
//! ## Example Usage
//!
//! ```
//! use scenario_script::graph::VariantRegistry;
//! use scenario_script::scenario::Scenario;
//!
//! let registry = VariantRegistry::with_builtins();
//! let mut scenario = Scenario::new("demo");
//!
//! let trigger = scenario.add_trigger("greet");
//! let event = scenario.add_event(&registry, trigger, "PlayerSpawned").unwrap();
//! let action = scenario.add_action(&registry, trigger, "SendChatMessage").unwrap();
//!
//! assert_eq!(scenario.display(&registry, event), "when a player spawns");
//! assert_eq!(scenario.display(&registry, action), "say <message>");
//!
//! // Deleting the trigger deletes its nodes
//! scenario.delete_trigger(trigger).unwrap();
//! assert!(scenario.nodes().is_empty());
//! ```

mod editor;
mod region;
mod trigger;

pub use region::{Region, RegionBounds, RegionId};
pub use trigger::{Trigger, TriggerId, TriggerList};

use im::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::graph::NodeArena;

/// Root aggregate of a script.
///
/// Cloning is O(1): the arena and lists are persistent structures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    nodes: NodeArena,
    triggers: Vector<Trigger>,
    regions: Vector<Region>,
    next_trigger: u32,
    next_region: u32,
}

impl Scenario {
    /// Create an empty scenario.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The scenario's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node arena.
    #[must_use]
    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut NodeArena {
        &mut self.nodes
    }

    /// Triggers in dispatch order.
    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    /// Number of triggers.
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Get a trigger by ID.
    #[must_use]
    pub fn trigger(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.id == id)
    }

    /// Find the first trigger with a given name.
    #[must_use]
    pub fn trigger_by_name(&self, name: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.name == name)
    }

    /// Regions in creation order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Get a region by ID.
    #[must_use]
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Find a region by its globally stable id.
    #[must_use]
    pub fn region_by_stable_id(&self, stable_id: Uuid) -> Option<&Region> {
        self.regions.iter().find(|r| r.stable_id == Some(stable_id))
    }

    /// Serialize to a compact binary snapshot.
    ///
    /// # Errors
    /// Returns `ScriptError::Persistence` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a snapshot written by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    /// Returns `ScriptError::Persistence` if the bytes are not a snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn trigger_index(&self, id: TriggerId) -> Option<usize> {
        self.triggers.iter().position(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeTree, VariantRegistry};

    #[test]
    fn test_new_scenario_is_empty() {
        let scenario = Scenario::new("empty");
        assert_eq!(scenario.name(), "empty");
        assert_eq!(scenario.trigger_count(), 0);
        assert!(scenario.nodes().is_empty());
        assert_eq!(scenario.regions().count(), 0);
    }

    #[test]
    fn test_bytes_round_trip() {
        let registry = VariantRegistry::with_builtins();
        let mut scenario = Scenario::new("saved");
        let region = scenario.add_region("spawn", RegionBounds::new([0.0; 3], [8.0; 3]));
        let trigger = scenario.add_trigger("t");
        let event = scenario
            .insert_tree(
                &registry,
                &NodeTree::new("RegionEntered").with_arg("region", NodeTree::region(region)),
            )
            .unwrap();
        scenario
            .attach(trigger, TriggerList::Events, event)
            .unwrap();

        let bytes = scenario.to_bytes().unwrap();
        let restored = Scenario::from_bytes(&bytes).unwrap();

        assert_eq!(restored.name(), "saved");
        assert_eq!(restored.trigger(trigger), scenario.trigger(trigger));
        assert_eq!(restored.nodes().snapshot(event), scenario.nodes().snapshot(event));
        assert_eq!(restored.region(region), scenario.region(region));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Scenario::from_bytes(&[0xff, 0x01]).is_err());
    }

    #[test]
    fn test_clone_is_snapshot() {
        let mut scenario = Scenario::new("s");
        scenario.add_trigger("a");
        let snapshot = scenario.clone();
        scenario.add_trigger("b");

        assert_eq!(snapshot.trigger_count(), 1);
        assert_eq!(scenario.trigger_count(), 2);
    }
}
