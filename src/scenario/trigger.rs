//! Triggers: "when X happens, if Y holds, do Z".

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::graph::{Node, NodeId, NodeKind, ValueType};

/// Unique identifier for a trigger within its scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

impl TriggerId {
    /// Create a new trigger ID.
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

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Trigger({})", self.0)
    }
}

/// One of a trigger's three node lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerList {
    /// Event nodes; any one matching fires the trigger.
    Events,
    /// Boolean nodes; all must hold, checked in order.
    Conditions,
    /// Action nodes, executed in order.
    Actions,
}

impl TriggerList {
    /// All lists, in the order they run.
    pub const ALL: [TriggerList; 3] = [Self::Events, Self::Conditions, Self::Actions];

    /// Whether a node may be placed in this list.
    #[must_use]
    pub fn accepts(self, node: &Node) -> bool {
        match self {
            Self::Events => node.kind() == NodeKind::Event,
            Self::Conditions => {
                node.result_type() == ValueType::Bool
                    && !matches!(node.kind(), NodeKind::Event | NodeKind::Action)
            }
            Self::Actions => node.kind() == NodeKind::Action,
        }
    }

    /// Description of what the list accepts, for error messages.
    #[must_use]
    pub const fn expects(self) -> &'static str {
        match self {
            Self::Events => "an event",
            Self::Conditions => "a boolean condition",
            Self::Actions => "an action",
        }
    }
}

impl std::fmt::Display for TriggerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Events => "event",
            Self::Conditions => "condition",
            Self::Actions => "action",
        };
        f.write_str(name)
    }
}

/// A trigger definition.
///
/// The trigger exclusively owns the root nodes in its lists and, through
/// them, every node below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub(crate) id: TriggerId,
    pub(crate) name: String,
    pub(crate) enabled: bool,
    pub(crate) events: Vector<NodeId>,
    pub(crate) conditions: Vector<NodeId>,
    pub(crate) actions: Vector<NodeId>,
}

impl Trigger {
    pub(crate) fn new(id: TriggerId, name: String) -> Self {
        Self {
            id,
            name,
            enabled: true,
            events: Vector::new(),
            conditions: Vector::new(),
            actions: Vector::new(),
        }
    }

    /// The trigger's id.
    #[must_use]
    pub fn id(&self) -> TriggerId {
        self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the trigger listens for occurrences.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Event roots, in stored order.
    pub fn events(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.events.iter().copied()
    }

    /// Condition roots, in stored order.
    pub fn conditions(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.conditions.iter().copied()
    }

    /// Action roots, in stored order.
    pub fn actions(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.actions.iter().copied()
    }

    /// Roots of one list, in stored order.
    pub fn list(&self, list: TriggerList) -> impl Iterator<Item = NodeId> + '_ {
        self.list_ref(list).iter().copied()
    }

    /// Which list holds a root node, and where.
    #[must_use]
    pub fn position_of(&self, node: NodeId) -> Option<(TriggerList, usize)> {
        TriggerList::ALL.into_iter().find_map(|list| {
            self.list_ref(list)
                .iter()
                .position(|&n| n == node)
                .map(|index| (list, index))
        })
    }

    /// Total number of root nodes.
    #[must_use]
    pub fn root_count(&self) -> usize {
        self.events.len() + self.conditions.len() + self.actions.len()
    }

    pub(crate) fn list_ref(&self, list: TriggerList) -> &Vector<NodeId> {
        match list {
            TriggerList::Events => &self.events,
            TriggerList::Conditions => &self.conditions,
            TriggerList::Actions => &self.actions,
        }
    }

    pub(crate) fn list_mut(&mut self, list: TriggerList) -> &mut Vector<NodeId> {
        match list {
            TriggerList::Events => &mut self.events,
            TriggerList::Conditions => &mut self.conditions,
            TriggerList::Actions => &mut self.actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_id() {
        let id = TriggerId::new(5);
        assert_eq!(id.raw(), 5);
        assert_eq!(format!("{}", id), "Trigger(5)");
    }

    #[test]
    fn test_new_trigger_is_enabled_and_empty() {
        let trigger = Trigger::new(TriggerId::new(0), "reward".to_string());
        assert!(trigger.is_enabled());
        assert_eq!(trigger.name(), "reward");
        assert_eq!(trigger.root_count(), 0);
        assert_eq!(trigger.position_of(NodeId::new(1)), None);
    }

    #[test]
    fn test_position_of() {
        let mut trigger = Trigger::new(TriggerId::new(0), "t".to_string());
        trigger.list_mut(TriggerList::Actions).push_back(NodeId::new(4));
        trigger.list_mut(TriggerList::Actions).push_back(NodeId::new(7));

        assert_eq!(
            trigger.position_of(NodeId::new(7)),
            Some((TriggerList::Actions, 1))
        );
        assert_eq!(trigger.actions().collect::<Vec<_>>(), vec![NodeId::new(4), NodeId::new(7)]);
    }
}
