//! Runtime values produced by evaluation.

use serde::{Deserialize, Serialize};

use crate::core::{ActorId, ResourceKey};
use crate::graph::{Comparator, DamageType, ValueType};
use crate::scenario::RegionId;

/// A concrete value of one of the language's types.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Integer.
    Int(i64),
    /// Text.
    Text(String),
    /// Boolean.
    Bool(bool),
    /// Comparison operator.
    Comparator(Comparator),
    /// Damage cause.
    DamageType(DamageType),
    /// Live actor.
    Entity(ActorId),
    /// Block type.
    Block(ResourceKey),
    /// Item type.
    Item(ResourceKey),
    /// Scenario region.
    Region(RegionId),
    /// Result of actions and events.
    Unit,
}

impl Value {
    /// The type of this value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Text(_) => ValueType::Text,
            Self::Bool(_) => ValueType::Bool,
            Self::Comparator(_) => ValueType::Comparator,
            Self::DamageType(_) => ValueType::DamageType,
            Self::Entity(_) => ValueType::Entity,
            Self::Block(_) => ValueType::Block,
            Self::Item(_) => ValueType::Item,
            Self::Region(_) => ValueType::Region,
            Self::Unit => ValueType::Unit,
        }
    }

    /// The integer, if this is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The text, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Comparator(c) => f.write_str(c.symbol()),
            Self::DamageType(d) => f.write_str(d.name()),
            Self::Entity(a) => write!(f, "{a}"),
            Self::Block(k) | Self::Item(k) => write!(f, "{k}"),
            Self::Region(r) => write!(f, "{r}"),
            Self::Unit => f.write_str("()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type() {
        assert_eq!(Value::Int(1).value_type(), ValueType::Int);
        assert_eq!(Value::Unit.value_type(), ValueType::Unit);
        assert_eq!(Value::Entity(ActorId::new(1)).value_type(), ValueType::Entity);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(4).as_int(), Some(4));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Text("hi".to_string()).as_text(), Some("hi"));
        assert_eq!(Value::Int(4).as_bool(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Comparator(Comparator::GreaterOrEqual).to_string(), ">=");
        assert_eq!(Value::Block(ResourceKey::new("core", "dirt")).to_string(), "core:dirt");
        assert_eq!(Value::Text("x y".to_string()).to_string(), "x y");
    }
}
