//! Type vocabulary of the rule language.
//!
//! Every node produces a value of exactly one [`ValueType`], fixed by its
//! variant. Value nodes carry a [`Literal`] of that same type.

use serde::{Deserialize, Serialize};

use crate::core::ResourceKey;
use crate::scenario::RegionId;

/// The broad role of a node in a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Carries a literal.
    Value,
    /// Computes a value from its arguments or the occurrence context.
    Expression,
    /// Performs a side effect.
    Action,
    /// Names an occurrence a trigger listens for.
    Event,
    /// Computes a boolean; usable as a trigger condition.
    Conditional,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Value => "Value",
            Self::Expression => "Expression",
            Self::Action => "Action",
            Self::Event => "Event",
            Self::Conditional => "Conditional",
        };
        f.write_str(name)
    }
}

/// Result type of a node, and declared type of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// 64-bit signed integer.
    Int,
    /// UTF-8 text.
    Text,
    /// Boolean.
    Bool,
    /// Comparison operator.
    Comparator,
    /// Cause of damage.
    DamageType,
    /// Simulation actor.
    Entity,
    /// Block type.
    Block,
    /// Item type.
    Item,
    /// Scenario region.
    Region,
    /// No value; the result type of actions and events.
    Unit,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Comparison operator used by `IntCompare` and `StringCompare`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
}

impl Comparator {
    /// All comparators, in editor dropdown order.
    pub const ALL: [Comparator; 6] = [
        Self::Equal,
        Self::NotEqual,
        Self::Less,
        Self::LessOrEqual,
        Self::Greater,
        Self::GreaterOrEqual,
    ];

    /// Operator glyph shown in the editor.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }

    /// Symbolic name used by the codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::Less => "Less",
            Self::LessOrEqual => "LessOrEqual",
            Self::Greater => "Greater",
            Self::GreaterOrEqual => "GreaterOrEqual",
        }
    }

    /// Look up a comparator by symbolic name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Look up a comparator by glyph.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.symbol() == symbol)
    }

    /// Apply the comparison `left <op> right`.
    pub fn compare<T: Ord + ?Sized>(self, left: &T, right: &T) -> bool {
        match self {
            Self::Equal => left == right,
            Self::NotEqual => left != right,
            Self::Less => left < right,
            Self::LessOrEqual => left <= right,
            Self::Greater => left > right,
            Self::GreaterOrEqual => left >= right,
        }
    }
}

/// Cause of damage carried by `BlockDestroyed` occurrences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Unspecified cause.
    Generic,
    /// Hand-to-hand or tool damage.
    Melee,
    /// Arrows, thrown objects.
    Projectile,
    /// Explosions.
    Explosion,
    /// Falling.
    Fall,
    /// Fire and lava.
    Fire,
    /// Drowning.
    Drowning,
}

impl DamageType {
    /// All damage types.
    pub const ALL: [DamageType; 7] = [
        Self::Generic,
        Self::Melee,
        Self::Projectile,
        Self::Explosion,
        Self::Fall,
        Self::Fire,
        Self::Drowning,
    ];

    /// Symbolic name used by the codec and the editor.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "Generic",
            Self::Melee => "Melee",
            Self::Projectile => "Projectile",
            Self::Explosion => "Explosion",
            Self::Fall => "Fall",
            Self::Fire => "Fire",
            Self::Drowning => "Drowning",
        }
    }

    /// Look up a damage type by symbolic name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

/// Literal carried by a value node.
///
/// `Int` and `Text` are the scalar literals; `Bool`, `Comparator` and
/// `DamageType` are enum literals; `Block`, `Item` and `Region` are opaque
/// references to domain objects that may stop existing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    /// Integer literal.
    Int(i64),
    /// Text literal.
    Text(String),
    /// Boolean literal.
    Bool(bool),
    /// Comparison operator.
    Comparator(Comparator),
    /// Damage cause.
    DamageType(DamageType),
    /// Block registry reference.
    Block(ResourceKey),
    /// Item registry reference.
    Item(ResourceKey),
    /// Scenario region reference.
    Region(RegionId),
}

impl Literal {
    /// The type of value this literal evaluates to.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Text(_) => ValueType::Text,
            Self::Bool(_) => ValueType::Bool,
            Self::Comparator(_) => ValueType::Comparator,
            Self::DamageType(_) => ValueType::DamageType,
            Self::Block(_) => ValueType::Block,
            Self::Item(_) => ValueType::Item,
            Self::Region(_) => ValueType::Region,
        }
    }

    /// Whether this literal refers to a domain object.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Block(_) | Self::Item(_) | Self::Region(_))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Comparator> for Literal {
    fn from(value: Comparator) -> Self {
        Self::Comparator(value)
    }
}

impl From<DamageType> for Literal {
    fn from(value: DamageType) -> Self {
        Self::DamageType(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_compare() {
        assert!(Comparator::Greater.compare(&5, &3));
        assert!(!Comparator::Greater.compare(&3, &5));
        assert!(Comparator::Equal.compare(&5, &5));
        assert!(!Comparator::NotEqual.compare(&5, &5));
        assert!(Comparator::LessOrEqual.compare(&5, &5));
        assert!(Comparator::Less.compare("abc", "abd"));
    }

    #[test]
    fn test_comparator_names() {
        for comparator in Comparator::ALL {
            assert_eq!(Comparator::from_name(comparator.name()), Some(comparator));
            assert_eq!(Comparator::from_symbol(comparator.symbol()), Some(comparator));
        }
        assert_eq!(Comparator::from_symbol(">="), Some(Comparator::GreaterOrEqual));
        assert_eq!(Comparator::from_name(">="), None);
    }

    #[test]
    fn test_damage_type_names() {
        for damage in DamageType::ALL {
            assert_eq!(DamageType::from_name(damage.name()), Some(damage));
        }
        assert_eq!(DamageType::from_name("Lightning"), None);
    }

    #[test]
    fn test_literal_value_type() {
        assert_eq!(Literal::from(3).value_type(), ValueType::Int);
        assert_eq!(Literal::from("x").value_type(), ValueType::Text);
        assert_eq!(Literal::from(true).value_type(), ValueType::Bool);
        assert_eq!(
            Literal::Block(ResourceKey::new("core", "stone")).value_type(),
            ValueType::Block
        );
        assert!(Literal::Region(RegionId::new(1)).is_reference());
        assert!(!Literal::Comparator(Comparator::Less).is_reference());
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueType::DamageType.to_string(), "DamageType");
        assert_eq!(NodeKind::Conditional.to_string(), "Conditional");
    }

    #[test]
    fn test_literal_deserialize_checks_resource_keys() {
        let ok: Literal = serde_json::from_str(r#"{"Block":"core:stone"}"#).unwrap();
        assert_eq!(ok, Literal::Block(ResourceKey::new("core", "stone")));
        assert!(serde_json::from_str::<Literal>(r#"{"Block":"core:st\none"}"#).is_err());
        assert!(serde_json::from_str::<Literal>(r#"{"Item":"core:"}"#).is_err());
    }
}
