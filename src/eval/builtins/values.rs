//! Value variants: nodes carrying a literal.

use crate::core::ResourceKey;
use crate::error::EvalError;
use crate::eval::{Evaluator, Value};
use crate::graph::{
    Comparator, DamageType, Literal, Node, NodeKind, NodeTree, ValueType, VariantDef,
    VariantRegistry,
};
use crate::scenario::RegionId;

use super::add;

const VALUE_VARIANTS: [(&str, ValueType); 8] = [
    ("IntValue", ValueType::Int),
    ("StringValue", ValueType::Text),
    ("BooleanValue", ValueType::Bool),
    ("ComparatorValue", ValueType::Comparator),
    ("DamageTypeValue", ValueType::DamageType),
    ("BlockValue", ValueType::Block),
    ("ItemValue", ValueType::Item),
    ("RegionValue", ValueType::Region),
];

pub(super) fn register(registry: &mut VariantRegistry) {
    for (name, ty) in VALUE_VARIANTS {
        add(
            registry,
            VariantDef::new(name, NodeKind::Value, ty, literal).with_literal(),
        );
    }
}

fn literal(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let literal = node.literal().ok_or_else(|| EvalError::MissingArgument {
        node: node.id(),
        param: "literal".to_string(),
    })?;
    ev.literal_value(node.id(), literal)
}

/// Shorthand constructors for value trees.
impl NodeTree {
    /// An `IntValue` leaf.
    #[must_use]
    pub fn int(value: i64) -> Self {
        Self::new("IntValue").with_literal(value)
    }

    /// A `StringValue` leaf.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new("StringValue").with_literal(Literal::Text(value.into()))
    }

    /// A `BooleanValue` leaf.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::new("BooleanValue").with_literal(value)
    }

    /// A `ComparatorValue` leaf.
    #[must_use]
    pub fn comparator(value: Comparator) -> Self {
        Self::new("ComparatorValue").with_literal(value)
    }

    /// A `DamageTypeValue` leaf.
    #[must_use]
    pub fn damage_type(value: DamageType) -> Self {
        Self::new("DamageTypeValue").with_literal(value)
    }

    /// A `BlockValue` leaf.
    ///
    /// Panics if `key` is not a valid resource key.
    #[must_use]
    pub fn block(key: &str) -> Self {
        Self::new("BlockValue").with_literal(Literal::Block(parse_key(key)))
    }

    /// An `ItemValue` leaf.
    ///
    /// Panics if `key` is not a valid resource key.
    #[must_use]
    pub fn item(key: &str) -> Self {
        Self::new("ItemValue").with_literal(Literal::Item(parse_key(key)))
    }

    /// A `RegionValue` leaf.
    #[must_use]
    pub fn region(id: RegionId) -> Self {
        Self::new("RegionValue").with_literal(Literal::Region(id))
    }
}

fn parse_key(key: &str) -> ResourceKey {
    ResourceKey::parse(key).unwrap_or_else(|| panic!("malformed resource key {key:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_value_variants_registered() {
        let registry = VariantRegistry::with_builtins();
        for (name, ty) in VALUE_VARIANTS {
            let def = registry.get(name).unwrap();
            assert_eq!(def.kind, NodeKind::Value);
            assert_eq!(def.literal, Some(ty));
            assert!(def.params.is_empty());
        }
    }

    #[test]
    fn test_tree_shorthands() {
        assert_eq!(NodeTree::int(3).literal, Some(Literal::Int(3)));
        assert_eq!(NodeTree::boolean(true).variant.as_str(), "BooleanValue");
        assert_eq!(
            NodeTree::block("core:dirt").literal,
            Some(Literal::Block(ResourceKey::new("core", "dirt")))
        );
    }
}
