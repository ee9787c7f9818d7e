//! Conditional variants: comparisons and boolean connectives.

use crate::error::EvalError;
use crate::eval::{Evaluator, Value};
use crate::graph::{Comparator, Node, NodeKind, ValueType, VariantDef, VariantRegistry};

use super::add;

pub(super) fn register(registry: &mut VariantRegistry) {
    let defs = [
        VariantDef::new("IntCompare", NodeKind::Conditional, ValueType::Bool, int_compare)
            .param("left", ValueType::Int)
            .param("right", ValueType::Int)
            .param_with_default("comparator", ValueType::Comparator, Comparator::Equal)
            .with_display("{left} {comparator} {right}"),
        VariantDef::new("StringCompare", NodeKind::Conditional, ValueType::Bool, string_compare)
            .param("left", ValueType::Text)
            .param("right", ValueType::Text)
            .param_with_default("comparator", ValueType::Comparator, Comparator::Equal)
            .with_display("{left} {comparator} {right}"),
        VariantDef::new("DamageTypeIs", NodeKind::Conditional, ValueType::Bool, damage_type_is)
            .param("damageType", ValueType::DamageType)
            .param("expected", ValueType::DamageType)
            .with_display("{damageType} is {expected}"),
        VariantDef::new("PlayerInRegion", NodeKind::Conditional, ValueType::Bool, player_in_region)
            .param("player", ValueType::Entity)
            .param("region", ValueType::Region)
            .with_display("{player} is in {region}"),
        VariantDef::new("And", NodeKind::Conditional, ValueType::Bool, and)
            .param("left", ValueType::Bool)
            .param("right", ValueType::Bool)
            .with_display("({left} and {right})"),
        VariantDef::new("Or", NodeKind::Conditional, ValueType::Bool, or)
            .param("left", ValueType::Bool)
            .param("right", ValueType::Bool)
            .with_display("({left} or {right})"),
        VariantDef::new("Not", NodeKind::Conditional, ValueType::Bool, not)
            .param("value", ValueType::Bool)
            .with_display("not {value}"),
    ];
    for def in defs {
        add(registry, def);
    }
}

fn int_compare(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let left = ev.arg_int(node, "left")?;
    let right = ev.arg_int(node, "right")?;
    let comparator = ev.arg_comparator(node, "comparator")?;
    Ok(Value::Bool(comparator.compare(&left, &right)))
}

/// Ordinal comparison of the raw UTF-8 bytes.
fn string_compare(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let left = ev.arg_text(node, "left")?;
    let right = ev.arg_text(node, "right")?;
    let comparator = ev.arg_comparator(node, "comparator")?;
    Ok(Value::Bool(comparator.compare(left.as_str(), right.as_str())))
}

fn damage_type_is(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let actual = ev.arg_damage_type(node, "damageType")?;
    let expected = ev.arg_damage_type(node, "expected")?;
    Ok(Value::Bool(actual == expected))
}

fn player_in_region(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    let region = ev.arg_region(node, "region")?;
    let region = ev.region(node.id(), region)?;
    Ok(Value::Bool(ev.services().is_in_region(player, region)))
}

fn and(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    if !ev.arg_bool(node, "left")? {
        return Ok(Value::Bool(false));
    }
    Ok(Value::Bool(ev.arg_bool(node, "right")?))
}

fn or(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    if ev.arg_bool(node, "left")? {
        return Ok(Value::Bool(true));
    }
    Ok(Value::Bool(ev.arg_bool(node, "right")?))
}

fn not(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    Ok(Value::Bool(!ev.arg_bool(node, "value")?))
}

#[cfg(test)]
mod tests {
    use crate::core::{ActorId, ResourceKey, ScriptRng};
    use crate::domain::InMemoryWorld;
    use crate::error::EvalError;
    use crate::eval::{Context, Evaluator, Value};
    use crate::graph::{Comparator, DamageType, NodeTree, VariantRegistry};
    use crate::scenario::{RegionBounds, Scenario};
    use crate::triggers::Occurrence;

    fn eval_in(
        scenario: &mut Scenario,
        world: &mut InMemoryWorld,
        occurrence: &Occurrence,
        tree: NodeTree,
    ) -> Result<Value, EvalError> {
        let registry = VariantRegistry::with_builtins();
        let id = scenario.insert_tree(&registry, &tree).unwrap();
        let context = Context::from_occurrence(occurrence);
        let mut rng = ScriptRng::new(0);
        Evaluator::new(&registry, scenario, &context, world, &mut rng).evaluate(id)
    }

    fn eval(tree: NodeTree) -> Result<Value, EvalError> {
        eval_in(
            &mut Scenario::new("test"),
            &mut InMemoryWorld::new(),
            &Occurrence::player_spawned(ActorId::new(1)),
            tree,
        )
    }

    fn int_compare(left: i64, right: i64, comparator: Comparator) -> NodeTree {
        NodeTree::new("IntCompare")
            .with_arg("left", NodeTree::int(left))
            .with_arg("right", NodeTree::int(right))
            .with_arg("comparator", NodeTree::comparator(comparator))
    }

    #[test]
    fn test_int_compare_table() {
        let cases = [
            (5, 3, Comparator::Greater, true),
            (5, 5, Comparator::GreaterOrEqual, true),
            (5, 5, Comparator::Less, false),
            (2, 9, Comparator::NotEqual, true),
            (2, 9, Comparator::LessOrEqual, true),
            (9, 9, Comparator::Equal, true),
        ];
        for (left, right, comparator, expected) in cases {
            assert_eq!(
                eval(int_compare(left, right, comparator)),
                Ok(Value::Bool(expected)),
                "{left} {} {right}",
                comparator.symbol()
            );
        }
    }

    #[test]
    fn test_string_compare() {
        let tree = NodeTree::new("StringCompare")
            .with_arg("left", NodeTree::text("apple"))
            .with_arg("right", NodeTree::text("banana"))
            .with_arg("comparator", NodeTree::comparator(Comparator::Less));
        assert_eq!(eval(tree), Ok(Value::Bool(true)));

        let equal = NodeTree::new("StringCompare")
            .with_arg("left", NodeTree::text("a"))
            .with_arg("right", NodeTree::text("a"));
        assert_eq!(eval(equal), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_connectives() {
        let and = NodeTree::new("And")
            .with_arg("left", NodeTree::boolean(true))
            .with_arg("right", NodeTree::boolean(false));
        assert_eq!(eval(and), Ok(Value::Bool(false)));

        let or = NodeTree::new("Or")
            .with_arg("left", NodeTree::boolean(false))
            .with_arg("right", NodeTree::boolean(true));
        assert_eq!(eval(or), Ok(Value::Bool(true)));

        let not = NodeTree::new("Not").with_arg("value", NodeTree::boolean(false));
        assert_eq!(eval(not), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_and_short_circuits() {
        // The right side has an unset required slot and would fail
        let tree = NodeTree::new("And")
            .with_arg("left", NodeTree::boolean(false))
            .with_arg("right", NodeTree::new("Not"));
        assert_eq!(eval(tree), Ok(Value::Bool(false)));

        let tree = NodeTree::new("Or")
            .with_arg("left", NodeTree::boolean(true))
            .with_arg("right", NodeTree::new("Not"));
        assert_eq!(eval(tree), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_damage_type_is() {
        let occurrence = Occurrence::block_destroyed(ResourceKey::new("core", "stone"))
            .with_damage_type(DamageType::Fire);
        let tree = NodeTree::new("DamageTypeIs")
            .with_arg("damageType", NodeTree::new("EventDamageType"))
            .with_arg("expected", NodeTree::damage_type(DamageType::Fire));
        let result = eval_in(
            &mut Scenario::new("test"),
            &mut InMemoryWorld::new(),
            &occurrence,
            tree,
        );
        assert_eq!(result, Ok(Value::Bool(true)));
    }

    #[test]
    fn test_player_in_region() {
        let player = ActorId::new(1);
        let mut scenario = Scenario::new("test");
        let region = scenario.add_region("pit", RegionBounds::new([0.0; 3], [10.0; 3]));
        let mut world = InMemoryWorld::new().with_player(player, "Alex");
        world.set_position(player, [5.0, 5.0, 5.0]);

        let tree = || {
            NodeTree::new("PlayerInRegion")
                .with_arg("player", NodeTree::new("TriggeringPlayer"))
                .with_arg("region", NodeTree::region(region))
        };
        let occurrence = Occurrence::player_spawned(player);
        assert_eq!(
            eval_in(&mut scenario, &mut world, &occurrence, tree()),
            Ok(Value::Bool(true))
        );

        world.set_position(player, [50.0, 5.0, 5.0]);
        assert_eq!(
            eval_in(&mut scenario, &mut world, &occurrence, tree()),
            Ok(Value::Bool(false))
        );
    }
}
