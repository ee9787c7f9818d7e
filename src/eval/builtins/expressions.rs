//! Expression variants: context facts, arithmetic, text and inventory reads.

use crate::error::EvalError;
use crate::eval::{Evaluator, Value};
use crate::graph::{Node, NodeKind, ValueType, VariantDef, VariantRegistry};

use super::add;

pub(super) fn register(registry: &mut VariantRegistry) {
    let defs = [
        VariantDef::new("TriggeringPlayer", NodeKind::Expression, ValueType::Entity, triggering_player)
            .with_display("triggering player"),
        VariantDef::new("DestroyedBlock", NodeKind::Expression, ValueType::Block, destroyed_block)
            .with_display("destroyed block"),
        VariantDef::new("TriggeringRegion", NodeKind::Expression, ValueType::Region, triggering_region)
            .with_display("triggering region"),
        VariantDef::new("EventDamageType", NodeKind::Expression, ValueType::DamageType, event_damage_type)
            .with_display("damage type"),
        VariantDef::new("RandomInt", NodeKind::Expression, ValueType::Int, random_int)
            .param("low", ValueType::Int)
            .param("high", ValueType::Int)
            .with_display("random number between {low} and {high}"),
        VariantDef::new("AddInt", NodeKind::Expression, ValueType::Int, add_int)
            .param("left", ValueType::Int)
            .param("right", ValueType::Int)
            .with_display("({left} + {right})"),
        VariantDef::new("SubtractInt", NodeKind::Expression, ValueType::Int, subtract_int)
            .param("left", ValueType::Int)
            .param("right", ValueType::Int)
            .with_display("({left} - {right})"),
        VariantDef::new("CountOfBlock", NodeKind::Expression, ValueType::Int, count_of_block)
            .param("player", ValueType::Entity)
            .param("block", ValueType::Block)
            .with_display("number of {block} held by {player}"),
        VariantDef::new("CountOfItem", NodeKind::Expression, ValueType::Int, count_of_item)
            .param("player", ValueType::Entity)
            .param("item", ValueType::Item)
            .with_display("number of {item} held by {player}"),
        VariantDef::new("ConcatString", NodeKind::Expression, ValueType::Text, concat_string)
            .param("string1", ValueType::Text)
            .param("string2", ValueType::Text)
            .with_display("{string1} + {string2}"),
        VariantDef::new("IntToString", NodeKind::Expression, ValueType::Text, int_to_string)
            .param("value", ValueType::Int)
            .with_display("text of {value}"),
        VariantDef::new("PlayerName", NodeKind::Expression, ValueType::Text, player_name)
            .param("player", ValueType::Entity)
            .with_display("name of {player}"),
    ];
    for def in defs {
        add(registry, def);
    }
}

fn triggering_player(ev: &mut Evaluator<'_>, _: &Node) -> Result<Value, EvalError> {
    ev.context()
        .triggering_actor()
        .map(Value::Entity)
        .ok_or(EvalError::MissingContext("triggering player"))
}

fn destroyed_block(ev: &mut Evaluator<'_>, _: &Node) -> Result<Value, EvalError> {
    ev.context()
        .destroyed_block()
        .cloned()
        .map(Value::Block)
        .ok_or(EvalError::MissingContext("destroyed block"))
}

fn triggering_region(ev: &mut Evaluator<'_>, _: &Node) -> Result<Value, EvalError> {
    ev.context()
        .region()
        .map(Value::Region)
        .ok_or(EvalError::MissingContext("region"))
}

fn event_damage_type(ev: &mut Evaluator<'_>, _: &Node) -> Result<Value, EvalError> {
    ev.context()
        .damage_type()
        .map(Value::DamageType)
        .ok_or(EvalError::MissingContext("damage type"))
}

/// Uniform draw from the closed range; reversed bounds are swapped.
fn random_int(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let low = ev.arg_int(node, "low")?;
    let high = ev.arg_int(node, "high")?;
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    Ok(Value::Int(ev.rng().next_in_range(low, high)))
}

fn add_int(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let left = ev.arg_int(node, "left")?;
    let right = ev.arg_int(node, "right")?;
    Ok(Value::Int(left.saturating_add(right)))
}

fn subtract_int(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let left = ev.arg_int(node, "left")?;
    let right = ev.arg_int(node, "right")?;
    Ok(Value::Int(left.saturating_sub(right)))
}

fn count_of_block(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    let block = ev.arg_block(node, "block")?;
    Ok(Value::Int(ev.services().count_blocks(player, &block)))
}

fn count_of_item(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    let item = ev.arg_item(node, "item")?;
    Ok(Value::Int(ev.services().count_items(player, &item)))
}

fn concat_string(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let mut out = ev.arg_text(node, "string1")?;
    out.push_str(&ev.arg_text(node, "string2")?);
    Ok(Value::Text(out))
}

fn int_to_string(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    Ok(Value::Text(ev.arg_int(node, "value")?.to_string()))
}

fn player_name(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    ev.services()
        .player_name(player)
        .map(Value::Text)
        .ok_or_else(|| EvalError::DanglingReference {
            node: node.id(),
            reference: player.to_string(),
        })
}
