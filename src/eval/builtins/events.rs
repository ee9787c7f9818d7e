//! Event variants. An event node evaluates to `Unit`; the engine matches it
//! by the occurrence kind its variant listens for and, for region-scoped
//! events, by its `region` argument.

use crate::error::EvalError;
use crate::eval::{Evaluator, Value};
use crate::graph::{Node, NodeKind, ValueType, VariantDef, VariantRegistry};
use crate::triggers::OccurrenceKind;

use super::add;

pub(super) fn register(registry: &mut VariantRegistry) {
    let defs = [
        event("BlockDestroyed", OccurrenceKind::BlockDestroyed)
            .with_display("when a block is destroyed"),
        event("PlayerSpawned", OccurrenceKind::PlayerSpawned).with_display("when a player spawns"),
        event("PlayerRespawned", OccurrenceKind::PlayerRespawned)
            .with_display("when a player respawns"),
        event("RegionEntered", OccurrenceKind::RegionEntered)
            .param("region", ValueType::Region)
            .with_display("when a player enters {region}"),
        event("RegionLeft", OccurrenceKind::RegionLeft)
            .param("region", ValueType::Region)
            .with_display("when a player leaves {region}"),
    ];
    for def in defs {
        add(registry, def);
    }
}

fn event(name: &'static str, kind: OccurrenceKind) -> VariantDef {
    VariantDef::new(name, NodeKind::Event, ValueType::Unit, listen).on_occurrence(kind)
}

fn listen(_: &mut Evaluator<'_>, _: &Node) -> Result<Value, EvalError> {
    Ok(Value::Unit)
}
