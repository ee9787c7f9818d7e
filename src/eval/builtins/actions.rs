//! Action variants. Each performs one side effect through the domain
//! services and produces `Unit`.

use crate::error::{EvalError, ServiceError};
use crate::eval::{Evaluator, Value};
use crate::graph::{Node, NodeKind, ValueType, VariantDef, VariantRegistry};

use super::add;

pub(super) fn register(registry: &mut VariantRegistry) {
    let defs = [
        VariantDef::new("GiveBlock", NodeKind::Action, ValueType::Unit, give_block)
            .param("player", ValueType::Entity)
            .param_with_default("amount", ValueType::Int, 1)
            .param("block", ValueType::Block)
            .with_display("give {player} {amount} {block}"),
        VariantDef::new("RemoveBlock", NodeKind::Action, ValueType::Unit, remove_block)
            .param("player", ValueType::Entity)
            .param_with_default("amount", ValueType::Int, 1)
            .param("block", ValueType::Block)
            .with_display("take {amount} {block} from {player}"),
        VariantDef::new("GiveItem", NodeKind::Action, ValueType::Unit, give_item)
            .param("player", ValueType::Entity)
            .param_with_default("amount", ValueType::Int, 1)
            .param("item", ValueType::Item)
            .with_display("give {player} {amount} {item}"),
        VariantDef::new("SendChatMessage", NodeKind::Action, ValueType::Unit, send_chat_message)
            .param("message", ValueType::Text)
            .with_display("say {message}"),
        VariantDef::new("SendPlayerMessage", NodeKind::Action, ValueType::Unit, send_player_message)
            .param("player", ValueType::Entity)
            .param("message", ValueType::Text)
            .with_display("tell {player} {message}"),
        VariantDef::new("LogMessage", NodeKind::Action, ValueType::Unit, log_message)
            .param("message", ValueType::Text)
            .with_display("log {message}"),
        VariantDef::new("TeleportToRegion", NodeKind::Action, ValueType::Unit, teleport_to_region)
            .param("player", ValueType::Entity)
            .param("region", ValueType::Region)
            .with_display("teleport {player} to {region}"),
    ];
    for def in defs {
        add(registry, def);
    }
}

fn effect(node: &Node, result: Result<(), ServiceError>) -> Result<Value, EvalError> {
    result
        .map(|()| Value::Unit)
        .map_err(|source| EvalError::ActionFailed {
            node: node.id(),
            source,
        })
}

fn give_block(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    let amount = ev.arg_int(node, "amount")?;
    let block = ev.arg_block(node, "block")?;
    effect(node, ev.services().give_blocks(player, &block, amount))
}

fn remove_block(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    let amount = ev.arg_int(node, "amount")?;
    let block = ev.arg_block(node, "block")?;
    effect(node, ev.services().remove_blocks(player, &block, amount))
}

fn give_item(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    let amount = ev.arg_int(node, "amount")?;
    let item = ev.arg_item(node, "item")?;
    effect(node, ev.services().give_items(player, &item, amount))
}

fn send_chat_message(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let message = ev.arg_text(node, "message")?;
    ev.services().broadcast(&message);
    Ok(Value::Unit)
}

fn send_player_message(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    let message = ev.arg_text(node, "message")?;
    effect(node, ev.services().send_message(player, &message))
}

fn log_message(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let message = ev.arg_text(node, "message")?;
    ev.services().log(&message);
    Ok(Value::Unit)
}

fn teleport_to_region(ev: &mut Evaluator<'_>, node: &Node) -> Result<Value, EvalError> {
    let player = ev.arg_entity(node, "player")?;
    let region = ev.arg_region(node, "region")?;
    let region = ev.region(node.id(), region)?;
    effect(node, ev.services().teleport(player, region))
}

#[cfg(test)]
mod tests {
    use crate::core::{ActorId, ResourceKey, ScriptRng};
    use crate::domain::InMemoryWorld;
    use crate::error::{EvalError, ServiceError};
    use crate::eval::{Context, Evaluator, Value};
    use crate::graph::{NodeTree, VariantRegistry};
    use crate::scenario::{RegionBounds, Scenario};
    use crate::triggers::Occurrence;

    const PLAYER: ActorId = ActorId::new(1);

    fn world() -> InMemoryWorld {
        InMemoryWorld::new()
            .with_block("core:stone")
            .with_item("core:apple")
            .with_player(PLAYER, "Alex")
    }

    fn run(scenario: &mut Scenario, world: &mut InMemoryWorld, tree: NodeTree) -> Result<Value, EvalError> {
        let registry = VariantRegistry::with_builtins();
        let id = scenario.insert_tree(&registry, &tree).unwrap();
        let context = Context::from_occurrence(&Occurrence::player_spawned(PLAYER));
        let mut rng = ScriptRng::new(0);
        Evaluator::new(&registry, scenario, &context, world, &mut rng).evaluate(id)
    }

    #[test]
    fn test_give_block_default_amount() {
        let mut world = world();
        let tree = NodeTree::new("GiveBlock")
            .with_arg("player", NodeTree::new("TriggeringPlayer"))
            .with_arg("block", NodeTree::block("core:stone"));

        assert_eq!(run(&mut Scenario::new("t"), &mut world, tree), Ok(Value::Unit));
        assert_eq!(world.blocks_of(PLAYER, &ResourceKey::new("core", "stone")), 1);
    }

    #[test]
    fn test_remove_block_insufficient() {
        let mut world = world();
        let tree = NodeTree::new("RemoveBlock")
            .with_arg("player", NodeTree::new("TriggeringPlayer"))
            .with_arg("amount", NodeTree::int(3))
            .with_arg("block", NodeTree::block("core:stone"));

        let result = run(&mut Scenario::new("t"), &mut world, tree);
        assert!(matches!(
            result,
            Err(EvalError::ActionFailed { source: ServiceError::Insufficient { requested: 3, available: 0, .. }, .. })
        ));
    }

    #[test]
    fn test_give_item() {
        let mut world = world();
        let tree = NodeTree::new("GiveItem")
            .with_arg("player", NodeTree::new("TriggeringPlayer"))
            .with_arg("amount", NodeTree::int(4))
            .with_arg("item", NodeTree::item("core:apple"));

        run(&mut Scenario::new("t"), &mut world, tree).unwrap();
        assert_eq!(world.items_of(PLAYER, &ResourceKey::new("core", "apple")), 4);
    }

    #[test]
    fn test_messages() {
        let mut world = world();
        let mut scenario = Scenario::new("t");

        let chat = NodeTree::new("SendChatMessage").with_arg("message", NodeTree::text("hello"));
        run(&mut scenario, &mut world, chat).unwrap();

        let direct = NodeTree::new("SendPlayerMessage")
            .with_arg("player", NodeTree::new("TriggeringPlayer"))
            .with_arg("message", NodeTree::text("psst"));
        run(&mut scenario, &mut world, direct).unwrap();

        let log = NodeTree::new("LogMessage").with_arg("message", NodeTree::text("noted"));
        run(&mut scenario, &mut world, log).unwrap();

        assert_eq!(world.chat().len(), 2);
        assert_eq!(world.chat()[0].recipient, None);
        assert_eq!(world.chat()[1].recipient, Some(PLAYER));
        assert_eq!(world.logs(), ["noted".to_string()]);
    }

    #[test]
    fn test_teleport() {
        let mut world = world();
        let mut scenario = Scenario::new("t");
        let region = scenario.add_region("start", RegionBounds::new([10.0; 3], [20.0; 3]));
        let tree = NodeTree::new("TeleportToRegion")
            .with_arg("player", NodeTree::new("TriggeringPlayer"))
            .with_arg("region", NodeTree::region(region));

        run(&mut scenario, &mut world, tree).unwrap();
        assert_eq!(world.position(PLAYER), Some([15.0, 15.0, 15.0]));
    }
}
