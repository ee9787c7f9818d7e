//! Editing integration tests.
//!
//! These tests issue the requests a visual editor would and check that
//! rejected requests leave the scenario untouched.

use scenario_script::core::ActorId;
use scenario_script::error::SchemaError;
use scenario_script::graph::{Comparator, Literal, NodeTree, Owner, VariantRegistry};
use scenario_script::scenario::{RegionBounds, Scenario, TriggerList};
use scenario_script::triggers::Occurrence;

fn registry() -> VariantRegistry {
    VariantRegistry::with_builtins()
}

#[test]
fn test_rejected_set_argument_keeps_binding() {
    let registry = registry();
    let mut scenario = Scenario::new("s");
    let t = scenario.add_trigger("t");
    let cmp = scenario.add_condition(&registry, t, "IntCompare").unwrap();

    let five = scenario.insert_tree(&registry, &NodeTree::int(5)).unwrap();
    scenario.set_argument(&registry, cmp, "left", five).unwrap();

    let text = scenario.insert_tree(&registry, &NodeTree::text("five")).unwrap();
    let err = scenario.set_argument(&registry, cmp, "left", text).unwrap_err();
    assert!(matches!(err, SchemaError::ArgumentType { .. }));

    assert_eq!(scenario.nodes().get_argument(cmp, "left"), Some(five));
    assert!(scenario.nodes().get(text).unwrap().is_detached());
    assert_eq!(scenario.display(&registry, cmp), "5 = <right>");
}

#[test]
fn test_set_argument_discards_previous_child() {
    let registry = registry();
    let mut scenario = Scenario::new("s");
    let t = scenario.add_trigger("t");
    let say = scenario.add_action(&registry, t, "SendChatMessage").unwrap();

    let first = scenario
        .insert_tree(
            &registry,
            &NodeTree::new("ConcatString")
                .with_arg("string1", NodeTree::text("a"))
                .with_arg("string2", NodeTree::text("b")),
        )
        .unwrap();
    scenario.set_argument(&registry, say, "message", first).unwrap();
    assert_eq!(scenario.nodes().len(), 4);

    let second = scenario.insert_tree(&registry, &NodeTree::text("hi")).unwrap();
    scenario.set_argument(&registry, say, "message", second).unwrap();

    assert_eq!(scenario.nodes().len(), 2);
    assert!(scenario.nodes().get(first).is_none());
    assert_eq!(scenario.display(&registry, say), "say \"hi\"");

    assert!(scenario.clear_argument(&registry, say, "message").unwrap());
    assert_eq!(scenario.display(&registry, say), "say <message>");
    assert_eq!(scenario.nodes().len(), 1);
}

#[test]
fn test_cycles_are_rejected() {
    let registry = registry();
    let mut scenario = Scenario::new("s");
    let outer = scenario.create_draft(&registry, "Not").unwrap();
    let inner = scenario.create_draft(&registry, "Not").unwrap();
    scenario.set_argument(&registry, outer, "value", inner).unwrap();

    // Binding the parent under its own child would close a loop
    assert_eq!(
        scenario.set_argument(&registry, inner, "value", outer),
        Err(SchemaError::Cycle { node: inner, child: outer })
    );
    assert_eq!(scenario.nodes().get_argument(outer, "value"), Some(inner));
    // Binding a node under itself is a cycle
    let lone = scenario.create_draft(&registry, "Not").unwrap();
    assert_eq!(
        scenario.set_argument(&registry, lone, "value", lone),
        Err(SchemaError::Cycle { node: lone, child: lone })
    );
}

#[test]
fn test_lists_accept_only_their_kind() {
    let registry = registry();
    let mut scenario = Scenario::new("s");
    let t = scenario.add_trigger("t");

    assert!(matches!(
        scenario.add_event(&registry, t, "GiveBlock"),
        Err(SchemaError::WrongKind { .. })
    ));
    assert!(matches!(
        scenario.add_condition(&registry, t, "IntToString"),
        Err(SchemaError::WrongKind { .. })
    ));
    assert!(matches!(
        scenario.add_action(&registry, t, "PlayerSpawned"),
        Err(SchemaError::WrongKind { .. })
    ));

    // Failed additions leave nothing behind
    assert!(scenario.nodes().is_empty());
    assert_eq!(scenario.trigger(t).unwrap().root_count(), 0);

    // Any boolean-valued node can be a condition
    let flag = scenario.insert_tree(&registry, &NodeTree::boolean(true)).unwrap();
    scenario.attach(t, TriggerList::Conditions, flag).unwrap();
    assert_eq!(scenario.nodes().get(flag).unwrap().owner(), Owner::Trigger(t));
    assert_eq!(
        scenario.attach(t, TriggerList::Conditions, flag),
        Err(SchemaError::AlreadyBound(flag))
    );
}

#[test]
fn test_delete_and_move_nodes() {
    let registry = registry();
    let mut scenario = Scenario::new("s");
    let t = scenario.add_trigger("t");
    let a = scenario.add_action(&registry, t, "LogMessage").unwrap();
    let b = scenario.add_action(&registry, t, "SendChatMessage").unwrap();
    let c = scenario
        .insert_tree(
            &registry,
            &NodeTree::new("GiveBlock").with_arg("amount", NodeTree::int(2)),
        )
        .unwrap();
    scenario.attach(t, TriggerList::Actions, c).unwrap();

    scenario.move_node(c, 0).unwrap();
    let order: Vec<_> = scenario.trigger(t).unwrap().actions().collect();
    assert_eq!(order, vec![c, a, b]);
    assert_eq!(
        scenario.trigger(t).unwrap().position_of(a),
        Some((TriggerList::Actions, 1))
    );
    assert!(matches!(
        scenario.move_node(a, 3),
        Err(SchemaError::IndexOutOfBounds { index: 3, len: 3 })
    ));

    // Deleting an argument child unsets the slot but keeps the root
    let amount = scenario.nodes().get_argument(c, "amount").unwrap();
    assert_eq!(scenario.delete_node(amount), Ok(1));
    assert_eq!(scenario.nodes().get_argument(c, "amount"), None);
    assert_eq!(scenario.display(&registry, c), "give <player> 1 <block>");

    // Deleting a root removes it from the list
    assert_eq!(scenario.delete_node(c), Ok(1));
    let order: Vec<_> = scenario.trigger(t).unwrap().actions().collect();
    assert_eq!(order, vec![a, b]);
}

#[test]
fn test_trigger_management() {
    let mut scenario = Scenario::new("s");
    let a = scenario.add_trigger("a");
    let b = scenario.add_trigger("b");

    scenario.rename_trigger(a, "alpha").unwrap();
    scenario.set_trigger_enabled(b, false).unwrap();
    scenario.move_trigger(b, 0).unwrap();

    let names: Vec<_> = scenario.triggers().map(|t| t.name().to_string()).collect();
    assert_eq!(names, vec!["b", "alpha"]);
    assert!(!scenario.trigger(b).unwrap().is_enabled());
    assert_eq!(scenario.trigger_by_name("alpha").map(|t| t.id()), Some(a));
    assert!(matches!(
        scenario.move_trigger(a, 2),
        Err(SchemaError::IndexOutOfBounds { .. })
    ));

    scenario.delete_trigger(a).unwrap();
    assert_eq!(scenario.delete_trigger(a), Err(SchemaError::UnknownTrigger(a)));
    assert_eq!(scenario.rename_trigger(a, "x"), Err(SchemaError::UnknownTrigger(a)));
}

#[test]
fn test_region_management() {
    let registry = registry();
    let mut scenario = Scenario::new("s");
    let bounds = RegionBounds::new([5.0, 0.0, 5.0], [0.0, 10.0, 0.0]);
    let spawn = scenario.add_stable_region("spawn", bounds);
    let stable = scenario.region(spawn).unwrap().stable_id.unwrap();

    assert_eq!(
        scenario.add_region_with_stable_id("copy", stable, bounds),
        Err(SchemaError::DuplicateStableId(stable))
    );
    assert!(scenario.region(spawn).unwrap().bounds.contains([1.0, 9.0, 4.0]));

    scenario.rename_region(spawn, "start").unwrap();
    let tp = scenario
        .insert_tree(
            &registry,
            &NodeTree::new("TeleportToRegion")
                .with_arg("player", NodeTree::new("TriggeringPlayer"))
                .with_arg("region", NodeTree::region(spawn)),
        )
        .unwrap();
    assert_eq!(scenario.display(&registry, tp), "teleport triggering player to start");

    let removed = scenario.remove_region(spawn).unwrap();
    assert_eq!(removed.name, "start");
    assert_eq!(
        scenario.display(&registry, tp),
        format!("teleport triggering player to <missing {spawn}>")
    );
    assert_eq!(scenario.rename_region(spawn, "x"), Err(SchemaError::UnknownRegion(spawn)));
}

#[test]
fn test_set_literal() {
    let registry = registry();
    let mut scenario = Scenario::new("s");
    let cmp = scenario.create_draft(&registry, "ComparatorValue").unwrap();
    assert_eq!(scenario.display(&registry, cmp), "=");

    scenario.set_literal(cmp, Literal::Comparator(Comparator::Less)).unwrap();
    assert_eq!(scenario.display(&registry, cmp), "<");
    assert!(matches!(
        scenario.set_literal(cmp, Literal::Int(1)),
        Err(SchemaError::LiteralMismatch { .. })
    ));
    assert_eq!(scenario.display(&registry, cmp), "<");
}

#[test]
fn test_snapshot_bytes_preserve_edits() {
    let registry = registry();
    let mut scenario = Scenario::new("saved");
    let t = scenario.add_trigger("t");
    scenario.add_event(&registry, t, "PlayerRespawned").unwrap();
    scenario.add_action(&registry, t, "LogMessage").unwrap();
    scenario.set_trigger_enabled(t, false).unwrap();

    let restored = Scenario::from_bytes(&scenario.to_bytes().unwrap()).unwrap();
    assert_eq!(restored.trigger(t), scenario.trigger(t));
    assert_eq!(restored.nodes().len(), 2);

    // New ids keep counting from where the saved scenario stopped
    let mut restored = restored;
    let next = restored.add_trigger("next");
    assert_ne!(next, t);
}

#[test]
fn test_occurrence_json() {
    let occurrence = Occurrence::player_respawned(ActorId::new(4));
    let json = serde_json::to_string(&occurrence).unwrap();
    let back: Occurrence = serde_json::from_str(&json).unwrap();
    assert_eq!(back, occurrence);
}
