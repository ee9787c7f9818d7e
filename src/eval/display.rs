//! Human-readable rendering of nodes for the editor.
//!
//! Rendering is side-effect free and needs no occurrence context: value
//! nodes show their literal, everything else fills its variant's template.

use crate::graph::{Literal, NodeId, VariantRegistry};
use crate::scenario::Scenario;

/// Nesting beyond which rendering stops descending.
const MAX_DISPLAY_DEPTH: usize = 64;

/// Render a node and its arguments.
///
/// `{param}` placeholders in the variant's template are replaced by the
/// bound child's rendering, by the parameter's default when unset, or by
/// `<param>` when the slot is empty and has no default.
#[must_use]
pub fn display_node(registry: &VariantRegistry, scenario: &Scenario, id: NodeId) -> String {
    render(registry, scenario, id, 0)
}

/// Render a literal the way the editor shows it.
#[must_use]
pub fn display_literal(scenario: &Scenario, literal: &Literal) -> String {
    match literal {
        Literal::Int(v) => v.to_string(),
        Literal::Text(v) => format!("\"{v}\""),
        Literal::Bool(v) => v.to_string(),
        Literal::Comparator(c) => c.symbol().to_string(),
        Literal::DamageType(d) => d.name().to_lowercase(),
        Literal::Block(key) | Literal::Item(key) => key.to_string(),
        Literal::Region(id) => match scenario.region(*id) {
            Some(region) => region.name.clone(),
            None => format!("<missing {id}>"),
        },
    }
}

fn render(registry: &VariantRegistry, scenario: &Scenario, id: NodeId, depth: usize) -> String {
    let Some(node) = scenario.nodes().get(id) else {
        return format!("<missing {id}>");
    };
    if let Some(literal) = node.literal() {
        return display_literal(scenario, literal);
    }
    if depth >= MAX_DISPLAY_DEPTH {
        return "...".to_string();
    }
    let Some(def) = registry.get(node.variant().as_str()) else {
        return node.variant().to_string();
    };
    if def.display.is_empty() {
        return def.id.to_string();
    }

    let mut out = String::with_capacity(def.display.len());
    let mut rest: &str = &def.display;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match def.param_spec(name) {
            Some(spec) => match node.argument(name) {
                Some(child) => out.push_str(&render(registry, scenario, child, depth + 1)),
                None => match &spec.default {
                    Some(default) => out.push_str(&display_literal(scenario, default)),
                    None => {
                        out.push('<');
                        out.push_str(name);
                        out.push('>');
                    }
                },
            },
            None => out.push_str(&rest[open..=open + 1 + close]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeTree;
    use crate::scenario::RegionBounds;

    #[test]
    fn test_display_composite() {
        let registry = VariantRegistry::with_builtins();
        let mut scenario = Scenario::new("test");
        let id = scenario
            .insert_tree(
                &registry,
                &NodeTree::new("IntCompare")
                    .with_arg("left", NodeTree::int(5))
                    .with_arg("right", NodeTree::int(3))
                    .with_arg("comparator", NodeTree::comparator(crate::graph::Comparator::Greater)),
            )
            .unwrap();

        assert_eq!(display_node(&registry, &scenario, id), "5 > 3");
    }

    #[test]
    fn test_display_unset_and_default_slots() {
        let registry = VariantRegistry::with_builtins();
        let mut scenario = Scenario::new("test");
        let id = scenario
            .insert_tree(&registry, &NodeTree::new("GiveBlock"))
            .unwrap();

        assert_eq!(
            display_node(&registry, &scenario, id),
            "give <player> 1 <block>"
        );
    }

    #[test]
    fn test_display_region_by_name() {
        let registry = VariantRegistry::with_builtins();
        let mut scenario = Scenario::new("test");
        let region = scenario.add_region("Arena", RegionBounds::new([0.0; 3], [4.0; 3]));
        let id = scenario
            .insert_tree(
                &registry,
                &NodeTree::new("RegionEntered").with_arg("region", NodeTree::region(region)),
            )
            .unwrap();

        assert_eq!(
            display_node(&registry, &scenario, id),
            "when a player enters Arena"
        );
    }

    #[test]
    fn test_display_literals() {
        let scenario = Scenario::new("test");
        assert_eq!(display_literal(&scenario, &Literal::from("hi")), "\"hi\"");
        assert_eq!(display_literal(&scenario, &Literal::from(true)), "true");
        assert_eq!(
            display_literal(&scenario, &Literal::from(crate::graph::DamageType::Fire)),
            "fire"
        );
    }

    #[test]
    fn test_display_missing_node() {
        let registry = VariantRegistry::with_builtins();
        let scenario = Scenario::new("test");
        assert_eq!(
            display_node(&registry, &scenario, NodeId::new(4)),
            "<missing Node(4)>"
        );
    }
}
