//! Graph to text.

use crate::error::{CodecError, SchemaError};
use crate::graph::{NodeId, VariantRegistry};
use crate::scenario::Scenario;

use super::literal::format_literal;
use super::{DEFINITION, VALUE};

/// Encode a node and everything below it, one line per entry.
///
/// Lines are emitted depth-first, parent before children, children in the
/// order their parameters are declared. Unset slots produce no lines.
///
/// # Errors
/// Returns `CodecError::UnknownNode` if `node` does not exist,
/// `CodecError::Schema` if a variant is not registered, and
/// `CodecError::UnresolvedReference` for a region literal whose region was
/// removed.
pub fn encode(
    scenario: &Scenario,
    registry: &VariantRegistry,
    node: NodeId,
) -> Result<Vec<String>, CodecError> {
    let mut lines = Vec::new();
    let mut path = String::new();
    encode_into(scenario, registry, node, &mut path, &mut lines)?;
    Ok(lines)
}

/// [`encode`], joined with newlines.
///
/// # Errors
/// As [`encode`].
pub fn encode_to_string(
    scenario: &Scenario,
    registry: &VariantRegistry,
    node: NodeId,
) -> Result<String, CodecError> {
    Ok(encode(scenario, registry, node)?.join("\n"))
}

fn encode_into(
    scenario: &Scenario,
    registry: &VariantRegistry,
    id: NodeId,
    path: &mut String,
    lines: &mut Vec<String>,
) -> Result<(), CodecError> {
    let node = scenario.nodes().get(id).ok_or(CodecError::UnknownNode(id))?;
    let def = registry
        .get(node.variant().as_str())
        .ok_or_else(|| CodecError::Schema {
            line: 0,
            source: SchemaError::UnknownVariant(node.variant().to_string()),
        })?;

    lines.push(format!("{path}{DEFINITION}{}", node.variant()));
    if let Some(literal) = node.literal() {
        lines.push(format!("{path}{VALUE}{}", format_literal(scenario, literal)?));
    }

    for param in &def.params {
        let Some(child) = node.argument(&param.name) else {
            continue;
        };
        let len = path.len();
        path.push('{');
        path.push_str(&param.name);
        path.push('}');
        encode_into(scenario, registry, child, path, lines)?;
        path.truncate(len);
    }
    Ok(())
}
