//! Text to graph.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::domain::DomainServices;
use crate::error::CodecError;
use crate::graph::{is_identifier, NodeId, ValueType, VariantDef, VariantRegistry};
use crate::scenario::Scenario;

use super::literal::parse_literal;
use super::{DEFINITION, VALUE};

/// Decode an encoding into new, detached nodes and return the root.
///
/// Block and item literals are resolved through `services`, region
/// literals through `scenario`.
///
/// # Errors
/// Returns a `CodecError` carrying the 1-based line of the first problem.
/// Every node created before the failure is removed again.
pub fn decode(
    scenario: &mut Scenario,
    registry: &VariantRegistry,
    services: &dyn DomainServices,
    text: &str,
) -> Result<NodeId, CodecError> {
    decode_lines(
        scenario,
        registry,
        services,
        text.lines().enumerate().map(|(i, line)| (i + 1, line)),
    )
}

/// One `<path><marker><payload>` line.
#[derive(Debug)]
struct EncodedLine<'t> {
    number: usize,
    path: &'t str,
    marker: char,
    payload: &'t str,
}

impl<'t> EncodedLine<'t> {
    fn parse(number: usize, line: &'t str) -> Result<Self, CodecError> {
        let malformed = |reason: &str| CodecError::Malformed {
            line: number,
            reason: reason.to_string(),
        };

        let mut rest = line;
        while let Some(segment) = rest.strip_prefix('{') {
            let close = segment
                .find('}')
                .ok_or_else(|| malformed("unterminated path segment"))?;
            if !is_identifier(&segment[..close]) {
                return Err(malformed("path segment is not a parameter name"));
            }
            rest = &segment[close + 1..];
        }

        let mut chars = rest.chars();
        let marker = chars
            .next()
            .filter(|c| *c == DEFINITION || *c == VALUE)
            .ok_or_else(|| malformed("expected '#' or '$' after the path"))?;

        Ok(Self {
            number,
            path: &line[..line.len() - rest.len()],
            marker,
            payload: chars.as_str(),
        })
    }

    /// Parent path and parameter name, or `None` at the root.
    fn split_path(&self) -> Option<(&'t str, &'t str)> {
        let path = self.path;
        let open = path.rfind('{')?;
        Some((&path[..open], &path[open + 1..path.len() - 1]))
    }
}

/// A value definition waiting for its `$` line.
struct PendingValue<'t, 'r> {
    line: EncodedLine<'t>,
    def: &'r VariantDef,
    ty: ValueType,
}

/// Decode numbered lines. Blank lines are skipped.
pub(crate) fn decode_lines<'t>(
    scenario: &mut Scenario,
    registry: &VariantRegistry,
    services: &dyn DomainServices,
    lines: impl IntoIterator<Item = (usize, &'t str)>,
) -> Result<NodeId, CodecError> {
    let mut created = Vec::new();
    let result = Builder {
        scenario: &mut *scenario,
        registry,
        services,
        created: &mut created,
        paths: FxHashMap::default(),
        root: None,
    }
    .run(lines);

    if let Err(error) = &result {
        let removed: usize = created
            .iter()
            .map(|&id| scenario.nodes_mut().remove_subtree(id))
            .sum();
        debug!(%error, removed, "decode failed, rolled back");
    }
    result
}

struct Builder<'b, 't> {
    scenario: &'b mut Scenario,
    registry: &'b VariantRegistry,
    services: &'b dyn DomainServices,
    created: &'b mut Vec<NodeId>,
    paths: FxHashMap<&'t str, NodeId>,
    root: Option<NodeId>,
}

impl<'b, 't> Builder<'b, 't> {
    fn run(mut self, lines: impl IntoIterator<Item = (usize, &'t str)>) -> Result<NodeId, CodecError> {
        let mut pending: Option<PendingValue<'t, 'b>> = None;

        for (number, text) in lines {
            if text.is_empty() {
                continue;
            }
            let line = EncodedLine::parse(number, text)?;

            if line.marker == VALUE {
                let value = pending
                    .take()
                    .filter(|p| p.line.path == line.path)
                    .ok_or_else(|| CodecError::Malformed {
                        line: number,
                        reason: "value line does not follow a value definition at the same path"
                            .to_string(),
                    })?;
                self.value(value, &line)?;
                continue;
            }

            if let Some(value) = pending.take() {
                return Err(missing_literal(&value));
            }
            let def = self.definition(&line)?;
            match def.literal {
                Some(ty) => pending = Some(PendingValue { line, def, ty }),
                None => {
                    let id = self
                        .scenario
                        .create_draft(self.registry, def.id.as_str())
                        .map_err(|source| CodecError::Schema { line: number, source })?;
                    self.created.push(id);
                    self.place(&line, id)?;
                }
            }
        }

        if let Some(value) = pending {
            return Err(missing_literal(&value));
        }
        self.root.ok_or(CodecError::Empty)
    }

    /// Validate a `#` line and look up its variant.
    fn definition(&self, line: &EncodedLine<'t>) -> Result<&'b VariantDef, CodecError> {
        if self.paths.contains_key(line.path) {
            return Err(CodecError::DuplicatePath {
                line: line.number,
                path: line.path.to_string(),
            });
        }
        if let Some((parent, _)) = line.split_path() {
            if !self.paths.contains_key(parent) {
                return Err(CodecError::OrphanLine {
                    line: line.number,
                    path: parent.to_string(),
                });
            }
        }
        self.registry
            .get(line.payload)
            .ok_or_else(|| CodecError::UnknownVariant {
                line: line.number,
                name: line.payload.to_string(),
            })
    }

    fn value(&mut self, value: PendingValue<'t, 'b>, line: &EncodedLine<'t>) -> Result<(), CodecError> {
        let literal = parse_literal(
            &*self.scenario,
            self.services,
            &value.def.id,
            value.ty,
            line.payload,
            line.number,
        )?;
        let id = self
            .scenario
            .create_node(self.registry, value.def.id.as_str(), &[], Some(literal))
            .map_err(|source| CodecError::Schema {
                line: value.line.number,
                source,
            })?;
        self.created.push(id);
        self.place(&value.line, id)
    }

    /// Bind a new node under its parent, or make it the root.
    fn place(&mut self, line: &EncodedLine<'t>, id: NodeId) -> Result<(), CodecError> {
        match line.split_path() {
            None => self.root = Some(id),
            Some((parent, param)) => {
                let parent = self.paths.get(parent).copied().ok_or_else(|| CodecError::OrphanLine {
                    line: line.number,
                    path: parent.to_string(),
                })?;
                self.scenario
                    .set_argument(self.registry, parent, param, id)
                    .map_err(|source| CodecError::Schema {
                        line: line.number,
                        source,
                    })?;
            }
        }
        self.paths.insert(line.path, id);
        Ok(())
    }
}

fn missing_literal(value: &PendingValue<'_, '_>) -> CodecError {
    CodecError::MissingLiteral {
        line: value.line.number,
        variant: value.def.id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_to_string;
    use crate::domain::InMemoryWorld;
    use crate::error::SchemaError;
    use crate::graph::{Literal, NodeTree};

    fn setup() -> (Scenario, VariantRegistry, InMemoryWorld) {
        (
            Scenario::new("s"),
            VariantRegistry::with_builtins(),
            InMemoryWorld::new().with_block("core:stone").with_block("core:dirt"),
        )
    }

    #[test]
    fn test_decode_rebuilds_tree() {
        let (mut scenario, registry, world) = setup();
        let text = "#GiveBlock\n{player}#TriggeringPlayer\n{amount}#IntValue\n{amount}$3\n{block}#BlockValue\n{block}$core:dirt";

        let root = decode(&mut scenario, &registry, &world, text).unwrap();
        let expected = NodeTree::new("GiveBlock")
            .with_arg("player", NodeTree::new("TriggeringPlayer"))
            .with_arg("amount", NodeTree::int(3))
            .with_arg("block", NodeTree::block("core:dirt"));

        assert_eq!(scenario.nodes().snapshot(root), Some(expected));
        assert!(scenario.nodes().get(root).unwrap().is_detached());
    }

    #[test]
    fn test_decode_round_trip() {
        let (mut scenario, registry, world) = setup();
        let tree = NodeTree::new("ConcatString")
            .with_arg("string1", NodeTree::text("a\\b\nc"))
            .with_arg(
                "string2",
                NodeTree::new("IntToString").with_arg(
                    "value",
                    NodeTree::new("SubtractInt")
                        .with_arg("left", NodeTree::int(-4))
                        .with_arg("right", NodeTree::int(i64::MAX)),
                ),
            );
        let node = scenario.insert_tree(&registry, &tree).unwrap();
        let text = encode_to_string(&scenario, &registry, node).unwrap();

        let copy = decode(&mut scenario, &registry, &world, &text).unwrap();
        assert_ne!(copy, node);
        assert_eq!(scenario.nodes().snapshot(copy), Some(tree));
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let (mut scenario, registry, world) = setup();
        let root = decode(&mut scenario, &registry, &world, "\n#IntValue\n$7\n\n").unwrap();
        assert_eq!(
            scenario.nodes().get(root).unwrap().literal(),
            Some(&Literal::Int(7))
        );
    }

    #[test]
    fn test_decode_errors_carry_line_numbers() {
        let (mut scenario, registry, world) = setup();
        let cases: [(&str, CodecError); 7] = [
            ("", CodecError::Empty),
            (
                "#AddInt\n{left}{x}#IntValue",
                CodecError::OrphanLine { line: 2, path: "{left}".to_string() },
            ),
            (
                "#AddInt\n{left}#IntValue\n{left}$1\n{left}#IntValue",
                CodecError::DuplicatePath { line: 4, path: "{left}".to_string() },
            ),
            (
                "#Frobnicate",
                CodecError::UnknownVariant { line: 1, name: "Frobnicate".to_string() },
            ),
            (
                "#AddInt\n{left}#IntValue\n{right}#IntValue\n{right}$1",
                CodecError::MissingLiteral { line: 2, variant: "IntValue".into() },
            ),
            (
                "#IntValue\n$ten",
                CodecError::InvalidLiteral {
                    line: 2,
                    variant: "IntValue".into(),
                    text: "ten".to_string(),
                },
            ),
            (
                "#BlockValue\n$core:gold",
                CodecError::UnresolvedReference { line: 2, reference: "core:gold".to_string() },
            ),
        ];

        for (text, expected) in cases {
            assert_eq!(decode(&mut scenario, &registry, &world, text), Err(expected), "{text:?}");
        }
    }

    #[test]
    fn test_decode_malformed_lines() {
        let (mut scenario, registry, world) = setup();
        for text in ["IntValue", "{left#IntValue", "{1x}#IntValue", "#AddInt\n$4"] {
            assert!(
                matches!(
                    decode(&mut scenario, &registry, &world, text),
                    Err(CodecError::Malformed { .. })
                ),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_decode_schema_violation_rolls_back() {
        let (mut scenario, registry, world) = setup();
        let text = "#AddInt\n{left}#IntValue\n{left}$1\n{right}#StringValue\n{right}$x";

        let result = decode(&mut scenario, &registry, &world, text);
        assert!(matches!(
            result,
            Err(CodecError::Schema { line: 4, source: SchemaError::ArgumentType { .. } })
        ));
        assert!(scenario.nodes().is_empty());
    }

    #[test]
    fn test_decode_unknown_parameter() {
        let (mut scenario, registry, world) = setup();
        let result = decode(&mut scenario, &registry, &world, "#AddInt\n{middle}#IntValue\n{middle}$1");
        assert!(matches!(
            result,
            Err(CodecError::Schema { line: 2, source: SchemaError::UnknownParameter { .. } })
        ));
        assert!(scenario.nodes().is_empty());
    }
}
