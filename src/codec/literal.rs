//! Textual form of literals.

use uuid::Uuid;

use crate::core::ResourceKey;
use crate::domain::DomainServices;
use crate::error::CodecError;
use crate::graph::{Comparator, DamageType, Literal, ValueType, VariantId};
use crate::scenario::{RegionId, Scenario};

const STABLE_PREFIX: &str = "uuid:";
const LOCAL_PREFIX: &str = "local:";

/// Escape text so it fits on one line.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Invert [`escape`]. Returns `None` on a dangling or unknown escape.
pub(crate) fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }
    Some(out)
}

/// Render a literal for a `$` line.
///
/// Regions are written by stable id when they have one, otherwise by their
/// scenario-local id.
pub(crate) fn format_literal(scenario: &Scenario, literal: &Literal) -> Result<String, CodecError> {
    Ok(match literal {
        Literal::Int(v) => v.to_string(),
        Literal::Text(v) => escape(v),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Comparator(c) => c.name().to_string(),
        Literal::DamageType(d) => d.name().to_string(),
        Literal::Block(key) | Literal::Item(key) => key.to_string(),
        Literal::Region(id) => {
            let region = scenario
                .region(*id)
                .ok_or_else(|| CodecError::UnresolvedReference {
                    line: 0,
                    reference: id.to_string(),
                })?;
            match region.stable_id {
                Some(stable) => format!("{STABLE_PREFIX}{stable}"),
                None => format!("{LOCAL_PREFIX}{}", id.raw()),
            }
        }
    })
}

/// Parse a `$` payload as a literal of type `ty`.
///
/// Reference literals must resolve: blocks and items against the domain
/// registries, regions against the scenario.
pub(crate) fn parse_literal(
    scenario: &Scenario,
    services: &dyn DomainServices,
    variant: &VariantId,
    ty: ValueType,
    text: &str,
    line: usize,
) -> Result<Literal, CodecError> {
    let invalid = || CodecError::InvalidLiteral {
        line,
        variant: variant.clone(),
        text: text.to_string(),
    };
    let unresolved = || CodecError::UnresolvedReference {
        line,
        reference: text.to_string(),
    };

    match ty {
        ValueType::Int => text.parse().map(Literal::Int).map_err(|_| invalid()),
        ValueType::Text => unescape(text).map(Literal::Text).ok_or_else(invalid),
        ValueType::Bool => match text {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            _ => Err(invalid()),
        },
        ValueType::Comparator => Comparator::from_name(text)
            .map(Literal::Comparator)
            .ok_or_else(invalid),
        ValueType::DamageType => DamageType::from_name(text)
            .map(Literal::DamageType)
            .ok_or_else(invalid),
        ValueType::Block => {
            let key = ResourceKey::parse(text).ok_or_else(invalid)?;
            if !services.block_exists(&key) {
                return Err(unresolved());
            }
            Ok(Literal::Block(key))
        }
        ValueType::Item => {
            let key = ResourceKey::parse(text).ok_or_else(invalid)?;
            if !services.item_exists(&key) {
                return Err(unresolved());
            }
            Ok(Literal::Item(key))
        }
        ValueType::Region => {
            let region = if let Some(stable) = text.strip_prefix(STABLE_PREFIX) {
                let stable = Uuid::parse_str(stable).map_err(|_| invalid())?;
                scenario.region_by_stable_id(stable)
            } else if let Some(local) = text.strip_prefix(LOCAL_PREFIX) {
                let local = local.parse().map_err(|_| invalid())?;
                scenario.region(RegionId::new(local))
            } else {
                return Err(invalid());
            };
            region.map(|r| Literal::Region(r.id)).ok_or_else(unresolved)
        }
        ValueType::Entity | ValueType::Unit => Err(invalid()),
    }
}
