//! Whole-trigger interchange.
//!
//! A trigger is written as a header followed by one section per list root:
//!
//! ```text
//! @trigger stone reward
//! @event
//! #BlockDestroyed
//! @action
//! #GiveBlock
//! {player}#TriggeringPlayer
//! ...
//! ```
//!
//! `@enabled false` follows the header for disabled triggers.

use tracing::debug;

use crate::domain::DomainServices;
use crate::error::{CodecError, SchemaError};
use crate::graph::VariantRegistry;
use crate::scenario::{Scenario, TriggerId, TriggerList};

use super::decode::decode_lines;
use super::encode::encode;
use super::literal::{escape, unescape};

const TRIGGER: &str = "@trigger ";
const ENABLED: &str = "@enabled ";

fn section(list: TriggerList) -> &'static str {
    match list {
        TriggerList::Events => "@event",
        TriggerList::Conditions => "@condition",
        TriggerList::Actions => "@action",
    }
}

/// Write a trigger and all of its nodes.
///
/// # Errors
/// Returns `CodecError::Schema` for an unknown trigger, or any error from
/// encoding one of its nodes.
pub fn export_trigger(
    scenario: &Scenario,
    registry: &VariantRegistry,
    trigger: TriggerId,
) -> Result<String, CodecError> {
    let t = scenario.trigger(trigger).ok_or(CodecError::Schema {
        line: 0,
        source: SchemaError::UnknownTrigger(trigger),
    })?;

    let mut lines = vec![format!("{TRIGGER}{}", escape(t.name()))];
    if !t.is_enabled() {
        lines.push(format!("{ENABLED}false"));
    }
    for list in TriggerList::ALL {
        for root in t.list(list) {
            lines.push(section(list).to_string());
            lines.extend(encode(scenario, registry, root)?);
        }
    }
    Ok(lines.join("\n"))
}

/// Append a trigger read from [`export_trigger`] output.
///
/// # Errors
/// Returns the first `CodecError`, with line numbers counted from the start
/// of `text`. The scenario is unchanged on failure.
pub fn import_trigger(
    scenario: &mut Scenario,
    registry: &VariantRegistry,
    services: &dyn DomainServices,
    text: &str,
) -> Result<TriggerId, CodecError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.is_empty())
        .peekable();

    let (number, header) = lines.next().ok_or(CodecError::Empty)?;
    let name = header
        .strip_prefix(TRIGGER)
        .and_then(unescape)
        .ok_or_else(|| malformed(number, "expected '@trigger <name>'"))?;

    let mut enabled = true;
    if let Some(&(number, line)) = lines.peek() {
        if let Some(flag) = line.strip_prefix(ENABLED) {
            enabled = match flag {
                "true" => true,
                "false" => false,
                _ => return Err(malformed(number, "expected '@enabled true' or '@enabled false'")),
            };
            lines.next();
        }
    }

    let mut sections = Vec::new();
    while let Some((number, header)) = lines.next() {
        let list = TriggerList::ALL
            .into_iter()
            .find(|&l| section(l) == header)
            .ok_or_else(|| malformed(number, "expected '@event', '@condition' or '@action'"))?;
        let mut body = Vec::new();
        while let Some(&(n, line)) = lines.peek() {
            if line.starts_with('@') {
                break;
            }
            body.push((n, line));
            lines.next();
        }
        sections.push((number, list, body));
    }

    // Restoring this snapshot also rewinds the trigger and node id counters
    let before = scenario.clone();
    let trigger = scenario.add_trigger(name);
    let built = sections
        .into_iter()
        .try_for_each(|(number, list, body)| {
            let root = decode_lines(scenario, registry, services, body)
                .map_err(|e| with_empty_line(e, number))?;
            scenario
                .attach(trigger, list, root)
                .map_err(|source| CodecError::Schema { line: number, source })
        })
        .and_then(|()| {
            scenario
                .set_trigger_enabled(trigger, enabled)
                .map_err(|source| CodecError::Schema { line: 0, source })
        });

    if let Err(error) = built {
        *scenario = before;
        debug!(%error, "trigger import failed, rolled back");
        return Err(error);
    }
    Ok(trigger)
}

fn malformed(line: usize, reason: &str) -> CodecError {
    CodecError::Malformed {
        line,
        reason: reason.to_string(),
    }
}

/// Point an empty section at its header line.
fn with_empty_line(error: CodecError, header: usize) -> CodecError {
    match error {
        CodecError::Empty => malformed(header, "section has no node lines"),
        other => other,
    }
}
