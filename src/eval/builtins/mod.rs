//! Built-in variants.
//!
//! Each submodule registers the variants of one kind together with their
//! evaluation rules:
//!
//! - `values`: literal carriers (`IntValue`, `BlockValue`, ...)
//! - `expressions`: context facts, arithmetic, text and inventory reads
//! - `conditionals`: comparisons and boolean connectives
//! - `actions`: side effects routed to [`DomainServices`](crate::domain::DomainServices)
//! - `events`: occurrence listeners
//!
//! Hosts add their own variants by registering further
//! [`VariantDef`](crate::graph::VariantDef)s after these.

mod actions;
mod conditionals;
mod events;
mod expressions;
mod values;

use crate::graph::{VariantDef, VariantRegistry};

/// Register every built-in variant.
///
/// The built-in definitions are fixed and known to be valid, and the
/// function is meant to run on a fresh registry; definitions whose id is
/// already taken are skipped.
pub fn register_builtins(registry: &mut VariantRegistry) {
    values::register(registry);
    expressions::register(registry);
    conditionals::register(registry);
    actions::register(registry);
    events::register(registry);
}

fn add(registry: &mut VariantRegistry, def: VariantDef) {
    if let Err(e) = registry.register(def) {
        tracing::warn!(error = %e, "skipping built-in variant");
    }
}
