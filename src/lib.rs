//! # scenario-script
//!
//! A rule-scripting engine for authored scenarios: "when X happens, if Y
//! holds, do Z".
//!
//! ## Design Principles
//!
//! 1. **Schema-Driven**: Every node variant is a registered schema entry
//!    plus an evaluation rule. Adding a rule type means registering, never
//!    changing the dispatcher.
//!
//! 2. **Typed Graphs**: A node's result type is fixed by its variant. Every
//!    binding is type-checked when it is made, so evaluation never sees an
//!    ill-typed graph.
//!
//! 3. **Host-Agnostic**: Inventory, chat, teleport and the block/item
//!    registries live behind [`DomainServices`]. The engine only calls them.
//!
//! ## Architecture
//!
//! - **Arena Graph**: Nodes live in a persistent `im` map keyed by stable
//!   ids, so a [`Scenario`] clones in O(1).
//!
//! - **Run-to-Completion Dispatch**: One occurrence is matched, checked and
//!   executed synchronously. Edits take `&mut Scenario`, dispatch takes
//!   `&Scenario`, so the two cannot interleave.
//!
//! ## Modules
//!
//! - `core`: Actor ids, resource keys, random source, configuration
//! - `graph`: Types, variant schemas, nodes and the node arena
//! - `eval`: Evaluator, built-in variants and display strings
//! - `scenario`: Scenario aggregate, triggers, regions, editing
//! - `triggers`: Occurrences and the trigger engine
//! - `domain`: Service boundary and an in-memory world
//! - `codec`: Text interchange format

pub mod codec;
pub mod core;
pub mod domain;
pub mod error;
pub mod eval;
pub mod graph;
pub mod scenario;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{ActorId, EngineConfig, RandomSource, ResourceKey, ScriptRng};

pub use crate::domain::{DomainServices, InMemoryWorld};

pub use crate::error::{CodecError, EvalError, Result, SchemaError, ScriptError, ServiceError};

pub use crate::eval::{Context, Evaluator, Value};

pub use crate::graph::{
    Comparator, DamageType, Literal, NodeArena, NodeId, NodeKind, NodeTree, ValueType,
    VariantDef, VariantRegistry,
};

pub use crate::scenario::{Region, RegionBounds, RegionId, Scenario, Trigger, TriggerId, TriggerList};

pub use crate::triggers::{DispatchReport, Occurrence, OccurrenceKind, TriggerEngine};
