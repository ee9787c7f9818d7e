//! Evaluation dispatcher.
//!
//! Turns nodes into [`Value`]s against an occurrence [`Context`] and the
//! host's domain services, and renders nodes as editor text.
//!
//! ## Key Components
//!
//! - [`Evaluator`]: recursive, type-directed evaluation with typed argument
//!   helpers and a depth limit
//! - [`EvalRule`]: the per-variant evaluation function stored in the registry
//! - [`Context`]: facts about the occurrence being dispatched
//! - [`display_node`]: context-free rendering from variant templates
//! - [`builtins`]: the built-in variant set
//!
//! ## Example Usage
//!
//! ```
//! use scenario_script::core::ScriptRng;
//! use scenario_script::domain::InMemoryWorld;
//! use scenario_script::eval::{Context, Evaluator, Value};
//! use scenario_script::graph::{NodeTree, VariantRegistry};
//! use scenario_script::scenario::Scenario;
//! use scenario_script::triggers::OccurrenceKind;
//!
//! let registry = VariantRegistry::with_builtins();
//! let mut scenario = Scenario::new("demo");
//! let concat = scenario
//!     .insert_tree(
//!         &registry,
//!         &NodeTree::new("ConcatString")
//!             .with_arg("string1", NodeTree::text("foo"))
//!             .with_arg("string2", NodeTree::text("bar")),
//!     )
//!     .unwrap();
//!
//! let context = Context::empty(OccurrenceKind::PlayerSpawned);
//! let mut world = InMemoryWorld::new();
//! let mut rng = ScriptRng::new(1);
//! let mut evaluator = Evaluator::new(&registry, &scenario, &context, &mut world, &mut rng);
//!
//! assert_eq!(evaluator.evaluate(concat), Ok(Value::Text("foobar".to_string())));
//! ```

pub mod builtins;
mod context;
mod display;
mod evaluator;
mod value;

pub use context::Context;
pub use display::{display_literal, display_node};
pub use evaluator::{EvalRule, Evaluator};
pub use value::Value;
