//! Occurrence dispatch.
//!
//! The host reports each simulation happening as an [`Occurrence`]. The
//! [`TriggerEngine`] matches it against the loaded scenario's triggers,
//! checks their conditions and runs their actions through the host's
//! [`DomainServices`](crate::domain::DomainServices).
//!
//! ## Key Components
//!
//! - [`Occurrence`], [`OccurrenceKind`]: what happened
//! - [`TriggerEngine`]: matching and execution
//! - [`DispatchReport`], [`TriggerOutcome`]: what the dispatch did
//!
//! ## Example Usage
//!
//! ```
//! use scenario_script::core::{ActorId, EngineConfig};
//! use scenario_script::domain::InMemoryWorld;
//! use scenario_script::graph::NodeTree;
//! use scenario_script::scenario::{Scenario, TriggerList};
//! use scenario_script::triggers::{Occurrence, TriggerEngine};
//!
//! let mut engine = TriggerEngine::new(EngineConfig::new().with_seed(1));
//! let mut scenario = Scenario::new("welcome");
//!
//! let trigger = scenario.add_trigger("greet");
//! scenario.add_event(engine.registry(), trigger, "PlayerSpawned").unwrap();
//! let greet = scenario
//!     .insert_tree(
//!         engine.registry(),
//!         &NodeTree::new("SendChatMessage").with_arg("message", NodeTree::text("welcome!")),
//!     )
//!     .unwrap();
//! scenario.attach(trigger, TriggerList::Actions, greet).unwrap();
//!
//! let mut world = InMemoryWorld::new().with_player(ActorId::new(1), "Alex");
//! let report = engine.dispatch(
//!     Some(&scenario),
//!     &mut world,
//!     &Occurrence::player_spawned(ActorId::new(1)),
//! );
//!
//! assert_eq!(report.fired().collect::<Vec<_>>(), vec![trigger]);
//! assert_eq!(world.chat()[0].text, "welcome!");
//! ```

mod engine;
mod event;

pub use engine::{
    ActionFailure, DispatchPhase, DispatchReport, TriggerEngine, TriggerOutcome, TriggerStatus,
};
pub use event::{Occurrence, OccurrenceKind};
