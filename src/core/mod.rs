//! Core types: simulation identifiers, random source, configuration.

pub mod entity;
pub mod rng;
pub mod config;

pub use entity::{ActorId, ResourceKey};
pub use rng::{RandomSource, ScriptRng};
pub use config::{EngineConfig, DEFAULT_MAX_DEPTH};
