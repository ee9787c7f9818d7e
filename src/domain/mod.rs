//! Domain services: the boundary between scripts and the simulation.
//!
//! - [`DomainServices`]: the trait hosts implement
//! - [`InMemoryWorld`]: a complete in-memory implementation

mod services;
mod world;

pub use services::DomainServices;
pub use world::{ChatLine, InMemoryWorld, InventoryQuery, PlayerState, DEFAULT_RECORD_LIMIT};
