//! The host-facing service boundary.

use crate::core::{ActorId, ResourceKey};
use crate::error::ServiceError;
use crate::scenario::Region;

/// Simulation services the scripts read from and act upon.
///
/// The engine never touches simulation state directly: every query and
/// every side effect goes through this trait. Reads take `&self`; effects
/// take `&mut self` and report failure as a [`ServiceError`], which aborts
/// only the action that requested it.
pub trait DomainServices {
    /// Whether the block registry knows this block type.
    fn block_exists(&self, block: &ResourceKey) -> bool;

    /// Whether the item registry knows this item type.
    fn item_exists(&self, item: &ResourceKey) -> bool;

    /// Whether the actor is currently alive in the simulation.
    fn actor_exists(&self, actor: ActorId) -> bool;

    /// Display name of a player, if the actor is one.
    fn player_name(&self, actor: ActorId) -> Option<String>;

    /// How many blocks of a type the actor holds. Unknown actors hold none.
    fn count_blocks(&self, actor: ActorId, block: &ResourceKey) -> i64;

    /// How many items of a type the actor holds. Unknown actors hold none.
    fn count_items(&self, actor: ActorId, item: &ResourceKey) -> i64;

    /// Add blocks to the actor's inventory.
    ///
    /// # Errors
    /// Fails for unknown actors or blocks and non-positive amounts.
    fn give_blocks(&mut self, actor: ActorId, block: &ResourceKey, amount: i64) -> Result<(), ServiceError>;

    /// Take blocks from the actor's inventory.
    ///
    /// # Errors
    /// Fails as [`give_blocks`](Self::give_blocks) does, and when the actor
    /// holds fewer than `amount`.
    fn remove_blocks(&mut self, actor: ActorId, block: &ResourceKey, amount: i64) -> Result<(), ServiceError>;

    /// Add items to the actor's inventory.
    ///
    /// # Errors
    /// Fails for unknown actors or items and non-positive amounts.
    fn give_items(&mut self, actor: ActorId, item: &ResourceKey, amount: i64) -> Result<(), ServiceError>;

    /// Send a chat message to everyone.
    fn broadcast(&mut self, message: &str);

    /// Send a chat message to one player.
    ///
    /// # Errors
    /// Fails for unknown actors.
    fn send_message(&mut self, actor: ActorId, message: &str) -> Result<(), ServiceError>;

    /// Write a script log line. Defaults to an `info` event on the
    /// `scenario_script::script` target.
    fn log(&mut self, message: &str) {
        tracing::info!(target: "scenario_script::script", "{message}");
    }

    /// Move the actor into a region.
    ///
    /// # Errors
    /// Fails for unknown actors.
    fn teleport(&mut self, actor: ActorId, region: &Region) -> Result<(), ServiceError>;

    /// Whether the actor is inside a region.
    fn is_in_region(&self, actor: ActorId, region: &Region) -> bool;
}
