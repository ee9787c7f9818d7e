//! In-memory implementation of the domain services.
//!
//! `InMemoryWorld` keeps just enough simulation state to run scripts:
//! registered block and item types, players with a position and an
//! inventory, and a record of recent chat lines, log lines and inventory
//! reads. Tests, benches and sandboxed hosts use it in place of a live
//! simulation. Each record keeps at most [`DEFAULT_RECORD_LIMIT`] entries
//! (see [`InMemoryWorld::with_record_limit`]), dropping the oldest first.

use std::cell::RefCell;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ActorId, ResourceKey};
use crate::error::ServiceError;
use crate::scenario::Region;

use super::services::DomainServices;

/// Default number of entries kept per record.
pub const DEFAULT_RECORD_LIMIT: usize = 1024;

/// A chat line sent by a script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    /// Recipient, or `None` for a broadcast.
    pub recipient: Option<ActorId>,
    /// Message text.
    pub text: String,
}

/// State kept for one player.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Display name.
    pub name: String,
    /// World position.
    pub position: [f64; 3],
    /// Held blocks by type.
    pub blocks: FxHashMap<ResourceKey, i64>,
    /// Held items by type.
    pub items: FxHashMap<ResourceKey, i64>,
}

/// Inventory read recorded by [`InMemoryWorld`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryQuery {
    /// Actor whose inventory was read.
    pub actor: ActorId,
    /// Resource counted.
    pub resource: ResourceKey,
}

/// A self-contained world.
#[derive(Clone, Debug)]
pub struct InMemoryWorld {
    blocks: FxHashSet<ResourceKey>,
    items: FxHashSet<ResourceKey>,
    players: FxHashMap<ActorId, PlayerState>,
    chat: Vec<ChatLine>,
    logs: Vec<String>,
    queries: RefCell<Vec<InventoryQuery>>,
    record_limit: usize,
}

impl Default for InMemoryWorld {
    fn default() -> Self {
        Self {
            blocks: FxHashSet::default(),
            items: FxHashSet::default(),
            players: FxHashMap::default(),
            chat: Vec::new(),
            logs: Vec::new(),
            queries: RefCell::new(Vec::new()),
            record_limit: DEFAULT_RECORD_LIMIT,
        }
    }
}

/// Append to a bounded record, dropping the oldest entries past `limit`.
fn push_capped<T>(records: &mut Vec<T>, entry: T, limit: usize) {
    records.push(entry);
    if records.len() > limit {
        let excess = records.len() - limit;
        records.drain(..excess);
    }
}

impl InMemoryWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type (builder pattern).
    ///
    /// Panics if `key` is not a valid resource key.
    #[must_use]
    pub fn with_block(mut self, key: &str) -> Self {
        self.blocks.insert(parse_key(key));
        self
    }

    /// Register an item type (builder pattern).
    ///
    /// Panics if `key` is not a valid resource key.
    #[must_use]
    pub fn with_item(mut self, key: &str) -> Self {
        self.items.insert(parse_key(key));
        self
    }

    /// Add a player at the origin with an empty inventory (builder pattern).
    #[must_use]
    pub fn with_player(mut self, actor: ActorId, name: impl Into<String>) -> Self {
        self.add_player(actor, name);
        self
    }

    /// Add or replace a player.
    pub fn add_player(&mut self, actor: ActorId, name: impl Into<String>) {
        self.players.insert(
            actor,
            PlayerState {
                name: name.into(),
                ..PlayerState::default()
            },
        );
    }

    /// Remove a player, as when they disconnect.
    pub fn remove_player(&mut self, actor: ActorId) -> Option<PlayerState> {
        self.players.remove(&actor)
    }

    /// Unregister a block type.
    pub fn remove_block_type(&mut self, block: &ResourceKey) -> bool {
        self.blocks.remove(block)
    }

    /// Set how many blocks of a type a player holds. Unknown players are
    /// ignored.
    pub fn set_blocks(&mut self, actor: ActorId, block: &ResourceKey, amount: i64) {
        if let Some(player) = self.players.get_mut(&actor) {
            player.blocks.insert(block.clone(), amount);
        }
    }

    /// Set how many items of a type a player holds. Unknown players are
    /// ignored.
    pub fn set_items(&mut self, actor: ActorId, item: &ResourceKey, amount: i64) {
        if let Some(player) = self.players.get_mut(&actor) {
            player.items.insert(item.clone(), amount);
        }
    }

    /// Move a player. Unknown players are ignored.
    pub fn set_position(&mut self, actor: ActorId, position: [f64; 3]) {
        if let Some(player) = self.players.get_mut(&actor) {
            player.position = position;
        }
    }

    /// Blocks of a type held by a player, without recording a query.
    #[must_use]
    pub fn blocks_of(&self, actor: ActorId, block: &ResourceKey) -> i64 {
        self.players
            .get(&actor)
            .and_then(|p| p.blocks.get(block).copied())
            .unwrap_or(0)
    }

    /// Items of a type held by a player, without recording a query.
    #[must_use]
    pub fn items_of(&self, actor: ActorId, item: &ResourceKey) -> i64 {
        self.players
            .get(&actor)
            .and_then(|p| p.items.get(item).copied())
            .unwrap_or(0)
    }

    /// A player's position.
    #[must_use]
    pub fn position(&self, actor: ActorId) -> Option<[f64; 3]> {
        self.players.get(&actor).map(|p| p.position)
    }

    /// Get a player's state.
    #[must_use]
    pub fn player(&self, actor: ActorId) -> Option<&PlayerState> {
        self.players.get(&actor)
    }

    /// Keep at most `limit` entries per record (builder pattern).
    #[must_use]
    pub fn with_record_limit(mut self, limit: usize) -> Self {
        self.record_limit = limit;
        self
    }

    /// Recent chat lines, oldest first.
    #[must_use]
    pub fn chat(&self) -> &[ChatLine] {
        &self.chat
    }

    /// Recent script log lines, oldest first.
    #[must_use]
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Recent inventory reads made through the service interface, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<InventoryQuery> {
        self.queries.borrow().clone()
    }

    /// Forget recorded chat, logs and queries.
    pub fn clear_records(&mut self) {
        self.chat.clear();
        self.logs.clear();
        self.queries.get_mut().clear();
    }

    fn record(&self, actor: ActorId, resource: &ResourceKey) {
        let query = InventoryQuery {
            actor,
            resource: resource.clone(),
        };
        push_capped(&mut self.queries.borrow_mut(), query, self.record_limit);
    }

    fn player_mut(&mut self, actor: ActorId) -> Result<&mut PlayerState, ServiceError> {
        self.players
            .get_mut(&actor)
            .ok_or(ServiceError::UnknownActor(actor))
    }
}

fn parse_key(key: &str) -> ResourceKey {
    ResourceKey::parse(key).unwrap_or_else(|| panic!("malformed resource key {key:?}"))
}

fn check_amount(amount: i64) -> Result<(), ServiceError> {
    if amount > 0 {
        Ok(())
    } else {
        Err(ServiceError::InvalidAmount(amount))
    }
}

impl DomainServices for InMemoryWorld {
    fn block_exists(&self, block: &ResourceKey) -> bool {
        self.blocks.contains(block)
    }

    fn item_exists(&self, item: &ResourceKey) -> bool {
        self.items.contains(item)
    }

    fn actor_exists(&self, actor: ActorId) -> bool {
        self.players.contains_key(&actor)
    }

    fn player_name(&self, actor: ActorId) -> Option<String> {
        self.players.get(&actor).map(|p| p.name.clone())
    }

    fn count_blocks(&self, actor: ActorId, block: &ResourceKey) -> i64 {
        self.record(actor, block);
        self.blocks_of(actor, block)
    }

    fn count_items(&self, actor: ActorId, item: &ResourceKey) -> i64 {
        self.record(actor, item);
        self.items_of(actor, item)
    }

    fn give_blocks(&mut self, actor: ActorId, block: &ResourceKey, amount: i64) -> Result<(), ServiceError> {
        check_amount(amount)?;
        if !self.blocks.contains(block) {
            return Err(ServiceError::UnknownBlock(block.clone()));
        }
        let held = self.player_mut(actor)?.blocks.entry(block.clone()).or_insert(0);
        *held = held.saturating_add(amount);
        debug!(%actor, %block, amount, "gave blocks");
        Ok(())
    }

    fn remove_blocks(&mut self, actor: ActorId, block: &ResourceKey, amount: i64) -> Result<(), ServiceError> {
        check_amount(amount)?;
        if !self.blocks.contains(block) {
            return Err(ServiceError::UnknownBlock(block.clone()));
        }
        let player = self.player_mut(actor)?;
        let available = player.blocks.get(block).copied().unwrap_or(0);
        if available < amount {
            return Err(ServiceError::Insufficient {
                actor,
                resource: block.clone(),
                requested: amount,
                available,
            });
        }
        player.blocks.insert(block.clone(), available - amount);
        debug!(%actor, %block, amount, "removed blocks");
        Ok(())
    }

    fn give_items(&mut self, actor: ActorId, item: &ResourceKey, amount: i64) -> Result<(), ServiceError> {
        check_amount(amount)?;
        if !self.items.contains(item) {
            return Err(ServiceError::UnknownItem(item.clone()));
        }
        let held = self.player_mut(actor)?.items.entry(item.clone()).or_insert(0);
        *held = held.saturating_add(amount);
        debug!(%actor, %item, amount, "gave items");
        Ok(())
    }

    fn broadcast(&mut self, message: &str) {
        let line = ChatLine {
            recipient: None,
            text: message.to_string(),
        };
        push_capped(&mut self.chat, line, self.record_limit);
    }

    fn send_message(&mut self, actor: ActorId, message: &str) -> Result<(), ServiceError> {
        if !self.players.contains_key(&actor) {
            return Err(ServiceError::UnknownActor(actor));
        }
        let line = ChatLine {
            recipient: Some(actor),
            text: message.to_string(),
        };
        push_capped(&mut self.chat, line, self.record_limit);
        Ok(())
    }

    fn log(&mut self, message: &str) {
        push_capped(&mut self.logs, message.to_string(), self.record_limit);
    }

    fn teleport(&mut self, actor: ActorId, region: &Region) -> Result<(), ServiceError> {
        self.player_mut(actor)?.position = region.bounds.center();
        debug!(%actor, region = %region.name, "teleported");
        Ok(())
    }

    fn is_in_region(&self, actor: ActorId, region: &Region) -> bool {
        self.players
            .get(&actor)
            .is_some_and(|p| region.bounds.contains(p.position))
    }
}
