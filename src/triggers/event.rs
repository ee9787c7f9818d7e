//! Occurrence types.
//!
//! Occurrences are the simulation happenings the host reports to the
//! engine. Each carries the facts that end up in the evaluation
//! [`Context`](crate::eval::Context).

use serde::{Deserialize, Serialize};

use crate::core::{ActorId, ResourceKey};
use crate::graph::DamageType;
use crate::scenario::RegionId;

/// Kind of occurrence an event variant listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccurrenceKind {
    /// A block was destroyed.
    BlockDestroyed,
    /// A player spawned for the first time.
    PlayerSpawned,
    /// A player respawned after dying.
    PlayerRespawned,
    /// A player entered a region.
    RegionEntered,
    /// A player left a region.
    RegionLeft,
}

impl OccurrenceKind {
    /// Whether occurrences of this kind name a region.
    #[must_use]
    pub const fn is_region_scoped(self) -> bool {
        matches!(self, Self::RegionEntered | Self::RegionLeft)
    }
}

impl std::fmt::Display for OccurrenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A simulation occurrence with its contextual data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occurrence {
    /// A block was destroyed.
    BlockDestroyed {
        /// Actor ultimately responsible (the player who fired the arrow).
        instigator: Option<ActorId>,
        /// Actor that dealt the damage (the arrow).
        direct_cause: Option<ActorId>,
        /// Cause of damage.
        damage_type: DamageType,
        /// Block type destroyed.
        destroyed: ResourceKey,
    },
    /// A player spawned.
    PlayerSpawned {
        /// The player.
        entity: ActorId,
    },
    /// A player respawned.
    PlayerRespawned {
        /// The player.
        entity: ActorId,
    },
    /// A player entered a region.
    RegionEntered {
        /// The player.
        entity: ActorId,
        /// Region entered.
        region: RegionId,
    },
    /// A player left a region.
    RegionLeft {
        /// The player.
        entity: ActorId,
        /// Region left.
        region: RegionId,
    },
}

impl Occurrence {
    /// A block destruction with no known instigator and generic damage.
    pub fn block_destroyed(destroyed: ResourceKey) -> Self {
        Self::BlockDestroyed {
            instigator: None,
            direct_cause: None,
            damage_type: DamageType::Generic,
            destroyed,
        }
    }

    /// A first spawn.
    pub fn player_spawned(entity: ActorId) -> Self {
        Self::PlayerSpawned { entity }
    }

    /// A respawn.
    pub fn player_respawned(entity: ActorId) -> Self {
        Self::PlayerRespawned { entity }
    }

    /// A region entry.
    pub fn region_entered(entity: ActorId, region: RegionId) -> Self {
        Self::RegionEntered { entity, region }
    }

    /// A region exit.
    pub fn region_left(entity: ActorId, region: RegionId) -> Self {
        Self::RegionLeft { entity, region }
    }

    /// Set the instigator of a block destruction (builder pattern).
    /// No effect on other occurrences.
    #[must_use]
    pub fn with_instigator(mut self, actor: ActorId) -> Self {
        if let Self::BlockDestroyed { instigator, .. } = &mut self {
            *instigator = Some(actor);
        }
        self
    }

    /// Set the direct cause of a block destruction (builder pattern).
    #[must_use]
    pub fn with_direct_cause(mut self, actor: ActorId) -> Self {
        if let Self::BlockDestroyed { direct_cause, .. } = &mut self {
            *direct_cause = Some(actor);
        }
        self
    }

    /// Set the damage type of a block destruction (builder pattern).
    #[must_use]
    pub fn with_damage_type(mut self, kind: DamageType) -> Self {
        if let Self::BlockDestroyed { damage_type, .. } = &mut self {
            *damage_type = kind;
        }
        self
    }

    /// The kind of this occurrence.
    #[must_use]
    pub fn kind(&self) -> OccurrenceKind {
        match self {
            Self::BlockDestroyed { .. } => OccurrenceKind::BlockDestroyed,
            Self::PlayerSpawned { .. } => OccurrenceKind::PlayerSpawned,
            Self::PlayerRespawned { .. } => OccurrenceKind::PlayerRespawned,
            Self::RegionEntered { .. } => OccurrenceKind::RegionEntered,
            Self::RegionLeft { .. } => OccurrenceKind::RegionLeft,
        }
    }

    /// The region named by a region occurrence.
    #[must_use]
    pub fn region(&self) -> Option<RegionId> {
        match self {
            Self::RegionEntered { region, .. } | Self::RegionLeft { region, .. } => Some(*region),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrence_kind() {
        let stone = ResourceKey::new("core", "stone");
        assert_eq!(
            Occurrence::block_destroyed(stone).kind(),
            OccurrenceKind::BlockDestroyed
        );
        assert_eq!(
            Occurrence::region_entered(ActorId::new(1), RegionId::new(0)).kind(),
            OccurrenceKind::RegionEntered
        );
        assert!(OccurrenceKind::RegionLeft.is_region_scoped());
        assert!(!OccurrenceKind::PlayerSpawned.is_region_scoped());
    }

    #[test]
    fn test_block_destroyed_builder() {
        let occurrence = Occurrence::block_destroyed(ResourceKey::new("core", "stone"))
            .with_instigator(ActorId::new(1))
            .with_damage_type(DamageType::Melee);

        match occurrence {
            Occurrence::BlockDestroyed {
                instigator,
                direct_cause,
                damage_type,
                ..
            } => {
                assert_eq!(instigator, Some(ActorId::new(1)));
                assert_eq!(direct_cause, None);
                assert_eq!(damage_type, DamageType::Melee);
            }
            other => panic!("unexpected occurrence {other:?}"),
        }
    }

    #[test]
    fn test_builders_ignore_other_kinds() {
        let spawn = Occurrence::player_spawned(ActorId::new(2)).with_instigator(ActorId::new(3));
        assert_eq!(spawn, Occurrence::player_spawned(ActorId::new(2)));
        assert_eq!(spawn.region(), None);
    }

    #[test]
    fn test_occurrence_serialization() {
        let occurrence = Occurrence::region_left(ActorId::new(1), RegionId::new(4));
        let json = serde_json::to_string(&occurrence).unwrap();
        let deserialized: Occurrence = serde_json::from_str(&json).unwrap();
        assert_eq!(occurrence, deserialized);
    }
}
