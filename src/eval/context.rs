//! Per-occurrence evaluation context.

use crate::core::{ActorId, ResourceKey};
use crate::graph::DamageType;
use crate::scenario::RegionId;
use crate::triggers::{Occurrence, OccurrenceKind};

/// Facts about the occurrence being dispatched.
///
/// Built once when an occurrence arrives and dropped when every matching
/// trigger has been processed. Context expressions such as
/// `TriggeringPlayer` read from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Context {
    kind: OccurrenceKind,
    triggering_actor: Option<ActorId>,
    direct_cause: Option<ActorId>,
    damage_type: Option<DamageType>,
    destroyed_block: Option<ResourceKey>,
    region: Option<RegionId>,
}

impl Context {
    /// Build the context for an occurrence.
    #[must_use]
    pub fn from_occurrence(occurrence: &Occurrence) -> Self {
        let mut context = Self::empty(occurrence.kind());
        match occurrence {
            Occurrence::BlockDestroyed {
                instigator,
                direct_cause,
                damage_type,
                destroyed,
            } => {
                context.triggering_actor = *instigator;
                context.direct_cause = *direct_cause;
                context.damage_type = Some(*damage_type);
                context.destroyed_block = Some(destroyed.clone());
            }
            Occurrence::PlayerSpawned { entity } | Occurrence::PlayerRespawned { entity } => {
                context.triggering_actor = Some(*entity);
            }
            Occurrence::RegionEntered { entity, region }
            | Occurrence::RegionLeft { entity, region } => {
                context.triggering_actor = Some(*entity);
                context.region = Some(*region);
            }
        }
        context
    }

    /// A context carrying no facts, for evaluating outside a dispatch
    /// (editor previews, tests).
    #[must_use]
    pub fn empty(kind: OccurrenceKind) -> Self {
        Self {
            kind,
            triggering_actor: None,
            direct_cause: None,
            damage_type: None,
            destroyed_block: None,
            region: None,
        }
    }

    /// Set the triggering actor (builder pattern).
    #[must_use]
    pub fn with_actor(mut self, actor: ActorId) -> Self {
        self.triggering_actor = Some(actor);
        self
    }

    /// Kind of the occurrence.
    #[must_use]
    pub fn kind(&self) -> OccurrenceKind {
        self.kind
    }

    /// The actor that caused the occurrence: the instigator of a destroyed
    /// block, or the player who spawned or moved.
    #[must_use]
    pub fn triggering_actor(&self) -> Option<ActorId> {
        self.triggering_actor
    }

    /// The actor that directly dealt the damage (e.g. a projectile owner's
    /// projectile), when different from the instigator.
    #[must_use]
    pub fn direct_cause(&self) -> Option<ActorId> {
        self.direct_cause
    }

    /// Cause of damage for destroyed blocks.
    #[must_use]
    pub fn damage_type(&self) -> Option<DamageType> {
        self.damage_type
    }

    /// The block type that was destroyed.
    #[must_use]
    pub fn destroyed_block(&self) -> Option<&ResourceKey> {
        self.destroyed_block.as_ref()
    }

    /// The region entered or left.
    #[must_use]
    pub fn region(&self) -> Option<RegionId> {
        self.region
    }
}
