//! Raw world commands and the typed cast requests derived from them.

use crate::combat::CanonicalOrder;
use crate::fixed::FixedVec2;
use crate::state::{EntityId, SkillId, Tick};

/// Kind of a command collected by the per-tick intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldCommandKind {
    Move,
    CastSkill,
    Interact,
}

/// Untyped command as received from the intake; every payload field is
/// optional and only meaningful for some kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldCommand {
    pub actor: EntityId,
    pub kind: WorldCommandKind,
    pub skill: Option<SkillId>,
    /// Raw target discriminant, see [`TargetKind::from_raw`].
    pub target_kind: u8,
    pub target_entity: Option<EntityId>,
    pub target_position: Option<FixedVec2>,
}

impl WorldCommand {
    /// Cast at another entity.
    pub fn cast_at_entity(actor: EntityId, skill: SkillId, target: EntityId) -> Self {
        Self {
            actor,
            kind: WorldCommandKind::CastSkill,
            skill: Some(skill),
            target_kind: TargetKind::Entity.as_raw(),
            target_entity: Some(target),
            target_position: None,
        }
    }

    /// Cast at a ground position.
    pub fn cast_at_point(actor: EntityId, skill: SkillId, point: FixedVec2) -> Self {
        Self {
            actor,
            kind: WorldCommandKind::CastSkill,
            skill: Some(skill),
            target_kind: TargetKind::Point.as_raw(),
            target_entity: None,
            target_position: Some(point),
        }
    }

    /// Cast on the caster itself.
    pub fn cast_on_self(actor: EntityId, skill: SkillId) -> Self {
        Self {
            actor,
            kind: WorldCommandKind::CastSkill,
            skill: Some(skill),
            target_kind: TargetKind::SelfOnly.as_raw(),
            target_entity: None,
            target_position: None,
        }
    }
}

/// Target discriminant of a cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    SelfOnly,
    Entity,
    Point,
    /// Discriminant outside the known set; never coherent.
    Unrecognized(u8),
}

impl TargetKind {
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::SelfOnly,
            1 => Self::Entity,
            2 => Self::Point,
            other => Self::Unrecognized(other),
        }
    }

    pub const fn as_raw(self) -> u8 {
        match self {
            Self::SelfOnly => 0,
            Self::Entity => 1,
            Self::Point => 2,
            Self::Unrecognized(raw) => raw,
        }
    }
}

/// Typed cast request. Absent ids are [`EntityId::NONE`], absent positions
/// are [`FixedVec2::ZERO`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastSkillCommand {
    pub caster: EntityId,
    pub skill: SkillId,
    pub target_kind: TargetKind,
    pub target_entity: EntityId,
    pub target_position: FixedVec2,
}

/// Validated cast stamped with the tick it was issued on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCastIntent {
    pub tick: Tick,
    pub caster: EntityId,
    pub skill: SkillId,
    pub target_kind: TargetKind,
    pub target_entity: EntityId,
    pub target_position: FixedVec2,
}

impl CanonicalOrder for SkillCastIntent {
    type Key = (Tick, EntityId, SkillId, u8, EntityId, i64, i64);

    fn canonical_key(&self) -> Self::Key {
        (
            self.tick,
            self.caster,
            self.skill,
            self.target_kind.as_raw(),
            self.target_entity,
            self.target_position.x.raw(),
            self.target_position.y.raw(),
        )
    }

    fn tick(&self) -> Tick {
        self.tick
    }
}
