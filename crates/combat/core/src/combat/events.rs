//! Combat event records and their canonical ordering keys.

use crate::state::{EntityId, SkillId, Tick};

/// Ordering shared by every event kind the core retains or checksums.
///
/// The key is a total order over all fields: two events with equal keys are
/// indistinguishable, so a stable sort by key fixes one sequence regardless
/// of production order.
pub trait CanonicalOrder {
    type Key: Ord;

    fn canonical_key(&self) -> Self::Key;

    fn tick(&self) -> Tick;
}

/// Discriminant of the transient combat-event stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CombatEventKind {
    Damage = 0,
    Kill = 1,
}

impl CombatEventKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// One resolved combat action, as surfaced to zone snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEvent {
    pub tick: Tick,
    pub source: EntityId,
    pub target: EntityId,
    pub skill: SkillId,
    pub kind: CombatEventKind,
    pub amount: i32,
}

impl CanonicalOrder for CombatEvent {
    type Key = (Tick, EntityId, EntityId, SkillId, u8, i32);

    fn canonical_key(&self) -> Self::Key {
        (
            self.tick,
            self.source,
            self.target,
            self.skill,
            self.kind as u8,
            self.amount,
        )
    }

    fn tick(&self) -> Tick {
        self.tick
    }
}

/// Discriminant of the persisted combat log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CombatLogKind {
    Damage = 0,
    Kill = 1,
}

impl CombatLogKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Persisted record of damage dealt or a kill scored.
///
/// `raw_amount` is the skill damage before the target's remaining health is
/// taken into account; `final_amount` is the health actually removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLogEvent {
    pub tick: Tick,
    pub source: EntityId,
    pub target: EntityId,
    pub skill: SkillId,
    pub kind: CombatLogKind,
    pub raw_amount: i32,
    pub final_amount: i32,
}

impl CanonicalOrder for CombatLogEvent {
    type Key = (Tick, EntityId, EntityId, SkillId, u8, i32, i32);

    fn canonical_key(&self) -> Self::Key {
        (
            self.tick,
            self.source,
            self.target,
            self.skill,
            self.kind as u8,
            self.raw_amount,
            self.final_amount,
        )
    }

    fn tick(&self) -> Tick {
        self.tick
    }
}

impl From<&CombatLogEvent> for CombatEvent {
    fn from(event: &CombatLogEvent) -> Self {
        let kind = match event.kind {
            CombatLogKind::Damage => CombatEventKind::Damage,
            CombatLogKind::Kill => CombatEventKind::Kill,
        };
        Self {
            tick: event.tick,
            source: event.source,
            target: event.target,
            skill: event.skill,
            kind,
            amount: event.final_amount,
        }
    }
}
