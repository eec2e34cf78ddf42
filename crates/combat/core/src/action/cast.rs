//! Cast intake: raw command → typed command → tick-stamped intent.
//!
//! Incoherent or illegal casts are not errors. They are reported back as a
//! [`RejectReason`] so the tick driver can count and log them, and then the
//! command is dropped.

use tracing::trace;

use super::command::{CastSkillCommand, SkillCastIntent, TargetKind, WorldCommand, WorldCommandKind};
use crate::config::{SimulationConfig, SkillDefinition};
use crate::env::has_line_of_sight;
use crate::fixed::FixedVec2;
use crate::state::{EntityId, Tick, ZoneState};

/// Why a command never became an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    NotACast,
    IncoherentTarget,
    UnknownSkill,
    CasterMissing,
    CasterDead,
    TargetMissing,
    OutOfRange,
    NoLineOfSight,
    OnCooldown,
}

impl RejectReason {
    pub const ALL: [Self; 9] = [
        Self::NotACast,
        Self::IncoherentTarget,
        Self::UnknownSkill,
        Self::CasterMissing,
        Self::CasterDead,
        Self::TargetMissing,
        Self::OutOfRange,
        Self::NoLineOfSight,
        Self::OnCooldown,
    ];

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Validates and normalizes cast requests.
pub struct SkillCastResolver;

impl SkillCastResolver {
    /// Projects a raw command into a cast request. Returns `None` for
    /// commands of any other kind or without a skill.
    pub fn from_raw_command(command: &WorldCommand) -> Option<CastSkillCommand> {
        if command.kind != WorldCommandKind::CastSkill {
            return None;
        }
        Some(CastSkillCommand {
            caster: command.actor,
            skill: command.skill?,
            target_kind: TargetKind::from_raw(command.target_kind),
            target_entity: command.target_entity.unwrap_or_default(),
            target_position: command.target_position.unwrap_or(FixedVec2::ZERO),
        })
    }

    /// Checks that the target fields agree with the target kind.
    pub fn has_coherent_target(command: &CastSkillCommand) -> bool {
        match command.target_kind {
            TargetKind::SelfOnly => {
                command.target_entity.is_none() && command.target_position.is_zero()
            }
            TargetKind::Entity => {
                !command.target_entity.is_none() && command.target_position.is_zero()
            }
            TargetKind::Point => command.target_entity.is_none(),
            TargetKind::Unrecognized(_) => false,
        }
    }

    /// Checks a coherent command against the zone: known skill, living caster,
    /// existing target within range and, when the skill demands it, in sight.
    pub fn check_castable<'c>(
        config: &'c SimulationConfig,
        zone: &ZoneState,
        command: &CastSkillCommand,
    ) -> Result<&'c SkillDefinition, RejectReason> {
        let skill = config
            .skill(command.skill)
            .ok_or(RejectReason::UnknownSkill)?;
        let caster = zone
            .entity(command.caster)
            .ok_or(RejectReason::CasterMissing)?;
        if !caster.alive {
            return Err(RejectReason::CasterDead);
        }

        let aim = match command.target_kind {
            TargetKind::SelfOnly => return Ok(skill),
            TargetKind::Entity => {
                zone.entity(command.target_entity)
                    .ok_or(RejectReason::TargetMissing)?
                    .position
            }
            TargetKind::Point => command.target_position,
            TargetKind::Unrecognized(_) => return Err(RejectReason::IncoherentTarget),
        };

        if !caster.position.within_range(aim, skill.range) {
            return Err(RejectReason::OutOfRange);
        }
        if skill.requires_line_of_sight && !has_line_of_sight(&zone.tiles, caster.position, aim) {
            return Err(RejectReason::NoLineOfSight);
        }
        Ok(skill)
    }

    /// Stamps a validated command with its issue tick.
    pub fn to_intent(tick: Tick, command: &CastSkillCommand) -> SkillCastIntent {
        SkillCastIntent {
            tick,
            caster: command.caster,
            skill: command.skill,
            target_kind: command.target_kind,
            target_entity: command.target_entity,
            target_position: command.target_position,
        }
    }

    /// Full intake for one raw command, without cooldown gating.
    pub fn intake(
        config: &SimulationConfig,
        zone: &ZoneState,
        tick: Tick,
        command: &WorldCommand,
    ) -> Result<SkillCastIntent, RejectReason> {
        let cast = Self::from_raw_command(command).ok_or(RejectReason::NotACast)?;
        if !Self::has_coherent_target(&cast) {
            trace!(target: "combat::cast", caster = %cast.caster, "incoherent target");
            return Err(RejectReason::IncoherentTarget);
        }
        Self::check_castable(config, zone, &cast)?;
        Ok(Self::to_intent(tick, &cast))
    }
}

/// Target entity of an intent, if it aims at one.
pub(crate) fn entity_target(intent: &SkillCastIntent) -> Option<EntityId> {
    (intent.target_kind == TargetKind::Entity).then_some(intent.target_entity)
}
