//! Per-tick combat driver.
//!
//! [`TickDriver::step`] is the single entry point the zone orchestrator calls
//! once per tick per zone:
//!
//! 1. Raw commands are projected, checked for coherence and legality, and
//!    gated on cooldowns ([`SkillCastResolver`]).
//! 2. Accepted intents are resolved in canonical order
//!    ([`SkillEffectResolver`]).
//! 3. Cooldowns and threat are recorded, killed entities are purged from
//!    the ledger, and the events enter the zone's retained history.
//! 4. Cooldowns advance by one tick.
//!
//! All inputs are taken by value and all outputs returned by value, so zones
//! can be stepped in parallel by the caller as long as they share no entity.
mod ledger;
mod report;

pub use ledger::{CombatantLedger, CombatantRecord};
pub use report::TickReport;

pub use crate::action::RejectReason;

use tracing::{debug, trace};

use crate::action::{SkillCastResolver, SkillEffectResolver, WorldCommand};
use crate::combat::{
    CombatEvent, CombatEventBuffer, CombatLogEvent, CombatLogKind, order_canonically,
};
use crate::config::SimulationConfig;
use crate::state::{EntityId, SkillId, Tick, ZoneState};

/// Combat state of one zone carried from tick to tick.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneCombat {
    pub zone: ZoneState,
    pub ledger: CombatantLedger,
    pub history: CombatEventBuffer,
}

impl ZoneCombat {
    pub fn new(zone: ZoneState, history: CombatEventBuffer) -> Self {
        Self {
            zone,
            ledger: CombatantLedger::default(),
            history,
        }
    }
}

/// Result of stepping one zone by one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub state: ZoneCombat,
    /// This tick's log events in resolution order.
    pub events: Vec<CombatLogEvent>,
    pub report: TickReport,
}

/// Drives combat resolution for a zone using one configuration.
#[derive(Clone, Copy, Debug)]
pub struct TickDriver<'a> {
    config: &'a SimulationConfig,
}

impl<'a> TickDriver<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a SimulationConfig {
        self.config
    }

    /// Resolves `commands` issued on `tick` against `state`.
    pub fn step(&self, tick: Tick, state: ZoneCombat, commands: &[WorldCommand]) -> TickOutcome {
        let ZoneCombat {
            zone,
            ledger,
            history,
        } = state;
        let mut report = TickReport::new(commands.len());

        let mut candidates = Vec::with_capacity(commands.len());
        for command in commands {
            match SkillCastResolver::intake(self.config, &zone, tick, command) {
                Ok(intent) => candidates.push(intent),
                Err(reason) => {
                    trace!(
                        target: "combat::engine",
                        actor = %command.actor,
                        reason = reason.as_str(),
                        "command rejected"
                    );
                    report.reject(reason);
                }
            }
        }

        // Cooldowns also bind within the tick: only the canonically first cast
        // of a (caster, skill) pair with a cooldown goes through.
        let mut intents = Vec::with_capacity(candidates.len());
        let mut started: Vec<(EntityId, SkillId)> = Vec::new();
        for intent in order_canonically(candidates) {
            if !ledger.is_ready(intent.caster, intent.skill) {
                trace!(
                    target: "combat::engine",
                    actor = %intent.caster,
                    skill = %intent.skill,
                    "skill on cooldown"
                );
                report.reject(RejectReason::OnCooldown);
                continue;
            }
            let has_cooldown = self
                .config
                .skill(intent.skill)
                .is_some_and(|skill| skill.cooldown_ticks > 0);
            if has_cooldown {
                let key = (intent.caster, intent.skill);
                match started.binary_search(&key) {
                    Ok(_) => {
                        trace!(
                            target: "combat::engine",
                            actor = %intent.caster,
                            skill = %intent.skill,
                            "repeat cast within tick"
                        );
                        report.reject(RejectReason::OnCooldown);
                        continue;
                    }
                    Err(index) => started.insert(index, key),
                }
            }
            intents.push(intent);
        }
        report.accepted = intents.len();

        let resolution = SkillEffectResolver::resolve(self.config, tick, zone, intents);
        report.skipped_intents = resolution.skipped;
        report.dropped_intents = resolution.dropped;

        let mut ledger =
            ledger.record_tick(self.config, tick, &resolution.examined, &resolution.events);
        for kill in resolution
            .events
            .iter()
            .filter(|event| event.kind == CombatLogKind::Kill)
        {
            ledger = ledger.forget(kill.target);
        }

        let combat_events: Vec<CombatEvent> =
            resolution.events.iter().map(CombatEvent::from).collect();
        let (history, over_budget) = history.ingest(combat_events);
        let history = history.ingest_log(resolution.events.clone());
        report.events_over_budget = over_budget;

        debug!(
            target: "combat::engine",
            %tick,
            zone = %resolution.zone.id,
            commands = report.commands,
            accepted = report.accepted,
            rejected = report.total_rejected(),
            events = resolution.events.len(),
            "tick stepped"
        );

        TickOutcome {
            state: ZoneCombat {
                zone: resolution.zone,
                ledger: ledger.advance(),
                history,
            },
            events: resolution.events,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SkillDefinition, SkillTable};
    use crate::fixed::{Fixed, FixedVec2};
    use crate::state::{EntityState, TileGrid, ZoneId};

    fn config() -> SimulationConfig {
        SimulationConfig::new(SkillTable::new(vec![
            SkillDefinition::new(SkillId(1), 30, Fixed::from_int(4)).with_cooldown(2),
        ]))
    }

    fn state() -> ZoneCombat {
        let zone = ZoneState::new(
            ZoneId(3),
            vec![
                EntityState::new(EntityId(1), 100, FixedVec2::from_ints(0, 0)),
                EntityState::new(EntityId(2), 50, FixedVec2::from_ints(2, 0)),
            ],
            TileGrid::default(),
        );
        ZoneCombat::new(zone, CombatEventBuffer::default())
    }

    #[test]
    fn cooldown_gates_the_following_tick() {
        let config = config();
        let driver = TickDriver::new(&config);
        let cast = [WorldCommand::cast_at_entity(EntityId(1), SkillId(1), EntityId(2))];

        let first = driver.step(Tick(1), state(), &cast);
        assert_eq!(first.report.accepted, 1);
        assert_eq!(first.events.len(), 1);
        assert!(first.state.ledger.threat(EntityId(2)).is_some());

        let second = driver.step(Tick(2), first.state, &cast);
        assert_eq!(second.report.rejected(RejectReason::OnCooldown), 1);
        assert!(second.events.is_empty());

        let third = driver.step(Tick(3), second.state, &cast);
        assert_eq!(third.report.accepted, 1);
        // 50 - 30 - 30: second landed hit kills.
        assert_eq!(third.events.len(), 2);
        assert_eq!(third.events[1].kind, CombatLogKind::Kill);
        assert!(third.state.ledger.threat(EntityId(2)).is_none());
        assert_eq!(third.state.history.events().len(), 3);
        assert_eq!(third.state.history.log_events().len(), 3);
    }

    #[test]
    fn repeated_casts_in_one_tick_respect_cooldown() {
        let config = config();
        let driver = TickDriver::new(&config);
        let cast = WorldCommand::cast_at_entity(EntityId(1), SkillId(1), EntityId(2));

        let outcome = driver.step(Tick(1), state(), &[cast.clone(), cast.clone(), cast]);
        assert_eq!(outcome.report.accepted, 1);
        assert_eq!(outcome.report.rejected(RejectReason::OnCooldown), 2);
        assert_eq!(outcome.events.len(), 1);
        let target = outcome.state.zone.entity(EntityId(2)).map(|e| e.health);
        assert_eq!(target, Some(20));
    }

    #[test]
    fn canonically_first_target_wins_a_contested_cooldown() {
        let config = config();
        let driver = TickDriver::new(&config);
        let state = ZoneCombat::new(
            state()
                .zone
                .with_entity(EntityState::new(EntityId(3), 50, FixedVec2::from_ints(0, 2))),
            CombatEventBuffer::default(),
        );
        let commands = [
            WorldCommand::cast_at_entity(EntityId(1), SkillId(1), EntityId(3)),
            WorldCommand::cast_at_entity(EntityId(1), SkillId(1), EntityId(2)),
        ];

        let outcome = driver.step(Tick(1), state, &commands);
        assert_eq!(outcome.report.accepted, 1);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].target, EntityId(2));
    }

    #[test]
    fn skills_without_cooldown_repeat_within_a_tick() {
        let config = SimulationConfig::new(SkillTable::new(vec![SkillDefinition::new(
            SkillId(2),
            5,
            Fixed::from_int(4),
        )]));
        let driver = TickDriver::new(&config);
        let cast = WorldCommand::cast_at_entity(EntityId(1), SkillId(2), EntityId(2));

        let outcome = driver.step(Tick(1), state(), &[cast.clone(), cast.clone(), cast]);
        assert_eq!(outcome.report.accepted, 3);
        assert_eq!(outcome.report.total_rejected(), 0);
        let target = outcome.state.zone.entity(EntityId(2)).map(|e| e.health);
        assert_eq!(target, Some(35));
    }

    #[test]
    fn rejections_are_counted_by_reason() {
        let config = config();
        let driver = TickDriver::new(&config);
        let mut incoherent = WorldCommand::cast_at_entity(EntityId(1), SkillId(1), EntityId(2));
        incoherent.target_entity = None;
        let commands = [
            incoherent,
            WorldCommand::cast_at_entity(EntityId(1), SkillId(9), EntityId(2)),
            WorldCommand::cast_at_point(EntityId(1), SkillId(1), FixedVec2::from_ints(40, 0)),
        ];
        let outcome = driver.step(Tick(1), state(), &commands);
        assert_eq!(outcome.report.accepted, 0);
        assert_eq!(outcome.report.rejected(RejectReason::IncoherentTarget), 1);
        assert_eq!(outcome.report.rejected(RejectReason::UnknownSkill), 1);
        assert_eq!(outcome.report.rejected(RejectReason::OutOfRange), 1);
        assert_eq!(outcome.report.rejections().count(), 3);
        assert_eq!(outcome.state.zone, state().zone);
    }
}
