//! Per-tick intent resolution.
//!
//! Intents are folded over the zone strictly in canonical order, each one
//! seeing the zone as left by the previous. A target killed by an earlier
//! intent is therefore skipped by every later intent in the same tick.

use arrayvec::ArrayVec;
use tracing::{debug, trace, warn};

use super::cast::entity_target;
use super::command::SkillCastIntent;
use crate::combat::{CombatLogEvent, CombatLogKind, order_canonically};
use crate::config::SimulationConfig;
use crate::state::{Tick, ZoneState};

/// Everything produced by resolving one tick's intents in one zone.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TickResolution {
    pub zone: ZoneState,
    /// Log events in resolution order.
    pub events: Vec<CombatLogEvent>,
    /// Intents examined (resolved or skipped), in resolution order.
    pub examined: Vec<SkillCastIntent>,
    /// Examined intents that contributed nothing (non-entity target, unknown
    /// skill, missing caster or target, dead target).
    pub skipped: usize,
    /// Intents never examined because the per-tick event cap was reached.
    pub dropped: usize,
}

/// The tick-level damage resolver.
pub struct SkillEffectResolver;

impl SkillEffectResolver {
    /// Resolves `intents` against `zone`, returning the new zone and the log
    /// events emitted.
    pub fn apply_pending_intents(
        config: &SimulationConfig,
        tick: Tick,
        zone: ZoneState,
        intents: Vec<SkillCastIntent>,
    ) -> (ZoneState, Vec<CombatLogEvent>) {
        let resolution = Self::resolve(config, tick, zone, intents);
        (resolution.zone, resolution.events)
    }

    /// Like [`SkillEffectResolver::apply_pending_intents`], keeping the
    /// bookkeeping the tick driver needs.
    pub fn resolve(
        config: &SimulationConfig,
        tick: Tick,
        zone: ZoneState,
        intents: Vec<SkillCastIntent>,
    ) -> TickResolution {
        if intents.is_empty() {
            return TickResolution {
                zone,
                ..TickResolution::default()
            };
        }

        let ordered = order_canonically(intents);
        let total = ordered.len();
        let cap = SimulationConfig::MAX_COMBAT_LOG_EVENTS_PER_TICK;

        let mut resolution = TickResolution {
            zone,
            ..TickResolution::default()
        };

        for (position, intent) in ordered.into_iter().enumerate() {
            if resolution.events.len() >= cap {
                resolution.dropped = total - position;
                warn!(
                    target: "combat::resolve",
                    %tick,
                    zone = %resolution.zone.id,
                    dropped = resolution.dropped,
                    "per-tick combat log cap reached; remaining intents dropped"
                );
                break;
            }

            let zone = core::mem::take(&mut resolution.zone);
            let (zone, emitted) = Self::resolve_one(config, tick, zone, &intent);
            resolution.zone = zone;
            match emitted {
                Some(events) => resolution.events.extend(events),
                None => resolution.skipped += 1,
            }
            resolution.examined.push(intent);
        }

        debug!(
            target: "combat::resolve",
            %tick,
            zone = %resolution.zone.id,
            examined = resolution.examined.len(),
            skipped = resolution.skipped,
            events = resolution.events.len(),
            "tick resolved"
        );
        resolution
    }

    /// Applies one intent to `zone`. A `None` event set means the intent was
    /// skipped and the zone is returned untouched.
    fn resolve_one(
        config: &SimulationConfig,
        tick: Tick,
        zone: ZoneState,
        intent: &SkillCastIntent,
    ) -> (ZoneState, Option<ArrayVec<CombatLogEvent, 2>>) {
        let Some(target_id) = entity_target(intent) else {
            trace!(target: "combat::resolve", caster = %intent.caster, "non-entity cast skipped");
            return (zone, None);
        };
        let Some(skill) = config.skill(intent.skill) else {
            trace!(target: "combat::resolve", skill = %intent.skill, "unknown skill skipped");
            return (zone, None);
        };
        if zone.entity_index(intent.caster).is_none() {
            trace!(target: "combat::resolve", caster = %intent.caster, "missing caster skipped");
            return (zone, None);
        }
        let Some(target) = zone.entity(target_id) else {
            trace!(target: "combat::resolve", defender = %target_id, "missing target skipped");
            return (zone, None);
        };
        if !target.alive {
            trace!(target: "combat::resolve", defender = %target_id, "dead target skipped");
            return (zone, None);
        }

        let damage = skill.damage();
        let (damaged, killed) = target.damaged(damage);
        let dealt = target.health - damaged.health;

        let mut events = ArrayVec::new();
        let damage_event = CombatLogEvent {
            tick,
            source: intent.caster,
            target: target_id,
            skill: intent.skill,
            kind: CombatLogKind::Damage,
            raw_amount: damage,
            final_amount: dealt,
        };
        events.push(damage_event);
        if killed {
            debug!(
                target: "combat::resolve",
                %tick,
                source = %intent.caster,
                defender = %target_id,
                "target killed"
            );
            events.push(CombatLogEvent {
                kind: CombatLogKind::Kill,
                ..damage_event
            });
        }

        (zone.with_entity(damaged), Some(events))
    }
}
