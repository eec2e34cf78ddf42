//! Cooldown and threat bookkeeping for every combatant of a zone.

use tracing::trace;

use crate::action::SkillCastIntent;
use crate::combat::{CombatLogEvent, CombatLogKind, CooldownTracker, ThreatTable};
use crate::config::SimulationConfig;
use crate::error::InvariantViolation;
use crate::state::{EntityId, SkillId, Tick};

/// Cooldowns and threat table of one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantRecord {
    pub entity: EntityId,
    pub cooldowns: CooldownTracker,
    pub threat: ThreatTable,
}

impl CombatantRecord {
    fn new(entity: EntityId) -> Self {
        Self {
            entity,
            cooldowns: CooldownTracker::EMPTY,
            threat: ThreatTable::EMPTY,
        }
    }

    fn is_idle(&self) -> bool {
        self.cooldowns.is_empty() && self.threat.is_empty()
    }
}

/// Per-zone combatant records sorted by entity id.
///
/// A record with no cooldowns and no threat is never stored, so two ledgers
/// describing the same situation are always equal.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantLedger {
    records: Vec<CombatantRecord>,
}

impl CombatantLedger {
    pub fn records(&self) -> &[CombatantRecord] {
        &self.records
    }

    pub fn record(&self, entity: EntityId) -> Option<&CombatantRecord> {
        self.locate(entity).ok().map(|index| &self.records[index])
    }

    pub fn cooldowns(&self, entity: EntityId) -> Option<&CooldownTracker> {
        self.record(entity).map(|record| &record.cooldowns)
    }

    pub fn threat(&self, entity: EntityId) -> Option<&ThreatTable> {
        self.record(entity).map(|record| &record.threat)
    }

    pub fn is_ready(&self, caster: EntityId, skill: SkillId) -> bool {
        self.cooldowns(caster)
            .is_none_or(|cooldowns| cooldowns.is_ready(skill))
    }

    /// Starts cooldowns for `cast` intents and adds threat for every Damage
    /// event in `events`.
    #[must_use]
    pub fn record_tick(
        mut self,
        config: &SimulationConfig,
        tick: Tick,
        cast: &[SkillCastIntent],
        events: &[CombatLogEvent],
    ) -> Self {
        for intent in cast {
            let Some(skill) = config.skill(intent.skill) else {
                continue;
            };
            if skill.cooldown_ticks <= 0 {
                continue;
            }
            self.update(intent.caster, |record| {
                record.cooldowns =
                    core::mem::take(&mut record.cooldowns).start_cooldown(skill.id, skill.cooldown_ticks);
            });
        }

        for event in events.iter().filter(|e| e.kind == CombatLogKind::Damage) {
            let percent = config
                .skill(event.skill)
                .map_or(0, |skill| skill.threat_percent);
            let amount = i64::from(event.final_amount) * i64::from(percent) / 100;
            if amount <= 0 {
                continue;
            }
            self.update(event.target, |record| {
                record.threat = core::mem::take(&mut record.threat).add_threat(event.source, amount, tick);
            });
        }
        self
    }

    /// Removes `entity`'s record and purges it from every threat table.
    #[must_use]
    pub fn forget(mut self, entity: EntityId) -> Self {
        if let Ok(index) = self.locate(entity) {
            self.records.remove(index);
        }
        for record in &mut self.records {
            if let Some(position) = record.threat.position_of(entity) {
                record.threat = core::mem::take(&mut record.threat).remove_at(position);
            }
        }
        self.records.retain(|record| !record.is_idle());
        trace!(target: "combat::ledger", %entity, "combatant forgotten");
        self
    }

    /// Advances every cooldown by one tick.
    #[must_use]
    pub fn advance(self) -> Self {
        let records = self
            .records
            .into_iter()
            .map(|record| CombatantRecord {
                cooldowns: record.cooldowns.tick_down(),
                ..record
            })
            .filter(|record| !record.is_idle())
            .collect();
        Self { records }
    }

    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for (index, pair) in self.records.windows(2).enumerate() {
            if pair[0].entity >= pair[1].entity {
                return Err(InvariantViolation::EntityOrder {
                    index: index + 1,
                    entity: pair[1].entity,
                });
            }
        }
        for record in &self.records {
            record.cooldowns.validate()?;
            record.threat.validate()?;
        }
        Ok(())
    }

    fn update(&mut self, entity: EntityId, apply: impl FnOnce(&mut CombatantRecord)) {
        let index = match self.locate(entity) {
            Ok(index) => index,
            Err(index) => {
                self.records.insert(index, CombatantRecord::new(entity));
                index
            }
        };
        apply(&mut self.records[index]);
        if self.records[index].is_idle() {
            self.records.remove(index);
        }
    }

    fn locate(&self, entity: EntityId) -> Result<usize, usize> {
        self.records.binary_search_by_key(&entity, |record| record.entity)
    }
}
