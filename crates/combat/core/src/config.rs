//! Simulation configuration: skill definitions and event budgets.

use crate::error::ConfigError;
use crate::fixed::Fixed;
use crate::state::SkillId;

/// Static definition of one castable skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    /// Damage dealt per resolved cast. Negative values deal no damage.
    pub base_damage: i32,
    /// Maximum caster-to-target distance.
    pub range: Fixed,
    /// Ticks before the caster may use the skill again. Non-positive means none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_ticks: i64,
    /// Threat generated per point of damage, in percent.
    #[cfg_attr(feature = "serde", serde(default = "SkillDefinition::default_threat_percent"))]
    pub threat_percent: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires_line_of_sight: bool,
}

impl SkillDefinition {
    pub const DEFAULT_THREAT_PERCENT: u32 = 100;

    pub fn new(id: SkillId, base_damage: i32, range: Fixed) -> Self {
        Self {
            id,
            base_damage,
            range,
            cooldown_ticks: 0,
            threat_percent: Self::DEFAULT_THREAT_PERCENT,
            requires_line_of_sight: false,
        }
    }

    #[must_use]
    pub fn with_cooldown(mut self, ticks: i64) -> Self {
        self.cooldown_ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_threat_percent(mut self, percent: u32) -> Self {
        self.threat_percent = percent;
        self
    }

    #[must_use]
    pub fn with_line_of_sight(mut self, required: bool) -> Self {
        self.requires_line_of_sight = required;
        self
    }

    /// Damage actually applied per cast.
    pub fn damage(&self) -> i32 {
        self.base_damage.max(0)
    }

    #[cfg(feature = "serde")]
    fn default_threat_percent() -> u32 {
        Self::DEFAULT_THREAT_PERCENT
    }
}

/// Skill definitions sorted by id for deterministic binary-search lookup.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<SkillDefinition>", into = "Vec<SkillDefinition>")
)]
pub struct SkillTable {
    skills: Vec<SkillDefinition>,
}

impl SkillTable {
    /// Builds a table, sorting definitions by id. Duplicates are kept so that
    /// [`SkillTable::validate`] can report them.
    pub fn new(mut skills: Vec<SkillDefinition>) -> Self {
        skills.sort_by_key(|skill| skill.id);
        Self { skills }
    }

    pub fn get(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills
            .binary_search_by_key(&id, |skill| skill.id)
            .ok()
            .map(|index| &self.skills[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pair) = self.skills.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(ConfigError::DuplicateSkill(pair[1].id));
        }
        if let Some(skill) = self.skills.iter().find(|skill| skill.range.raw() < 0) {
            return Err(ConfigError::NegativeRange { skill: skill.id });
        }
        Ok(())
    }
}

impl From<Vec<SkillDefinition>> for SkillTable {
    fn from(skills: Vec<SkillDefinition>) -> Self {
        Self::new(skills)
    }
}

impl From<SkillTable> for Vec<SkillDefinition> {
    fn from(table: SkillTable) -> Self {
        table.skills
    }
}

impl FromIterator<SkillDefinition> for SkillTable {
    fn from_iter<I: IntoIterator<Item = SkillDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Per-zone event budgets. A value of zero disables the corresponding bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EventBudgets {
    /// Combat events accepted from a single tick.
    pub max_events_per_tick: usize,
    /// Combat events retained as zone history.
    pub max_retained_events: usize,
    /// Combat events surfaced in an outward snapshot.
    pub max_snapshot_events: usize,
    /// Persisted combat-log events retained.
    pub max_combat_log_events: usize,
}

impl Default for EventBudgets {
    fn default() -> Self {
        Self {
            max_events_per_tick: SimulationConfig::DEFAULT_MAX_EVENTS_PER_TICK,
            max_retained_events: SimulationConfig::DEFAULT_MAX_RETAINED_EVENTS,
            max_snapshot_events: SimulationConfig::DEFAULT_MAX_SNAPSHOT_EVENTS,
            max_combat_log_events: SimulationConfig::DEFAULT_MAX_COMBAT_LOG_EVENTS,
        }
    }
}

/// Simulation configuration consumed by the combat core.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: SkillTable,
    #[cfg_attr(feature = "serde", serde(default))]
    pub budgets: EventBudgets,
}

impl SimulationConfig {
    // ===== fixed limits =====
    /// Hard cap on combat-log events emitted while resolving one tick.
    pub const MAX_COMBAT_LOG_EVENTS_PER_TICK: usize = 256;
    /// Saturation ceiling for accumulated threat.
    pub const MAX_THREAT: i32 = 1_000_000_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_EVENTS_PER_TICK: usize = 64;
    pub const DEFAULT_MAX_RETAINED_EVENTS: usize = 512;
    pub const DEFAULT_MAX_SNAPSHOT_EVENTS: usize = 32;
    pub const DEFAULT_MAX_COMBAT_LOG_EVENTS: usize = 512;

    pub fn new(skills: SkillTable) -> Self {
        Self {
            skills,
            budgets: EventBudgets::default(),
        }
    }

    #[must_use]
    pub fn with_budgets(mut self, budgets: EventBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.skills.validate()
    }
}
