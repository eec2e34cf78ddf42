//! Per-entity skill cooldowns.
//!
//! Entries live in a vector sorted by skill id so lookups are binary searches
//! and iteration order is stable for checksums. An entry with zero remaining
//! ticks is never stored; readiness is simply "no entry".

use tracing::trace;

use crate::error::InvariantViolation;
use crate::state::SkillId;

/// Remaining cooldown of one skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownEntry {
    pub skill: SkillId,
    pub remaining: u32,
}

/// Skill cooldowns of one entity.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownTracker {
    entries: Vec<CooldownEntry>,
}

impl CooldownTracker {
    /// Tracker with no active cooldowns.
    pub const EMPTY: Self = Self {
        entries: Vec::new(),
    };

    pub fn entries(&self) -> &[CooldownEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advances every cooldown by one tick, dropping those that expire.
    #[must_use]
    pub fn tick_down(self) -> Self {
        if self.entries.is_empty() {
            return Self::EMPTY;
        }
        let entries: Vec<CooldownEntry> = self
            .entries
            .into_iter()
            .filter_map(|entry| {
                let remaining = entry.remaining.saturating_sub(1);
                (remaining > 0).then_some(CooldownEntry { remaining, ..entry })
            })
            .collect();
        if entries.is_empty() {
            return Self::EMPTY;
        }
        Self { entries }
    }

    /// Remaining ticks for `skill`, or `None` when it is ready.
    pub fn remaining(&self, skill: SkillId) -> Option<u32> {
        self.locate(skill)
            .ok()
            .map(|index| self.entries[index].remaining)
    }

    pub fn is_ready(&self, skill: SkillId) -> bool {
        self.remaining(skill).is_none_or(|remaining| remaining == 0)
    }

    /// Starts (or restarts) the cooldown of `skill`.
    ///
    /// A non-positive duration clears any existing entry: the skill is ready.
    #[must_use]
    pub fn start_cooldown(mut self, skill: SkillId, ticks: i64) -> Self {
        let slot = self.locate(skill);
        if ticks <= 0 {
            if let Ok(index) = slot {
                self.entries.remove(index);
            }
            return self;
        }

        let remaining = u32::try_from(ticks).unwrap_or(u32::MAX);
        trace!(target: "combat::cooldown", %skill, remaining, "cooldown started");
        let entry = CooldownEntry { skill, remaining };
        match slot {
            Ok(index) => self.entries[index] = entry,
            Err(index) => self.entries.insert(index, entry),
        }
        self
    }

    /// Checks the sorted-unique and positive-remaining invariants.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for (index, pair) in self.entries.windows(2).enumerate() {
            if pair[0].skill >= pair[1].skill {
                return Err(InvariantViolation::CooldownOrder {
                    index: index + 1,
                    skill: pair[1].skill,
                });
            }
        }
        match self.entries.iter().find(|entry| entry.remaining == 0) {
            Some(entry) => Err(InvariantViolation::CooldownExpired {
                skill: entry.skill,
                remaining: i64::from(entry.remaining),
            }),
            None => Ok(()),
        }
    }

    /// Binary search by skill id. `Err` carries the insertion index.
    fn locate(&self, skill: SkillId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&skill, |entry| entry.skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unknown_skill_is_ready() {
        assert!(CooldownTracker::EMPTY.is_ready(SkillId(4)));
    }

    #[test]
    fn start_inserts_in_sorted_position() {
        let tracker = CooldownTracker::default()
            .start_cooldown(SkillId(5), 3)
            .start_cooldown(SkillId(1), 2)
            .start_cooldown(SkillId(3), 4);
        let skills: Vec<u32> = tracker.entries().iter().map(|e| e.skill.0).collect();
        assert_eq!(skills, vec![1, 3, 5]);
        assert!(!tracker.is_ready(SkillId(3)));
        assert!(tracker.validate().is_ok());
    }

    #[test]
    fn restart_overwrites_remaining() {
        let tracker = CooldownTracker::default()
            .start_cooldown(SkillId(2), 10)
            .start_cooldown(SkillId(2), 3);
        assert_eq!(tracker.entries().len(), 1);
        assert_eq!(tracker.remaining(SkillId(2)), Some(3));
    }

    #[test]
    fn non_positive_duration_clears_entry() {
        let tracker = CooldownTracker::default()
            .start_cooldown(SkillId(2), 10)
            .start_cooldown(SkillId(2), 0);
        assert!(tracker.is_ready(SkillId(2)));
        assert!(tracker.is_empty());

        let untouched = CooldownTracker::default().start_cooldown(SkillId(9), -4);
        assert_eq!(untouched, CooldownTracker::EMPTY);
    }

    #[test]
    fn tick_down_drops_expired_entries() {
        let tracker = CooldownTracker::default()
            .start_cooldown(SkillId(1), 1)
            .start_cooldown(SkillId(2), 2)
            .tick_down();
        assert!(tracker.is_ready(SkillId(1)));
        assert_eq!(tracker.remaining(SkillId(2)), Some(1));

        let tracker = tracker.tick_down();
        assert_eq!(tracker, CooldownTracker::EMPTY);
        assert_eq!(tracker.tick_down(), CooldownTracker::EMPTY);
    }

    proptest! {
        #[test]
        fn ready_exactly_after_duration(ticks in 1i64..200, steps in 0i64..250) {
            let mut tracker = CooldownTracker::default().start_cooldown(SkillId(7), ticks);
            for _ in 0..steps {
                tracker = tracker.tick_down();
                prop_assert!(tracker.validate().is_ok());
            }
            prop_assert_eq!(tracker.is_ready(SkillId(7)), steps >= ticks);
        }

        #[test]
        fn arbitrary_starts_keep_invariants(ops in prop::collection::vec((0u32..16, -5i64..20), 0..64)) {
            let mut tracker = CooldownTracker::default();
            for (skill, ticks) in ops {
                tracker = tracker.start_cooldown(SkillId(skill), ticks);
                prop_assert!(tracker.validate().is_ok());
                prop_assert_eq!(tracker.is_ready(SkillId(skill)), ticks <= 0);
            }
        }
    }
}
