//! Per-defender threat accumulation.
//!
//! Sorted by attacker id. Threat saturates at
//! [`SimulationConfig::MAX_THREAT`]; sums are formed in `i128` before the
//! clamp so no contribution can wrap around.

use tracing::trace;

use crate::config::SimulationConfig;
use crate::error::InvariantViolation;
use crate::state::{EntityId, Tick};

/// Accumulated threat of one attacker against the owning defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreatEntry {
    pub source: EntityId,
    pub threat: i32,
    pub last_tick: Tick,
}

/// Threat table of one defender.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreatTable {
    entries: Vec<ThreatEntry>,
}

impl ThreatTable {
    pub const EMPTY: Self = Self {
        entries: Vec::new(),
    };

    /// Read-only view in ascending attacker order.
    pub fn entries(&self) -> &[ThreatEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn threat_of(&self, source: EntityId) -> Option<i32> {
        self.locate(source)
            .ok()
            .map(|index| self.entries[index].threat)
    }

    /// Position of `source` in [`ThreatTable::entries`].
    pub fn position_of(&self, source: EntityId) -> Option<usize> {
        self.locate(source).ok()
    }

    /// Attacker with the most threat; ties go to the lowest attacker id.
    pub fn top(&self) -> Option<&ThreatEntry> {
        self.entries
            .iter()
            .reduce(|best, entry| if entry.threat > best.threat { entry } else { best })
    }

    /// Adds `amount` threat from `source`. Non-positive amounts are ignored.
    #[must_use]
    pub fn add_threat(mut self, source: EntityId, amount: i64, tick: Tick) -> Self {
        if amount <= 0 {
            return self;
        }
        match self.locate(source) {
            Ok(index) => {
                let entry = &mut self.entries[index];
                entry.threat = clamp_threat(i128::from(entry.threat) + i128::from(amount));
                entry.last_tick = tick;
            }
            Err(index) => {
                let entry = ThreatEntry {
                    source,
                    threat: clamp_threat(i128::from(amount)),
                    last_tick: tick,
                };
                self.entries.insert(index, entry);
            }
        }
        trace!(target: "combat::threat", %source, amount, %tick, "threat added");
        self
    }

    /// Removes the entry at `index`; out-of-range indices are ignored.
    #[must_use]
    pub fn remove_at(mut self, index: usize) -> Self {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
        self
    }

    /// Checks the sorted-unique and ceiling invariants.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for (index, pair) in self.entries.windows(2).enumerate() {
            if pair[0].source >= pair[1].source {
                return Err(InvariantViolation::ThreatOrder {
                    index: index + 1,
                    source_id: pair[1].source,
                });
            }
        }
        let ceiling = SimulationConfig::MAX_THREAT;
        match self
            .entries
            .iter()
            .find(|entry| !(0..=ceiling).contains(&entry.threat))
        {
            Some(entry) => Err(InvariantViolation::ThreatOutOfRange {
                source_id: entry.source,
                threat: i64::from(entry.threat),
                ceiling: i64::from(ceiling),
            }),
            None => Ok(()),
        }
    }

    fn locate(&self, source: EntityId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&source, |entry| entry.source)
    }
}

fn clamp_threat(sum: i128) -> i32 {
    // The clamp bounds fit in i32, so the narrowing cast is lossless.
    sum.clamp(0, i128::from(SimulationConfig::MAX_THREAT)) as i32
}
