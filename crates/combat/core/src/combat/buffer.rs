//! Per-zone retained event history with budget enforcement.

use tracing::debug;

use super::events::{CombatEvent, CombatLogEvent};
use super::ordering::{append_tick_events, take_snapshot_events, trim_combat_log};
use crate::config::EventBudgets;

/// Retained combat history of one zone.
///
/// Both histories are always in canonical order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEventBuffer {
    budgets: EventBudgets,
    events: Vec<CombatEvent>,
    log: Vec<CombatLogEvent>,
}

impl CombatEventBuffer {
    pub fn new(budgets: EventBudgets) -> Self {
        Self {
            budgets,
            events: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn budgets(&self) -> EventBudgets {
        self.budgets
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn log_events(&self) -> &[CombatLogEvent] {
        &self.log
    }

    /// Accepts one tick's combat events, returning the new buffer and the
    /// number of events rejected by the per-tick budget.
    #[must_use]
    pub fn ingest(self, tick_events: Vec<CombatEvent>) -> (Self, usize) {
        let produced = tick_events.len();
        let accepted = take_snapshot_events(tick_events, self.budgets.max_events_per_tick);
        let rejected = produced - accepted.len();
        if rejected > 0 {
            debug!(
                target: "combat::events",
                produced,
                rejected,
                "per-tick event budget exceeded"
            );
        }
        let events = append_tick_events(self.events, accepted, self.budgets.max_retained_events);
        (Self { events, ..self }, rejected)
    }

    /// Accepts one tick's persisted combat-log events.
    #[must_use]
    pub fn ingest_log(self, tick_events: Vec<CombatLogEvent>) -> Self {
        let log = trim_combat_log(self.log, tick_events, self.budgets.max_combat_log_events);
        Self { log, ..self }
    }

    /// Oldest retained events, bounded by the snapshot budget.
    pub fn snapshot(&self) -> Vec<CombatEvent> {
        take_snapshot_events(self.events.clone(), self.budgets.max_snapshot_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::events::CombatEventKind;
    use crate::state::{EntityId, SkillId, Tick};

    fn burst(tick: u64, count: u32) -> Vec<CombatEvent> {
        (0..count)
            .map(|i| CombatEvent {
                tick: Tick(tick),
                source: EntityId(count - i),
                target: EntityId(100),
                skill: SkillId(1),
                kind: CombatEventKind::Damage,
                amount: 1,
            })
            .collect()
    }

    #[test]
    fn enforces_per_tick_and_retention_budgets() {
        let budgets = EventBudgets {
            max_events_per_tick: 4,
            max_retained_events: 6,
            max_snapshot_events: 2,
            max_combat_log_events: 0,
        };
        let buffer = CombatEventBuffer::new(budgets);
        let (buffer, rejected) = buffer.ingest(burst(1, 5));
        assert_eq!(rejected, 1);
        assert_eq!(buffer.events().len(), 4);
        // Lowest source ids survive the per-tick cut.
        assert_eq!(buffer.events()[0].source, EntityId(1));

        let (buffer, rejected) = buffer.ingest(burst(2, 3));
        assert_eq!(rejected, 0);
        assert_eq!(buffer.events().len(), 6);
        assert_eq!(buffer.events()[0].tick, Tick(1));
        assert_eq!(buffer.events()[0].source, EntityId(2));

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0], buffer.events()[0]);
    }
}
