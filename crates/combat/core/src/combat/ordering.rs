//! Canonical ordering, per-tick budgets and bounded retention of events.
//!
//! Every function sorts by [`CanonicalOrder::canonical_key`] before
//! selecting, so the result depends only on the multiset of input events and
//! never on the order they were produced in.

use tracing::trace;

use super::events::{CanonicalOrder, CombatLogEvent};
use crate::error::InvariantViolation;

/// Stable sort into canonical order.
pub fn order_canonically<E: CanonicalOrder>(mut events: Vec<E>) -> Vec<E> {
    events.sort_by_key(|event| event.canonical_key());
    events
}

/// Returns true if `events` is non-decreasing under the canonical key.
pub fn is_canonical_order<E: CanonicalOrder>(events: &[E]) -> bool {
    events
        .windows(2)
        .all(|pair| pair[0].canonical_key() <= pair[1].canonical_key())
}

/// Like [`is_canonical_order`], reporting the first offending position.
pub fn validate_canonical_order<E: CanonicalOrder>(events: &[E]) -> Result<(), InvariantViolation> {
    match events
        .windows(2)
        .position(|pair| pair[0].canonical_key() > pair[1].canonical_key())
    {
        Some(index) => Err(InvariantViolation::EventOrder {
            index: index + 1,
            tick: events[index + 1].tick(),
        }),
        None => Ok(()),
    }
}

/// The `max` canonically smallest events. `max == 0` keeps everything.
pub fn take_snapshot_events<E: CanonicalOrder>(events: Vec<E>, max: usize) -> Vec<E> {
    let mut ordered = order_canonically(events);
    if max > 0 && ordered.len() > max {
        trace!(
            target: "combat::events",
            kept = max,
            dropped = ordered.len() - max,
            "snapshot budget applied"
        );
        ordered.truncate(max);
    }
    ordered
}

/// Merges a tick's events into retained history, keeping the newest
/// `max_retained` in canonical order. `max_retained == 0` disables trimming.
///
/// Tick leads the canonical key, so trimming from the front discards the
/// oldest history first.
pub fn append_tick_events<E: CanonicalOrder>(
    retained: Vec<E>,
    tick_events: Vec<E>,
    max_retained: usize,
) -> Vec<E> {
    let mut merged = retained;
    merged.extend(tick_events);
    let mut ordered = order_canonically(merged);
    if max_retained > 0 && ordered.len() > max_retained {
        let excess = ordered.len() - max_retained;
        trace!(target: "combat::events", excess, "retention budget applied");
        ordered.drain(..excess);
    }
    debug_assert!(is_canonical_order(&ordered));
    ordered
}

/// Retention for the persisted combat log (seven-field key).
pub fn trim_combat_log(
    retained: Vec<CombatLogEvent>,
    tick_events: Vec<CombatLogEvent>,
    max_retained: usize,
) -> Vec<CombatLogEvent> {
    append_tick_events(retained, tick_events, max_retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::events::{CombatEvent, CombatEventKind, CombatLogKind};
    use crate::state::{EntityId, SkillId, Tick};
    use proptest::prelude::*;

    fn event(tick: u64, source: u32, target: u32, amount: i32) -> CombatEvent {
        CombatEvent {
            tick: Tick(tick),
            source: EntityId(source),
            target: EntityId(target),
            skill: SkillId(1),
            kind: CombatEventKind::Damage,
            amount,
        }
    }

    fn arb_event() -> impl Strategy<Value = CombatEvent> {
        (0u64..6, 0u32..4, 0u32..4, 0u32..3, any::<bool>(), -3i32..50).prop_map(
            |(tick, source, target, skill, kill, amount)| CombatEvent {
                tick: Tick(tick),
                source: EntityId(source),
                target: EntityId(target),
                skill: SkillId(skill),
                kind: if kill {
                    CombatEventKind::Kill
                } else {
                    CombatEventKind::Damage
                },
                amount,
            },
        )
    }

    #[test]
    fn orders_by_tick_then_source_then_target() {
        let ordered = order_canonically(vec![
            event(2, 1, 1, 5),
            event(1, 9, 1, 5),
            event(1, 2, 3, 5),
            event(1, 2, 2, 5),
        ]);
        let keys: Vec<(u64, u32, u32)> = ordered
            .iter()
            .map(|e| (e.tick.0, e.source.0, e.target.0))
            .collect();
        assert_eq!(keys, vec![(1, 2, 2), (1, 2, 3), (1, 9, 1), (2, 1, 1)]);
    }

    #[test]
    fn kind_breaks_ties_before_amount() {
        let mut kill = event(1, 1, 1, 3);
        kill.kind = CombatEventKind::Kill;
        let damage = event(1, 1, 1, 99);
        let ordered = order_canonically(vec![kill, damage]);
        assert_eq!(ordered[0].kind, CombatEventKind::Damage);
    }

    #[test]
    fn validate_reports_first_out_of_order_index() {
        let events = vec![event(1, 1, 1, 1), event(3, 1, 1, 1), event(2, 1, 1, 1)];
        assert_eq!(
            validate_canonical_order(&events),
            Err(InvariantViolation::EventOrder {
                index: 2,
                tick: Tick(2)
            })
        );
    }

    #[test]
    fn snapshot_takes_smallest_and_zero_is_unbounded() {
        let events = vec![event(3, 1, 1, 1), event(1, 1, 1, 1), event(2, 1, 1, 1)];
        let first_two = take_snapshot_events(events.clone(), 2);
        assert_eq!(
            first_two.iter().map(|e| e.tick.0).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(take_snapshot_events(events, 0).len(), 3);
    }

    #[test]
    fn append_keeps_newest_ticks() {
        let retained = vec![event(1, 1, 1, 1), event(2, 1, 1, 1)];
        let tick = vec![event(3, 2, 1, 1), event(3, 1, 1, 1)];
        let merged = append_tick_events(retained, tick, 3);
        let keys: Vec<(u64, u32)> = merged.iter().map(|e| (e.tick.0, e.source.0)).collect();
        assert_eq!(keys, vec![(2, 1), (3, 1), (3, 2)]);
    }

    #[test]
    fn combat_log_key_separates_damage_from_kill() {
        let base = CombatLogEvent {
            tick: Tick(4),
            source: EntityId(1),
            target: EntityId(2),
            skill: SkillId(3),
            kind: CombatLogKind::Kill,
            raw_amount: 14,
            final_amount: 8,
        };
        let damage = CombatLogEvent {
            kind: CombatLogKind::Damage,
            ..base
        };
        let trimmed = trim_combat_log(vec![base], vec![damage], 0);
        assert_eq!(trimmed, vec![damage, base]);
        let trimmed = trim_combat_log(trimmed, Vec::new(), 1);
        assert_eq!(trimmed, vec![base]);
    }

    proptest! {
        #[test]
        fn ordering_is_idempotent(events in prop::collection::vec(arb_event(), 0..40)) {
            let once = order_canonically(events);
            prop_assert!(is_canonical_order(&once));
            let twice = order_canonically(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn append_matches_tail_of_union(
            retained in prop::collection::vec(arb_event(), 0..30),
            tick in prop::collection::vec(arb_event(), 0..30),
            max in 1usize..40,
        ) {
            let retained = order_canonically(retained);
            let mut union = retained.clone();
            union.extend(tick.iter().copied());
            let union = order_canonically(union);
            let expected = union[union.len().saturating_sub(max)..].to_vec();

            let merged = append_tick_events(retained, tick, max);
            prop_assert!(merged.len() <= max);
            prop_assert_eq!(merged, expected);
        }

        #[test]
        fn ordering_ignores_input_permutation(
            events in prop::collection::vec(arb_event(), 0..30),
            seed in any::<u64>(),
        ) {
            let mut shuffled = events.clone();
            // Deterministic Fisher-Yates driven by the seed.
            let mut state = seed;
            for i in (1..shuffled.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }
            prop_assert_eq!(order_canonically(events), order_canonically(shuffled));
        }
    }
}
