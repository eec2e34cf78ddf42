//! Combat components: cooldowns, threat, and the canonical event log.
//!
//! Everything here is a pure transformation over owned values. Collections
//! are sorted vectors searched by binary search, never hash maps, so that
//! iteration order is identical across runs and platforms.

pub mod buffer;
pub mod cooldown;
pub mod events;
pub mod ordering;
pub mod threat;

pub use buffer::CombatEventBuffer;
pub use cooldown::{CooldownEntry, CooldownTracker};
pub use events::{CanonicalOrder, CombatEvent, CombatEventKind, CombatLogEvent, CombatLogKind};
pub use ordering::{
    append_tick_events, is_canonical_order, order_canonically, take_snapshot_events,
    trim_combat_log, validate_canonical_order,
};
pub use threat::{ThreatEntry, ThreatTable};
