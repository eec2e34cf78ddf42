//! Deterministic combat resolution for tick-based zoned simulations.
//!
//! `combat-core` turns per-tick skill-cast commands into authoritative zone
//! state changes and a canonically ordered event log. Every operation is a
//! pure function over immutable snapshots: two executions fed the same
//! command sequence produce byte-identical zones, events and checksums no
//! matter in which order the commands arrived.
//!
//! The zone orchestration loop lives outside this crate and drives
//! [`engine::TickDriver`] once per tick per zone.
pub mod action;
pub mod checksum;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod fixed;
pub mod state;

pub use action::{
    CastSkillCommand, SkillCastIntent, SkillCastResolver, SkillEffectResolver, TargetKind,
    TickResolution, WorldCommand, WorldCommandKind,
};
pub use checksum::{StateDigest, state_checksum};
pub use combat::{
    CombatEvent, CombatEventBuffer, CombatEventKind, CombatLogEvent, CombatLogKind,
    CooldownEntry, CooldownTracker, ThreatEntry, ThreatTable,
};
pub use config::{EventBudgets, SimulationConfig, SkillDefinition, SkillTable};
pub use engine::{
    CombatantLedger, CombatantRecord, RejectReason, TickDriver, TickOutcome, TickReport, ZoneCombat,
};
pub use env::{CollisionSurface, has_line_of_sight};
pub use error::{CombatError, ConfigError, ErrorSeverity, InvariantViolation};
pub use fixed::{Fixed, FixedVec2};
pub use state::{EntityId, EntityState, SkillId, Tick, TileGrid, ZoneId, ZoneState};
