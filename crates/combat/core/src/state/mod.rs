//! Zone snapshot consumed and produced by combat resolution.
//!
//! The zone manager owns these values; the combat core receives a snapshot
//! by value and hands back a new one. Entities are kept sorted by id so that
//! iteration order, and therefore every checksum, is deterministic.
mod common;
mod tiles;
mod zone;

pub use common::{EntityId, SkillId, Tick, ZoneId};
pub use tiles::TileGrid;
pub use zone::{EntityState, ZoneState};
