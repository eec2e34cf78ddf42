//! Deterministic digest over zone state and retained combat history.
//!
//! Replay verification compares these digests across independent runs. The
//! encoding is fixed little-endian and walks entities in id order and events
//! in canonical order, so the digest depends only on logical content.

use core::fmt;

use sha2::{Digest, Sha256};

use crate::combat::{CombatEvent, order_canonically};
use crate::state::ZoneState;

/// SHA-256 digest of a zone and its event history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateDigest(pub [u8; 32]);

impl StateDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Folds `zone` entities and `events` into one digest.
///
/// `events` need not be pre-sorted; they are canonicalized first.
pub fn state_checksum(zone: &ZoneState, events: &[CombatEvent]) -> StateDigest {
    let mut hasher = Sha256::new();
    hasher.update(zone.id.0.to_le_bytes());

    hasher.update((zone.entities().len() as u64).to_le_bytes());
    for entity in zone.entities() {
        hasher.update(entity.id.0.to_le_bytes());
        hasher.update(entity.health.to_le_bytes());
        hasher.update(entity.max_health.to_le_bytes());
        hasher.update([u8::from(entity.alive)]);
        hasher.update(entity.position.x.raw().to_le_bytes());
        hasher.update(entity.position.y.raw().to_le_bytes());
    }

    let ordered = order_canonically(events.to_vec());
    hasher.update((ordered.len() as u64).to_le_bytes());
    for event in &ordered {
        hasher.update(event.tick.0.to_le_bytes());
        hasher.update(event.source.0.to_le_bytes());
        hasher.update(event.target.0.to_le_bytes());
        hasher.update(event.skill.0.to_le_bytes());
        hasher.update([event.kind as u8]);
        hasher.update(event.amount.to_le_bytes());
    }

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    StateDigest(digest)
}
