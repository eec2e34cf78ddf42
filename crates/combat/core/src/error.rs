//! Common error infrastructure for combat-core.
//!
//! Resolution itself never fails: malformed or incoherent input is dropped
//! silently (and logged). The errors here cover the two places where a
//! caller does get a `Result` back:
//!
//! - **Invariant checks**: `validate()` on trackers, tables, zones and event
//!   sequences. A failure means a programming error upstream.
//! - **Configuration**: `SimulationConfig::validate` rejects skill tables the
//!   resolver could not look up deterministically.

use crate::state::{EntityId, SkillId, Tick};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: duplicate skill id in a content file
    Validation,

    /// Internal invariant broken; the producing code has a bug.
    ///
    /// Examples: cooldown entries out of order, threat above the ceiling
    Internal,

    /// Corrupted state that must not be folded into a checksum.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, useful for metrics and tests.
    fn error_code(&self) -> &'static str;
}

/// A violated structural invariant of a core collection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantViolation {
    #[error("cooldown entries not strictly ascending at index {index} (skill {skill})")]
    CooldownOrder { index: usize, skill: SkillId },

    #[error("cooldown for skill {skill} stored with non-positive remaining ticks {remaining}")]
    CooldownExpired { skill: SkillId, remaining: i64 },

    #[error("threat entries not strictly ascending at index {index} (source {source_id})")]
    ThreatOrder { index: usize, source_id: EntityId },

    #[error("threat {threat} from source {source_id} outside [0, {ceiling}]")]
    ThreatOutOfRange {
        source_id: EntityId,
        threat: i64,
        ceiling: i64,
    },

    #[error("event sequence not in canonical order at index {index} (tick {tick})")]
    EventOrder { index: usize, tick: Tick },

    #[error("zone entities not strictly ascending at index {index} (entity {entity})")]
    EntityOrder { index: usize, entity: EntityId },

    #[error("entity {entity} health {health} outside [0, {max_health}] or aliveness mismatch")]
    EntityHealth {
        entity: EntityId,
        health: i32,
        max_health: i32,
    },
}

impl CombatError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EntityHealth { .. } => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CooldownOrder { .. } => "COOLDOWN_ORDER",
            Self::CooldownExpired { .. } => "COOLDOWN_EXPIRED",
            Self::ThreatOrder { .. } => "THREAT_ORDER",
            Self::ThreatOutOfRange { .. } => "THREAT_OUT_OF_RANGE",
            Self::EventOrder { .. } => "EVENT_ORDER",
            Self::EntityOrder { .. } => "ENTITY_ORDER",
            Self::EntityHealth { .. } => "ENTITY_HEALTH",
        }
    }
}

/// Rejected simulation configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("skill {0} defined more than once")]
    DuplicateSkill(SkillId),

    #[error("skill {skill} has negative range")]
    NegativeRange { skill: SkillId },
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateSkill(_) => "DUPLICATE_SKILL",
            Self::NegativeRange { .. } => "NEGATIVE_RANGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_violations_are_internal() {
        let err = InvariantViolation::ThreatOrder {
            index: 2,
            source_id: EntityId(7),
        };
        assert!(err.severity().is_internal());
        assert_eq!(err.error_code(), "THREAT_ORDER");
    }

    #[test]
    fn config_errors_are_validation() {
        let err = ConfigError::DuplicateSkill(SkillId(3));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_internal());
    }
}
