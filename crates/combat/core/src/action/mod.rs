//! Skill casting: command intake and per-tick effect resolution.
pub mod cast;
pub mod command;
pub mod effect;

pub use cast::{RejectReason, SkillCastResolver};
pub use command::{CastSkillCommand, SkillCastIntent, TargetKind, WorldCommand, WorldCommandKind};
pub use effect::{SkillEffectResolver, TickResolution};
