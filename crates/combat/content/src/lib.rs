//! Data-driven combat content.
//!
//! Loads skill tables (RON) and simulation configuration (TOML) into the
//! types consumed by `combat-core`. Content never appears in zone state; it
//! only parameterizes resolution.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, SkillSpec, SkillTableLoader};
