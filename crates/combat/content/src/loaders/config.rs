//! Simulation configuration loader.

use std::path::Path;

use combat_core::{EventBudgets, SimulationConfig};
use serde::Deserialize;

use crate::loaders::skills::{SkillSpec, SkillTableLoader, build_table};
use crate::loaders::{LoadResult, read_file};

/// TOML layout of a simulation configuration.
///
/// Skills may be listed inline as `[[skills]]` tables, or kept in a separate
/// RON file referenced by `skills_file` (resolved relative to the TOML file).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigSpec {
    #[serde(default)]
    budgets: EventBudgets,
    #[serde(default)]
    skills: Vec<SkillSpec>,
    #[serde(default)]
    skills_file: Option<String>,
}

/// Loader for simulation configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a validated configuration from a TOML file.
    pub fn load(path: &Path) -> LoadResult<SimulationConfig> {
        let content = read_file(path)?;
        let spec: ConfigSpec = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let mut skills = build_table(spec.skills)?;
        if let Some(file) = spec.skills_file {
            if !skills.is_empty() {
                anyhow::bail!("Config {} lists skills inline and in {}", path.display(), file);
            }
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            skills = SkillTableLoader::load(&base.join(file))?;
        }

        let config = SimulationConfig::new(skills).with_budgets(spec.budgets);
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        tracing::debug!(
            target: "combat::content",
            skills = config.skills.len(),
            max_events_per_tick = config.budgets.max_events_per_tick,
            "simulation config loaded"
        );
        Ok(config)
    }
}
