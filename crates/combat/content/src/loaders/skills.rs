//! Skill table loader.

use std::path::Path;

use combat_core::{Fixed, SkillDefinition, SkillId, SkillTable};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Authoring format of one skill. Ranges are given in whole tiles, optionally
/// refined by a fraction.
///
/// Example:
/// ```ron
/// [
///     (id: 1, damage: 14, range: 6, cooldown: 3, line_of_sight: true),
///     (id: 2, damage: 40, range: 1, range_fraction: Some((1, 2)), threat_percent: 250),
/// ]
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillSpec {
    pub id: u32,
    pub damage: i32,
    pub range: i32,
    #[serde(default)]
    pub range_fraction: Option<(i32, i32)>,
    #[serde(default)]
    pub cooldown: i64,
    #[serde(default = "SkillSpec::default_threat_percent")]
    pub threat_percent: u32,
    #[serde(default)]
    pub line_of_sight: bool,
}

impl SkillSpec {
    fn default_threat_percent() -> u32 {
        SkillDefinition::DEFAULT_THREAT_PERCENT
    }

    /// Converts the authoring format into a core skill definition.
    pub fn into_definition(self) -> LoadResult<SkillDefinition> {
        let mut range = Fixed::from_int(self.range);
        if let Some((numerator, denominator)) = self.range_fraction {
            let fraction = Fixed::from_ratio(numerator, denominator).ok_or_else(|| {
                anyhow::anyhow!("Skill {} has a zero range fraction denominator", self.id)
            })?;
            range = range + fraction;
        }
        Ok(SkillDefinition::new(SkillId(self.id), self.damage, range)
            .with_cooldown(self.cooldown)
            .with_threat_percent(self.threat_percent)
            .with_line_of_sight(self.line_of_sight))
    }
}

/// Builds a validated skill table from authoring specs.
pub(crate) fn build_table(specs: Vec<SkillSpec>) -> LoadResult<SkillTable> {
    let definitions = specs
        .into_iter()
        .map(SkillSpec::into_definition)
        .collect::<LoadResult<Vec<_>>>()?;
    let table = SkillTable::new(definitions);
    table
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid skill table: {}", e))?;
    Ok(table)
}

/// Loader for skill tables from RON files.
pub struct SkillTableLoader;

impl SkillTableLoader {
    /// Load a skill table from a RON list of [`SkillSpec`].
    pub fn load(path: &Path) -> LoadResult<SkillTable> {
        let content = read_file(path)?;
        let table = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load skills at {}: {}", path.display(), e))?;
        tracing::debug!(target: "combat::content", skills = table.len(), path = %path.display(), "skill table loaded");
        Ok(table)
    }

    /// Parse a skill table from RON source.
    pub fn parse(content: &str) -> LoadResult<SkillTable> {
        let specs: Vec<SkillSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill RON: {}", e))?;
        build_table(specs)
    }
}
