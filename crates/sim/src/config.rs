use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use stride::{DEFAULT_TICK_RATE, StatsConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub frame_rate: u32,
    pub tick_rate: u32,
    /// Run length in seconds; the scenario's own length when unset.
    pub seconds: Option<f32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            tick_rate: DEFAULT_TICK_RATE,
            seconds: None,
        }
    }
}

/// Contents of a `--stats` file. Both tables are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub stats: StatsConfig,
    pub sim: SimConfig,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let file: Self = toml::from_str(text)?;
        file.stats.validate()?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let file = ConfigFile::parse("").expect("empty config");
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn partial_tables_override_only_named_fields() {
        let file = ConfigFile::parse(
            r#"
            [stats]
            sprint_speed = 12.5
            max_slope_angle = 30.0

            [sim]
            frame_rate = 144
            "#,
        )
        .expect("partial config");

        assert_eq!(file.stats.sprint_speed, 12.5);
        assert_eq!(file.stats.walk_speed, StatsConfig::default().walk_speed);
        assert_eq!(file.stats.max_slope_angle, 30.0);
        assert_eq!(file.sim.frame_rate, 144);
        assert_eq!(file.sim.tick_rate, DEFAULT_TICK_RATE);
    }

    #[test]
    fn invalid_stats_are_rejected() {
        let err = ConfigFile::parse("[stats]\nmax_slope_angle = 95.0\n").unwrap_err();
        assert!(err.to_string().contains("max_slope_angle"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigFile::load(Path::new("/nonexistent/stride.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stride.toml"));
    }
}
