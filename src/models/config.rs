use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::effects::EffectSpec;
use crate::error::ConfigError;

/// Environment variable that overrides the configured seed.
pub const SEED_ENV: &str = "GLITCHERY_SEED";

/// Glitcher configuration, usually loaded from a YAML file.
///
/// ```yaml
/// seed: 42
/// presets:
///   crunchy:
///     - effect: ditherBayer
///       map: 1
///     - effect: scanlines
///       kind: 0
///       size: 4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlitchConfig {
    /// Seed for the random source. Unset means seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Named effect sequences, runnable with
    /// [`Glitcher::run_named_preset`](crate::services::Glitcher::run_named_preset).
    #[serde(default)]
    pub presets: BTreeMap<String, Vec<EffectSpec>>,
}

impl GlitchConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            seeded = config.seed.is_some(),
            presets = config.presets.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) => {
                tracing::warn!(path = %path.display(), %e, "Failed to read config, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply [`SEED_ENV`] if it is set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_seed_override(std::env::var(SEED_ENV).ok().as_deref())
    }

    fn with_seed_override(mut self, raw: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = raw {
            let seed: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidSeed {
                var: SEED_ENV,
                value: raw.to_string(),
            })?;
            tracing::info!(seed, "Seed overridden from environment");
            self.seed = Some(seed);
        }
        Ok(self)
    }

    /// Look up a named preset.
    pub fn preset(&self, name: &str) -> Option<&[EffectSpec]> {
        self.presets.get(name).map(Vec::as_slice)
    }
}
