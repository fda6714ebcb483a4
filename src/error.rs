use thiserror::Error;

/// Errors reported by effects, the registry and the preset orchestrator.
///
/// Parameter and range errors are raised before an effect touches the
/// buffer, so a failed call leaves the image unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EffectError {
    #[error("Invalid parameter for {effect}: {reason}")]
    InvalidParameter {
        effect: &'static str,
        reason: String,
    },

    #[error("Range {start}..{end} out of bounds for {effect} (length {len})")]
    RangeOutOfBounds {
        effect: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Unknown effect: {0}")]
    UnknownEffect(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

impl EffectError {
    pub(crate) fn invalid(effect: &'static str, reason: impl Into<String>) -> Self {
        EffectError::InvalidParameter {
            effect,
            reason: reason.into(),
        }
    }
}

/// Errors from loading a [`GlitchConfig`](crate::models::GlitchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid seed in {var}: {value}")]
    InvalidSeed { var: &'static str, value: String },
}
