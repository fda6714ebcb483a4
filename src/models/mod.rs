pub mod config;
pub mod preset;

pub use config::{GlitchConfig, SEED_ENV};
pub use preset::Preset;
