pub mod glitcher;
pub mod registry;

pub use glitcher::Glitcher;
pub use registry::{EffectFn, EffectRegistry};
