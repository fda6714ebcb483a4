//! Glitchery - destructive glitch effects for decoded RGBA buffers.
//!
//! The host decodes an image, wraps the bytes in a [`PixelBuffer`], runs
//! effects over it and encodes the result. Effects are grouped as:
//!
//! - channel arithmetic ([`effects::channel`])
//! - dithering ([`effects::dither`], backed by the `glitch-dither` crate)
//! - pixel reordering ([`effects::reorder`])
//! - spatial displacement ([`effects::displace`])
//!
//! [`Glitcher`] owns the random source, the effect registry and any presets.
//!
//! ```
//! use glitchery::{effects::Inverse, Glitcher, PixelBuffer};
//!
//! let mut image = PixelBuffer::filled(4, 4, [10, 20, 30, 255]);
//! let mut glitcher = Glitcher::seeded(7);
//! glitcher.apply(&mut image, &Inverse).unwrap();
//! glitcher.run_preset_number(&mut image, 3).unwrap();
//! assert_eq!(image.len(), 4 * 4 * 4);
//! ```

pub mod buffer;
pub mod effects;
pub mod error;
pub mod models;
pub mod random;
pub mod services;

pub use buffer::{PixelBuffer, ALPHA_MASK, WORD_ORDER};
pub use effects::{EffectSpec, ImageEffect};
pub use error::{ConfigError, EffectError};
pub use models::{GlitchConfig, Preset};
pub use services::{EffectRegistry, Glitcher};
