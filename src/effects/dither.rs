//! Dithering effects, backed by the `glitch-dither` crate.
//!
//! This layer picks parameters, validates them and feeds random thresholds
//! in; the pixel work happens in `glitch_dither`.

use glitch_dither::ThresholdMatrix;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::ImageEffect;
use crate::buffer::PixelBuffer;
use crate::error::EffectError;
use crate::random::{range_round, uniform_int, uniform_round};

/// Upper bound of the noise dither threshold draw.
const NOISE_BOUND: usize = 128;

/// Block-average threshold over `size × size` blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dither8Bit {
    pub size: Option<usize>,
}

impl ImageEffect for Dither8Bit {
    const NAME: &'static str = "dither8Bit";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let size = self.size.unwrap_or_else(|| range_round(rng, 4, 15));
        if size < 2 {
            return Err(EffectError::invalid(
                Self::NAME,
                format!("size must be at least 2, got {size}"),
            ));
        }
        tracing::trace!(size, "dither8Bit block size");
        let (width, height) = (image.width(), image.height());
        glitch_dither::block_average(image.as_bytes_mut(), width, height, size);
        Ok(())
    }
}

/// Atkinson error diffusion (6/8 of the error propagated).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DitherAtkinsons;

impl ImageEffect for DitherAtkinsons {
    const NAME: &'static str = "ditherAtkinsons";

    fn apply(&self, image: &mut PixelBuffer, _rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let (width, height) = (image.width(), image.height());
        glitch_dither::atkinson(image.as_bytes_mut(), width, height);
        Ok(())
    }
}

/// Floyd-Steinberg error diffusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DitherFloydSteinberg;

impl ImageEffect for DitherFloydSteinberg {
    const NAME: &'static str = "ditherFloydSteinberg";

    fn apply(&self, image: &mut PixelBuffer, _rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let (width, height) = (image.width(), image.height());
        glitch_dither::floyd_steinberg(image.as_bytes_mut(), width, height);
        Ok(())
    }
}

fn threshold_matrix(
    effect: &'static str,
    map: Option<usize>,
    rng: &mut dyn RngCore,
) -> Result<&'static ThresholdMatrix, EffectError> {
    let map = map.unwrap_or_else(|| uniform_int(rng, glitch_dither::THRESHOLD_MATRICES.len()));
    tracing::trace!(effect, map, "threshold matrix");
    ThresholdMatrix::by_index(map)
        .ok_or_else(|| EffectError::invalid(effect, format!("map must be 0, 1 or 2, got {map}")))
}

/// Ordered dither on luminance. `map` selects the order 3, 4 or 8 matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherBayer {
    pub map: Option<usize>,
}

impl ImageEffect for DitherBayer {
    const NAME: &'static str = "ditherBayer";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let matrix = threshold_matrix(Self::NAME, self.map, rng)?;
        let (width, height) = (image.width(), image.height());
        glitch_dither::ordered_gray(image.as_bytes_mut(), width, height, matrix);
        Ok(())
    }
}

/// Ordered dither on each colour channel independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherBayer3 {
    pub map: Option<usize>,
}

impl ImageEffect for DitherBayer3 {
    const NAME: &'static str = "ditherBayer3";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let matrix = threshold_matrix(Self::NAME, self.map, rng)?;
        let (width, height) = (image.width(), image.height());
        glitch_dither::ordered_color(image.as_bytes_mut(), width, height, matrix);
        Ok(())
    }
}

/// Grayscale noise dither, one threshold draw per pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DitherRandom;

impl ImageEffect for DitherRandom {
    const NAME: &'static str = "ditherRandom";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        glitch_dither::random_threshold_gray(image.as_bytes_mut(), || {
            uniform_round(rng, NOISE_BOUND) as u8
        });
        Ok(())
    }
}

/// Colour noise dither, one threshold draw per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DitherRandom3;

impl ImageEffect for DitherRandom3 {
    const NAME: &'static str = "ditherRandom3";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        glitch_dither::random_threshold_color(image.as_bytes_mut(), || {
            uniform_round(rng, NOISE_BOUND) as u8
        });
        Ok(())
    }
}

/// 3×3 halftone dots grown from the block centre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DitherHalftone;

impl ImageEffect for DitherHalftone {
    const NAME: &'static str = "ditherHalftone";

    fn apply(&self, image: &mut PixelBuffer, _rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let (width, height) = (image.width(), image.height());
        glitch_dither::halftone(image.as_bytes_mut(), width, height);
        Ok(())
    }
}

/// OR the colour channels with a constant mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherBitmask {
    pub mask: Option<u8>,
}

impl ImageEffect for DitherBitmask {
    const NAME: &'static str = "ditherBitmask";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let mask = self
            .mask
            .unwrap_or_else(|| range_round(rng, 1, 253) as u8);
        tracing::trace!(mask, "ditherBitmask mask");
        glitch_dither::bitmask(image.as_bytes_mut(), mask);
        Ok(())
    }
}
