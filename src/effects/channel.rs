//! Per-channel arithmetic: boosts, attenuation and channel rotation.
//!
//! All of these walk the byte view one pixel at a time. Decrements wrap
//! (a channel at 10 minus 20 becomes 246) and boosts clamp at 255.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{check_channel, ImageEffect};
use crate::buffer::{pack_word, unpack_word, PixelBuffer, ALPHA, BLUE, GREEN, RED};
use crate::error::EffectError;
use crate::random::{coin_toss, range_round, uniform_int};

fn default_factor(rng: &mut dyn RngCore) -> u8 {
    uniform_int(rng, 64) as u8
}

/// Set `target` to `px[source] + factor`, clamped, and wrap-decrement the
/// channels in `decrement`.
fn shift(data: &mut [u8], source: usize, target: usize, decrement: [usize; 2], factor: u8) {
    for px in data.chunks_exact_mut(4) {
        let shifted = px[source] as u16 + factor as u16;
        for c in decrement {
            px[c] = px[c].wrapping_sub(factor);
        }
        px[target] = shifted.min(255) as u8;
    }
}

/// Boost one channel from another and attenuate the rest.
///
/// `shifted = px[from] + factor` is read before anything is written, then the
/// two channels tied to `to` are decremented and `px[to] = min(255, shifted)`.
/// The routing for `to == B` decrements G and alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RgbShift {
    pub from: Option<usize>,
    pub to: Option<usize>,
    pub factor: Option<u8>,
}

impl ImageEffect for RgbShift {
    const NAME: &'static str = "rgbShift";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let from = check_channel(
            Self::NAME,
            "from",
            self.from.unwrap_or_else(|| uniform_int(rng, 3)),
        )?;
        let to = check_channel(
            Self::NAME,
            "to",
            self.to.unwrap_or_else(|| uniform_int(rng, 3)),
        )?;
        let factor = self.factor.unwrap_or_else(|| default_factor(rng));
        tracing::trace!(from, to, factor, "rgbShift parameters");

        let decrement = match to {
            RED => [GREEN, BLUE],
            GREEN => [RED, BLUE],
            _ => [GREEN, ALPHA],
        };
        shift(image.as_bytes_mut(), from, to, decrement, factor);
        Ok(())
    }
}

macro_rules! fixed_shift {
    ($(#[$doc:meta])* $name:ident, $tag:literal, $channel:expr, $others:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub factor: Option<u8>,
        }

        impl ImageEffect for $name {
            const NAME: &'static str = $tag;

            fn apply(
                &self,
                image: &mut PixelBuffer,
                rng: &mut dyn RngCore,
            ) -> Result<(), EffectError> {
                let factor = self.factor.unwrap_or_else(|| default_factor(rng));
                tracing::trace!(effect = $tag, factor, "channel shift parameters");
                shift(image.as_bytes_mut(), $channel, $channel, $others, factor);
                Ok(())
            }
        }
    };
}

fixed_shift!(
    /// Boost red, attenuate green and blue.
    RedShift,
    "redShift",
    RED,
    [GREEN, BLUE]
);
fixed_shift!(
    /// Boost green, attenuate red and blue.
    GreenShift,
    "greenShift",
    GREEN,
    [RED, BLUE]
);
fixed_shift!(
    /// Boost blue, attenuate red and green.
    BlueShift,
    "blueShift",
    BLUE,
    [RED, GREEN]
);

/// One step of the RGB 3-cycle.
///
/// `forward`: R←G, G←B, B←R. Otherwise R←B, G←R, B←G.
#[inline]
fn rotate_rgb(rgb: [u8; 3], forward: bool) -> [u8; 3] {
    let [r, g, b] = rgb;
    if forward {
        [g, b, r]
    } else {
        [b, r, g]
    }
}

fn color_shift_bytes(data: &mut [u8], forward: bool, steps: usize) {
    for px in data.chunks_exact_mut(4) {
        let mut rgb = [px[RED], px[GREEN], px[BLUE]];
        for _ in 0..steps {
            rgb = rotate_rgb(rgb, forward);
        }
        px[..3].copy_from_slice(&rgb);
    }
}

/// Rotate the colour channels of every pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorShift {
    pub dir: Option<bool>,
}

impl ImageEffect for ColorShift {
    const NAME: &'static str = "colorShift";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let dir = self.dir.unwrap_or_else(|| coin_toss(rng));
        color_shift_bytes(image.as_bytes_mut(), dir, 1);
        Ok(())
    }
}

/// [`ColorShift`] computed on packed words; the output is identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorShift2 {
    pub dir: Option<bool>,
}

impl ImageEffect for ColorShift2 {
    const NAME: &'static str = "colorShift2";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let dir = self.dir.unwrap_or_else(|| coin_toss(rng));
        image.map_words(|word| {
            let [r, g, b, a] = unpack_word(word);
            let [r, g, b] = rotate_rgb([r, g, b], dir);
            pack_word([r, g, b, a])
        });
        Ok(())
    }
}

/// [`ColorShift`] repeated `iterations` times.
///
/// The rotation is a 3-cycle, so only `iterations mod 3` steps are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperShift {
    pub iterations: Option<usize>,
    pub dir: Option<bool>,
}

impl ImageEffect for SuperShift {
    const NAME: &'static str = "superShift";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let iterations = self.iterations.unwrap_or_else(|| range_round(rng, 1, 9));
        let dir = self.dir.unwrap_or_else(|| coin_toss(rng));
        tracing::trace!(iterations, dir, "superShift parameters");
        color_shift_bytes(image.as_bytes_mut(), dir, iterations % 3);
        Ok(())
    }
}

/// Where each source channel lands: `(displaced, extra)` gives the target
/// byte `index ± offset + extra` when displaced, `index + extra` otherwise.
type Route = [(bool, usize); 3];

/// Indexed by `[dir][rgb]`, entries in R, G, B source order.
const GLITCH_ROUTES: [[Route; 3]; 2] = [
    // Left.
    [
        [(true, 1), (true, 0), (false, 0)],
        [(false, 1), (true, 0), (true, 0)],
        [(true, 1), (false, 0), (true, 0)],
    ],
    // Right.
    [
        [(true, 0), (true, 1), (false, 0)],
        [(false, 0), (true, 1), (true, 0)],
        [(true, 0), (false, 1), (true, 0)],
    ],
];

/// Smear colour bytes sideways by `offset` bytes.
///
/// `rgb` picks one of three fixed channel routings; `dir` picks right
/// (`true`) or left. `offset` is reduced modulo the width and writes landing
/// outside the buffer are dropped. Since the offset is in bytes, odd offsets
/// can land on alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RgbGlitch {
    pub offset: Option<usize>,
    pub rgb: Option<usize>,
    pub dir: Option<bool>,
}

impl ImageEffect for RgbGlitch {
    const NAME: &'static str = "rgbGlitch";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let width = image.width();
        let rgb = check_channel(
            Self::NAME,
            "rgb",
            self.rgb.unwrap_or_else(|| uniform_int(rng, 3)),
        )?;
        if image.is_empty() {
            return Ok(());
        }
        let offset = self.offset.unwrap_or_else(|| uniform_int(rng, width)) % width;
        let dir = self.dir.unwrap_or_else(|| coin_toss(rng));
        tracing::trace!(offset, rgb, dir, "rgbGlitch parameters");

        let route = GLITCH_ROUTES[dir as usize][rgb];
        let data = image.as_bytes_mut();
        let len = data.len();
        for index in (0..len).step_by(4) {
            let source = [data[index], data[index + 1], data[index + 2]];
            for (value, &(displaced, extra)) in source.into_iter().zip(&route) {
                let target = match (displaced, dir) {
                    (false, _) => Some(index + extra),
                    (true, true) => Some(index + offset + extra),
                    (true, false) => (index + extra).checked_sub(offset),
                };
                if let Some(t) = target.filter(|&t| t < len) {
                    data[t] = value;
                }
            }
        }
        Ok(())
    }
}
