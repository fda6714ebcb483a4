//! Glitch effects.
//!
//! Each effect is a small options struct implementing [`ImageEffect`].
//! Fields are `Option`s: `Default` leaves them all unset and the effect
//! draws a randomized value (or uses a fixed default) for each one at
//! apply time. Explicit values are validated before the buffer is touched.
//!
//! [`EffectSpec`] wraps every effect in one serde-tagged enum so effect
//! lists can come from configuration:
//!
//! ```yaml
//! - effect: ditherBayer
//!   map: 1
//! - effect: inverse
//! ```

pub mod channel;
pub mod dither;
pub mod displace;
pub mod reorder;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::EffectError;

pub use channel::{
    BlueShift, ColorShift, ColorShift2, GreenShift, RedShift, RgbGlitch, RgbShift, SuperShift,
};
pub use displace::{
    DrumrollHorizontal, DrumrollHorizontalWave, DrumrollVertical, DrumrollVerticalWave,
    FocusImage, Inverse, PixelFunk, Scanlines, SelectSlice, Slice, SuperSlice,
};
pub use dither::{
    Dither8Bit, DitherAtkinsons, DitherBayer, DitherBayer3, DitherBitmask, DitherFloydSteinberg,
    DitherHalftone, DitherRandom, DitherRandom3,
};
pub use reorder::{
    Fractal, FractalGhosts, PixelSort, RandomSortRows, Shortdumbsort, Shortsort, Slicesort, Sort,
    SortRows, SortStripe,
};

/// An in-place transformation of a [`PixelBuffer`].
pub trait ImageEffect {
    /// Registry name, e.g. `"ditherBayer"`.
    const NAME: &'static str;

    /// Mutate `image` in place. Randomized defaults are drawn from `rng`.
    ///
    /// Invalid explicit options are reported before any byte is written.
    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError>;
}

/// Any effect plus its options, tagged by effect name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum EffectSpec {
    RgbShift(RgbShift),
    RedShift(RedShift),
    GreenShift(GreenShift),
    BlueShift(BlueShift),
    ColorShift(ColorShift),
    ColorShift2(ColorShift2),
    SuperShift(SuperShift),
    RgbGlitch(RgbGlitch),

    #[serde(rename = "dither8Bit")]
    Dither8Bit(Dither8Bit),
    DitherAtkinsons,
    DitherFloydSteinberg,
    DitherBayer(DitherBayer),
    DitherBayer3(DitherBayer3),
    DitherRandom,
    DitherRandom3,
    DitherHalftone,
    DitherBitmask(DitherBitmask),

    Sort(Sort),
    SortRows,
    RandomSortRows,
    SortStripe(SortStripe),
    Slicesort(Slicesort),
    Shortsort(Shortsort),
    Shortdumbsort(Shortdumbsort),
    PixelSort(PixelSort),
    Fractal(Fractal),
    FractalGhosts(FractalGhosts),

    Slice(Slice),
    SelectSlice(SelectSlice),
    SuperSlice(SuperSlice),
    DrumrollHorizontal,
    DrumrollHorizontalWave,
    DrumrollVertical,
    DrumrollVerticalWave,
    FocusImage(FocusImage),
    PixelFunk(PixelFunk),
    Inverse,
    Scanlines(Scanlines),
}

impl EffectSpec {
    pub fn name(&self) -> &'static str {
        match self {
            EffectSpec::RgbShift(_) => RgbShift::NAME,
            EffectSpec::RedShift(_) => RedShift::NAME,
            EffectSpec::GreenShift(_) => GreenShift::NAME,
            EffectSpec::BlueShift(_) => BlueShift::NAME,
            EffectSpec::ColorShift(_) => ColorShift::NAME,
            EffectSpec::ColorShift2(_) => ColorShift2::NAME,
            EffectSpec::SuperShift(_) => SuperShift::NAME,
            EffectSpec::RgbGlitch(_) => RgbGlitch::NAME,
            EffectSpec::Dither8Bit(_) => Dither8Bit::NAME,
            EffectSpec::DitherAtkinsons => DitherAtkinsons::NAME,
            EffectSpec::DitherFloydSteinberg => DitherFloydSteinberg::NAME,
            EffectSpec::DitherBayer(_) => DitherBayer::NAME,
            EffectSpec::DitherBayer3(_) => DitherBayer3::NAME,
            EffectSpec::DitherRandom => DitherRandom::NAME,
            EffectSpec::DitherRandom3 => DitherRandom3::NAME,
            EffectSpec::DitherHalftone => DitherHalftone::NAME,
            EffectSpec::DitherBitmask(_) => DitherBitmask::NAME,
            EffectSpec::Sort(_) => Sort::NAME,
            EffectSpec::SortRows => SortRows::NAME,
            EffectSpec::RandomSortRows => RandomSortRows::NAME,
            EffectSpec::SortStripe(_) => SortStripe::NAME,
            EffectSpec::Slicesort(_) => Slicesort::NAME,
            EffectSpec::Shortsort(_) => Shortsort::NAME,
            EffectSpec::Shortdumbsort(_) => Shortdumbsort::NAME,
            EffectSpec::PixelSort(_) => PixelSort::NAME,
            EffectSpec::Fractal(_) => Fractal::NAME,
            EffectSpec::FractalGhosts(_) => FractalGhosts::NAME,
            EffectSpec::Slice(_) => Slice::NAME,
            EffectSpec::SelectSlice(_) => SelectSlice::NAME,
            EffectSpec::SuperSlice(_) => SuperSlice::NAME,
            EffectSpec::DrumrollHorizontal => DrumrollHorizontal::NAME,
            EffectSpec::DrumrollHorizontalWave => DrumrollHorizontalWave::NAME,
            EffectSpec::DrumrollVertical => DrumrollVertical::NAME,
            EffectSpec::DrumrollVerticalWave => DrumrollVerticalWave::NAME,
            EffectSpec::FocusImage(_) => FocusImage::NAME,
            EffectSpec::PixelFunk(_) => PixelFunk::NAME,
            EffectSpec::Inverse => Inverse::NAME,
            EffectSpec::Scanlines(_) => Scanlines::NAME,
        }
    }

    pub fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        match self {
            EffectSpec::RgbShift(e) => e.apply(image, rng),
            EffectSpec::RedShift(e) => e.apply(image, rng),
            EffectSpec::GreenShift(e) => e.apply(image, rng),
            EffectSpec::BlueShift(e) => e.apply(image, rng),
            EffectSpec::ColorShift(e) => e.apply(image, rng),
            EffectSpec::ColorShift2(e) => e.apply(image, rng),
            EffectSpec::SuperShift(e) => e.apply(image, rng),
            EffectSpec::RgbGlitch(e) => e.apply(image, rng),
            EffectSpec::Dither8Bit(e) => e.apply(image, rng),
            EffectSpec::DitherAtkinsons => DitherAtkinsons.apply(image, rng),
            EffectSpec::DitherFloydSteinberg => DitherFloydSteinberg.apply(image, rng),
            EffectSpec::DitherBayer(e) => e.apply(image, rng),
            EffectSpec::DitherBayer3(e) => e.apply(image, rng),
            EffectSpec::DitherRandom => DitherRandom.apply(image, rng),
            EffectSpec::DitherRandom3 => DitherRandom3.apply(image, rng),
            EffectSpec::DitherHalftone => DitherHalftone.apply(image, rng),
            EffectSpec::DitherBitmask(e) => e.apply(image, rng),
            EffectSpec::Sort(e) => e.apply(image, rng),
            EffectSpec::SortRows => SortRows.apply(image, rng),
            EffectSpec::RandomSortRows => RandomSortRows.apply(image, rng),
            EffectSpec::SortStripe(e) => e.apply(image, rng),
            EffectSpec::Slicesort(e) => e.apply(image, rng),
            EffectSpec::Shortsort(e) => e.apply(image, rng),
            EffectSpec::Shortdumbsort(e) => e.apply(image, rng),
            EffectSpec::PixelSort(e) => e.apply(image, rng),
            EffectSpec::Fractal(e) => e.apply(image, rng),
            EffectSpec::FractalGhosts(e) => e.apply(image, rng),
            EffectSpec::Slice(e) => e.apply(image, rng),
            EffectSpec::SelectSlice(e) => e.apply(image, rng),
            EffectSpec::SuperSlice(e) => e.apply(image, rng),
            EffectSpec::DrumrollHorizontal => DrumrollHorizontal.apply(image, rng),
            EffectSpec::DrumrollHorizontalWave => DrumrollHorizontalWave.apply(image, rng),
            EffectSpec::DrumrollVertical => DrumrollVertical.apply(image, rng),
            EffectSpec::DrumrollVerticalWave => DrumrollVerticalWave.apply(image, rng),
            EffectSpec::FocusImage(e) => e.apply(image, rng),
            EffectSpec::PixelFunk(e) => e.apply(image, rng),
            EffectSpec::Inverse => Inverse.apply(image, rng),
            EffectSpec::Scanlines(e) => e.apply(image, rng),
        }
    }
}

/// Validate a channel selector (0 = R, 1 = G, 2 = B).
pub(crate) fn check_channel(
    effect: &'static str,
    field: &str,
    value: usize,
) -> Result<usize, EffectError> {
    if value > 2 {
        return Err(EffectError::invalid(
            effect,
            format!("{field} must be 0, 1 or 2, got {value}"),
        ));
    }
    Ok(value)
}

/// Reject an explicit `[start, end)` that reaches past `len`.
pub(crate) fn check_range(
    effect: &'static str,
    start: Option<usize>,
    end: Option<usize>,
    len: usize,
) -> Result<(), EffectError> {
    let too_far = |bound: Option<usize>| bound.is_some_and(|b| b > len);
    if too_far(start) || too_far(end) {
        return Err(EffectError::RangeOutOfBounds {
            effect,
            start: start.unwrap_or(0),
            end: end.unwrap_or(len),
            len,
        });
    }
    Ok(())
}
