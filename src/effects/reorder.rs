//! Pixel reordering: sorts over the whole buffer, rows or sub-ranges, plus
//! the self-referential fractal remaps.
//!
//! Sorts run on the word view and compare raw packed values, so "brighter"
//! means whatever the byte order makes it mean. The fractal remaps run on
//! the byte view.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{check_channel, check_range, ImageEffect};
use crate::buffer::PixelBuffer;
use crate::error::EffectError;
use crate::random::{
    coin_toss, fair_min_max, fair_min_max2, range_round, uniform_int, uniform_round,
};

fn sort_words(words: &mut [u32], ascending: bool) {
    if ascending {
        words.sort_unstable();
    } else {
        words.sort_unstable_by(|a, b| b.cmp(a));
    }
}

/// Sort the whole buffer as one sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sort {
    /// `true` sorts ascending.
    pub dir: Option<bool>,
}

impl ImageEffect for Sort {
    const NAME: &'static str = "sort";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let dir = self.dir.unwrap_or_else(|| coin_toss(rng));
        image.with_words(|words, _, _| sort_words(words, dir));
        Ok(())
    }
}

/// Sort every row ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortRows;

impl ImageEffect for SortRows {
    const NAME: &'static str = "sortRows";

    fn apply(&self, image: &mut PixelBuffer, _rng: &mut dyn RngCore) -> Result<(), EffectError> {
        if image.is_empty() {
            return Ok(());
        }
        image.with_words(|words, width, _| {
            for row in words.chunks_exact_mut(width) {
                row.sort_unstable();
            }
        });
        Ok(())
    }
}

/// Merge sort whose comparator is a coin toss.
///
/// Always yields a permutation of `values`, whatever the tosses say.
fn toss_merge_sort(values: &mut [u32], scratch: &mut Vec<u32>, rng: &mut dyn RngCore) {
    let n = values.len();
    if n < 2 {
        return;
    }
    let mid = n / 2;
    toss_merge_sort(&mut values[..mid], scratch, rng);
    toss_merge_sort(&mut values[mid..], scratch, rng);

    scratch.clear();
    let (mut i, mut j) = (0, mid);
    while i < mid && j < n {
        if coin_toss(rng) {
            scratch.push(values[i]);
            i += 1;
        } else {
            scratch.push(values[j]);
            j += 1;
        }
    }
    scratch.extend_from_slice(&values[i..mid]);
    scratch.extend_from_slice(&values[j..]);
    values.copy_from_slice(&scratch[..]);
}

/// Shuffle every row with a randomly comparing merge sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomSortRows;

impl ImageEffect for RandomSortRows {
    const NAME: &'static str = "randomSortRows";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        if image.is_empty() {
            return Ok(());
        }
        image.with_words(|words, width, _| {
            let mut scratch = Vec::with_capacity(width);
            for row in words.chunks_exact_mut(width) {
                toss_merge_sort(row, &mut scratch, rng);
            }
        });
        Ok(())
    }
}

/// Fill unset bounds from `fair_min_max2(0, len)` and clamp.
fn bounds_or_random(
    rng: &mut dyn RngCore,
    start: Option<usize>,
    end: Option<usize>,
    len: usize,
) -> (usize, usize) {
    match (start, end) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            let (a, b) = fair_min_max2(rng, 0, len);
            (start.unwrap_or(a.min(len)), end.unwrap_or(b.min(len)))
        }
    }
}

/// Sort the columns `[start, end)` of every row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortStripe {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl ImageEffect for SortStripe {
    const NAME: &'static str = "sortStripe";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let width = image.width();
        check_range(Self::NAME, self.start, self.end, width)?;
        if image.is_empty() {
            return Ok(());
        }
        let (start, end) = bounds_or_random(rng, self.start, self.end, width);
        tracing::trace!(start, end, "sortStripe columns");
        if start >= end {
            return Ok(());
        }
        image.with_words(|words, width, _| {
            for row in words.chunks_exact_mut(width) {
                row[start..end].sort_unstable();
            }
        });
        Ok(())
    }
}

/// Sort `[start, end)` of the flattened buffer, then copy the sorted
/// segment to a random offset (or back over `start`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slicesort {
    pub dir: Option<bool>,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl ImageEffect for Slicesort {
    const NAME: &'static str = "slicesort";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let len = image.pixel_count();
        check_range(Self::NAME, self.start, self.end, len)?;
        if len == 0 {
            return Ok(());
        }
        let dir = self.dir.unwrap_or_else(|| coin_toss(rng));
        let (start, end) = bounds_or_random(rng, self.start, self.end, len);
        if start >= end {
            return Ok(());
        }
        let seg_len = end - start;
        let offset = uniform_round(rng, len).abs_diff(seg_len) % len;
        let dest = (if coin_toss(rng) { offset } else { start }).min(len - seg_len);
        tracing::trace!(start, end, dest, dir, "slicesort segment");

        image.with_words(|words, _, _| {
            sort_words(&mut words[start..end], dir);
            words.copy_within(start..end, dest);
        });
        Ok(())
    }
}

/// Resolve `[start, end)` for the short sorts.
///
/// Explicit bounds are kept as given. A missing bound is drawn from the fair
/// pair helpers on the side of the explicit one, so a given `start` stays
/// the lower bound and a given `end` stays the upper bound.
fn short_bounds(
    rng: &mut dyn RngCore,
    start: Option<usize>,
    end: Option<usize>,
    len: usize,
) -> (usize, usize) {
    match (start, end) {
        (Some(s), Some(e)) => (s, e),
        (None, None) => {
            let (a, b) = fair_min_max(rng, 0, len);
            let (a, b) = fair_min_max2(rng, a, b);
            (a.min(len), b.min(len))
        }
        (Some(s), None) => {
            let high = range_round(rng, s, len);
            let (_, b) = fair_min_max(rng, s, high);
            (s, b.min(len))
        }
        (None, Some(e)) => {
            let low = uniform_round(rng, e);
            let (a, _) = fair_min_max(rng, low, e);
            (a.min(e), e)
        }
    }
}

fn short_sort(
    effect: &'static str,
    image: &mut PixelBuffer,
    rng: &mut dyn RngCore,
    start: Option<usize>,
    end: Option<usize>,
    ascending: bool,
) -> Result<(), EffectError> {
    let len = image.pixel_count();
    check_range(effect, start, end, len)?;
    let (start, end) = short_bounds(rng, start, end, len);
    tracing::trace!(effect, start, end, "short sort range");
    if start >= end {
        return Ok(());
    }
    image.with_words(|words, _, _| sort_words(&mut words[start..end], ascending));
    Ok(())
}

/// Sort a random (or given) sub-range of the flattened buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortsort {
    /// Ascending unless explicitly `false`.
    pub dir: Option<bool>,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl ImageEffect for Shortsort {
    const NAME: &'static str = "shortsort";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let ascending = self.dir.unwrap_or(true);
        short_sort(Self::NAME, image, rng, self.start, self.end, ascending)
    }
}

/// [`Shortsort`] that always sorts ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortdumbsort {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl ImageEffect for Shortdumbsort {
    const NAME: &'static str = "shortdumbsort";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        short_sort(Self::NAME, image, rng, self.start, self.end, true)
    }
}

/// Per row, sort the first run of values at or above a threshold.
///
/// The run starts at the first index whose value is `>= threshold` (index 0
/// included) and ends before the next value below it, or at the row end.
/// Without an explicit threshold each row uses its own mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelSort {
    pub threshold: Option<u32>,
}

fn bright_run(row: &[u32], threshold: u32) -> Option<(usize, usize)> {
    let low = row.iter().position(|&v| v >= threshold)?;
    let high = row[low..]
        .iter()
        .position(|&v| v < threshold)
        .map_or(row.len(), |p| low + p);
    Some((low, high))
}

impl ImageEffect for PixelSort {
    const NAME: &'static str = "pixelSort";

    fn apply(&self, image: &mut PixelBuffer, _rng: &mut dyn RngCore) -> Result<(), EffectError> {
        if image.is_empty() {
            return Ok(());
        }
        let fixed = self.threshold;
        image.with_words(|words, width, _| {
            for row in words.chunks_exact_mut(width) {
                let threshold = fixed.unwrap_or_else(|| {
                    let sum: u64 = row.iter().map(|&v| v as u64).sum();
                    (sum / width as u64) as u32
                });
                if let Some((low, high)) = bright_run(row, threshold) {
                    row[low..high].sort_unstable();
                }
            }
        });
        Ok(())
    }
}

/// `data[i] = data[(i * k) mod len]` wherever that value is smaller.
#[inline]
fn remap(data: &mut [u8], i: usize, k: usize) {
    let j = (i * k) % data.len();
    if data[j] < data[i] {
        data[i] = data[j];
    }
}

/// Self-referential byte remap.
///
/// Kind 0 walks backward from the end with `k = 2`; kind 1 walks forward
/// with a random multiplier in `[2, 8]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fractal {
    pub kind: Option<usize>,
}

impl ImageEffect for Fractal {
    const NAME: &'static str = "fractal";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let kind = self.kind.unwrap_or_else(|| uniform_int(rng, 2));
        if kind > 1 {
            return Err(EffectError::invalid(
                Self::NAME,
                format!("kind must be 0 or 1, got {kind}"),
            ));
        }
        let data = image.as_bytes_mut();
        if data.is_empty() {
            return Ok(());
        }
        if kind == 0 {
            for i in (1..data.len()).rev() {
                remap(data, i, 2);
            }
        } else {
            let m = range_round(rng, 2, 6);
            tracing::trace!(m, "fractal multiplier");
            for i in 0..data.len() {
                remap(data, i, m);
            }
        }
        Ok(())
    }
}

/// Forward fractal remap with optional "ghost" channel.
///
/// | kind | multiplier | ghost |
/// |------|------------|-------|
/// | 0 | 2 | no |
/// | 1 | random | no |
/// | 2 | random | yes |
/// | 3 | 2 | yes |
///
/// The random multiplier is drawn once per call. Ghost bytes (those with
/// `i mod 4 == color`) are forced to 255 and skip the remap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalGhosts {
    pub kind: Option<usize>,
    pub color: Option<usize>,
}

impl ImageEffect for FractalGhosts {
    const NAME: &'static str = "fractalGhosts";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let kind = self.kind.unwrap_or_else(|| uniform_int(rng, 4));
        if kind > 3 {
            return Err(EffectError::invalid(
                Self::NAME,
                format!("kind must be 0 to 3, got {kind}"),
            ));
        }
        let color = check_channel(
            Self::NAME,
            "color",
            self.color.unwrap_or_else(|| uniform_int(rng, 3)),
        )?;
        let multiplier = range_round(rng, 1, 10);
        tracing::trace!(kind, color, multiplier, "fractalGhosts parameters");

        let (k, ghost) = match kind {
            0 => (2, false),
            1 => (multiplier, false),
            2 => (multiplier, true),
            _ => (2, true),
        };
        let data = image.as_bytes_mut();
        for i in 0..data.len() {
            if ghost && i % 4 == color {
                data[i] = 0xff;
                continue;
            }
            remap(data, i, k);
        }
        Ok(())
    }
}
