//! Spatial displacement: byte-range slicing, circular row/column rolls,
//! block pixelation and bitwise word effects.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{check_range, ImageEffect};
use crate::buffer::{map_packed, PixelBuffer, ALPHA_MASK};
use crate::error::EffectError;
use crate::random::{chance, coin_toss, range_round, uniform_int};

/// Ratio between a derived cut end and its start.
const CUT_RATIO: f64 = 1.7;

/// Copy `[start, end)` over an equal-length range at a random offset.
///
/// `copy_within` behaves like `memmove`, so overlapping ranges are fine.
fn slice_bytes(data: &mut [u8], start: usize, end: usize, rng: &mut dyn RngCore) {
    if start >= end {
        return;
    }
    let cut_len = end - start;
    let dest = uniform_int(rng, data.len() - cut_len);
    tracing::trace!(start, end, dest, "slice");
    data.copy_within(start..end, dest);
}

fn cut_start(cut_end: usize) -> usize {
    (cut_end as f64 / CUT_RATIO).floor() as usize
}

/// Derive a cut from one of the two selection policies.
fn select_cut(rng: &mut dyn RngCore, selection: usize, len: usize) -> (usize, usize) {
    let cut_end = if selection == 0 || chance(rng, 0.75) {
        uniform_int(rng, len)
    } else {
        len
    };
    (cut_start(cut_end), cut_end)
}

/// Copy a byte range somewhere else in the buffer.
///
/// Unset bounds follow selection policy 0: a random end, and a start at
/// `end / 1.7`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slice {
    pub cutstart: Option<usize>,
    pub cutend: Option<usize>,
}

impl ImageEffect for Slice {
    const NAME: &'static str = "slice";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let len = image.len();
        check_range(Self::NAME, self.cutstart, self.cutend, len)?;
        let end = self.cutend.unwrap_or_else(|| uniform_int(rng, len));
        let start = self.cutstart.unwrap_or_else(|| cut_start(end));
        slice_bytes(image.as_bytes_mut(), start, end, rng);
        Ok(())
    }
}

/// [`Slice`] with the cut chosen by policy 0 or 1.
///
/// Policy 1 cuts to the end of the buffer a quarter of the time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectSlice {
    pub selection: Option<usize>,
}

impl ImageEffect for SelectSlice {
    const NAME: &'static str = "selectSlice";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let selection = self.selection.unwrap_or_else(|| range_round(rng, 0, 1));
        if selection > 1 {
            return Err(EffectError::invalid(
                Self::NAME,
                format!("selection must be 0 or 1, got {selection}"),
            ));
        }
        let (start, end) = select_cut(rng, selection, image.len());
        slice_bytes(image.as_bytes_mut(), start, end, rng);
        Ok(())
    }
}

/// Several [`SelectSlice`]s in a row, each with a random policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperSlice {
    pub iterations: Option<usize>,
}

impl ImageEffect for SuperSlice {
    const NAME: &'static str = "superSlice";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let iterations = self.iterations.unwrap_or_else(|| range_round(rng, 1, 9));
        tracing::trace!(iterations, "superSlice iterations");
        for _ in 0..iterations {
            SelectSlice { selection: None }.apply(image, rng)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// Each row rolls right.
    Rows,
    /// Each column rolls down.
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RollStyle {
    /// Occasional random jumps.
    Plain,
    /// Occasional jumps to a cosine of the line index.
    Wave,
}

/// Update the running roll before line `line`.
fn next_roll(
    rng: &mut dyn RngCore,
    roll: i64,
    style: RollStyle,
    line: usize,
    extent: usize,
) -> i64 {
    let mut roll = roll;
    match style {
        RollStyle::Plain => {
            if chance(rng, 0.05) {
                roll = uniform_int(rng, extent) as i64;
            }
            if chance(rng, 0.05) {
                roll = 0;
            }
        }
        RollStyle::Wave => {
            if chance(rng, 0.05) {
                roll = ((line as f64).cos() * 2.0 * extent as f64).floor() as i64;
            }
            if chance(rng, 0.02) {
                roll = 0;
            }
        }
    }
    roll
}

/// Circularly rotate every line along `axis` by a slowly changing roll.
fn drumroll(image: &mut PixelBuffer, rng: &mut dyn RngCore, axis: Axis, style: RollStyle) {
    if image.is_empty() {
        return;
    }
    image.with_words(|words, width, height| {
        let mut roll = 0i64;
        match axis {
            // Both axes roll each line along its own length, with the line
            // index feeding the wave. Keeps every line a permutation of itself.
            Axis::Rows => {
                for (y, row) in words.chunks_exact_mut(width).enumerate() {
                    roll = next_roll(rng, roll, style, y, width);
                    row.rotate_right(roll.rem_euclid(width as i64) as usize);
                }
            }
            Axis::Columns => {
                let mut column = vec![0u32; height];
                for x in 0..width {
                    roll = next_roll(rng, roll, style, x, height);
                    for (y, value) in column.iter_mut().enumerate() {
                        *value = words[y * width + x];
                    }
                    column.rotate_right(roll.rem_euclid(height as i64) as usize);
                    for (y, &value) in column.iter().enumerate() {
                        words[y * width + x] = value;
                    }
                }
            }
        }
    });
}

macro_rules! drumroll_effect {
    ($(#[$doc:meta])* $name:ident, $tag:literal, $axis:expr, $style:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl ImageEffect for $name {
            const NAME: &'static str = $tag;

            fn apply(
                &self,
                image: &mut PixelBuffer,
                rng: &mut dyn RngCore,
            ) -> Result<(), EffectError> {
                drumroll(image, rng, $axis, $style);
                Ok(())
            }
        }
    };
}

drumroll_effect!(
    /// Roll rows right; the roll jumps to a random value now and then.
    DrumrollHorizontal,
    "drumrollHorizontal",
    Axis::Rows,
    RollStyle::Plain
);
drumroll_effect!(
    /// Roll rows right following a sparse cosine wave.
    DrumrollHorizontalWave,
    "drumrollHorizontalWave",
    Axis::Rows,
    RollStyle::Wave
);
drumroll_effect!(
    /// Roll columns down; the roll jumps to a random value now and then.
    DrumrollVertical,
    "drumrollVertical",
    Axis::Columns,
    RollStyle::Plain
);
drumroll_effect!(
    /// Roll columns down following a sparse cosine wave.
    DrumrollVerticalWave,
    "drumrollVerticalWave",
    Axis::Columns,
    RollStyle::Wave
);

fn pixelation(
    effect: &'static str,
    value: Option<usize>,
    rng: &mut dyn RngCore,
) -> Result<usize, EffectError> {
    let size = value.unwrap_or_else(|| range_round(rng, 2, 10));
    if size == 0 {
        return Err(EffectError::invalid(effect, "pixelation must be positive"));
    }
    tracing::trace!(effect, size, "pixelation");
    Ok(size)
}

/// Fill `size × size` blocks with their top-left pixel, clipped at the
/// right and bottom edges. `keep` decides per block whether to fill it.
fn pixelate(image: &mut PixelBuffer, size: usize, mut keep: impl FnMut() -> bool) {
    image.with_words(|words, width, height| {
        for by in (0..height).step_by(size) {
            for bx in (0..width).step_by(size) {
                if !keep() {
                    continue;
                }
                let source = words[by * width + bx];
                for y in by..(by + size).min(height) {
                    words[y * width + bx..y * width + (bx + size).min(width)].fill(source);
                }
            }
        }
    });
}

/// Block pixelation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusImage {
    pub pixelation: Option<usize>,
}

impl ImageEffect for FocusImage {
    const NAME: &'static str = "focusImage";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let size = pixelation(Self::NAME, self.pixelation, rng)?;
        pixelate(image, size, || true);
        Ok(())
    }
}

/// Block pixelation where each block is only filled on a coin toss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelFunk {
    pub pixelation: Option<usize>,
}

impl ImageEffect for PixelFunk {
    const NAME: &'static str = "pixelFunk";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let size = pixelation(Self::NAME, self.pixelation, rng)?;
        pixelate(image, size, || coin_toss(rng));
        Ok(())
    }
}

#[inline]
fn invert(word: u32) -> u32 {
    !word | ALPHA_MASK
}

/// Complement every pixel, forcing alpha opaque.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inverse;

impl ImageEffect for Inverse {
    const NAME: &'static str = "inverse";

    fn apply(&self, image: &mut PixelBuffer, _rng: &mut dyn RngCore) -> Result<(), EffectError> {
        image.map_words(invert);
        Ok(())
    }
}

const SCANLINE_XOR: [u32; 4] = [0x0055_5555, 0xFF00_FF00, 0x00F0_F0F0, 0x0033_3333];
const SCANLINE_OR: [u32; 4] = [0xFF55_5555, 0xFF00_FF00, 0xFFF0_F0F0, 0xFF33_3333];

/// Combine every `size`-th row with a constant.
///
/// `kind` 0 XORs with `SCANLINE_XOR[option]`, 1 ORs with
/// `SCANLINE_OR[option]`, 2 inverts with opaque alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scanlines {
    pub kind: Option<usize>,
    pub size: Option<usize>,
    pub option: Option<usize>,
}

impl ImageEffect for Scanlines {
    const NAME: &'static str = "scanlines";

    fn apply(&self, image: &mut PixelBuffer, rng: &mut dyn RngCore) -> Result<(), EffectError> {
        let kind = self.kind.unwrap_or_else(|| uniform_int(rng, 3));
        let size = self.size.unwrap_or_else(|| range_round(rng, 3, 12));
        let option = self.option.unwrap_or_else(|| uniform_int(rng, 4));
        if kind > 2 {
            return Err(EffectError::invalid(
                Self::NAME,
                format!("kind must be 0, 1 or 2, got {kind}"),
            ));
        }
        if size == 0 {
            return Err(EffectError::invalid(Self::NAME, "size must be positive"));
        }
        if option > 3 {
            return Err(EffectError::invalid(
                Self::NAME,
                format!("option must be 0 to 3, got {option}"),
            ));
        }
        tracing::trace!(kind, size, option, "scanlines parameters");
        if image.is_empty() {
            return Ok(());
        }

        let combine = |word: u32| match kind {
            0 => word ^ SCANLINE_XOR[option],
            1 => word | SCANLINE_OR[option],
            _ => invert(word),
        };
        let row_bytes = image.width() * 4;
        for row in image.as_bytes_mut().chunks_exact_mut(row_bytes).step_by(size) {
            map_packed(row, &combine);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;
    use pretty_assertions::assert_eq;

    fn numbered(width: usize, height: usize) -> PixelBuffer {
        let data = (0..width * height * 4).map(|i| i as u8).collect();
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    fn sorted(mut values: Vec<u32>) -> Vec<u32> {
        values.sort_unstable();
        values
    }

    #[test]
    fn test_slice_zero_length_is_noop() {
        let original = numbered(4, 4);
        let mut image = original.clone();
        Slice {
            cutstart: Some(0),
            cutend: Some(0),
        }
        .apply(&mut image, &mut seeded(0))
        .unwrap();
        assert_eq!(image, original);
    }

    #[test]
    fn test_slice_inverted_range_is_noop() {
        let original = numbered(4, 4);
        let mut image = original.clone();
        Slice {
            cutstart: Some(10),
            cutend: Some(4),
        }
        .apply(&mut image, &mut seeded(0))
        .unwrap();
        assert_eq!(image, original);
    }

    #[test]
    fn test_slice_copies_cut_somewhere() {
        let original = numbered(4, 4);
        for seed in 0..10 {
            let mut image = original.clone();
            Slice {
                cutstart: Some(8),
                cutend: Some(20),
            }
            .apply(&mut image, &mut seeded(seed))
            .unwrap();
            let cut = &original.as_bytes()[8..20];
            assert!(
                image.as_bytes().windows(12).any(|w| w == cut),
                "seed {seed}: cut bytes not found"
            );
        }
    }

    #[test]
    fn test_slice_rejects_end_past_buffer() {
        let mut image = numbered(2, 2);
        let err = Slice {
            cutstart: Some(0),
            cutend: Some(17),
        }
        .apply(&mut image, &mut seeded(0))
        .unwrap_err();
        assert_eq!(
            err,
            EffectError::RangeOutOfBounds {
                effect: "slice",
                start: 0,
                end: 17,
                len: 16,
            }
        );
    }

    #[test]
    fn test_select_cut_policies() {
        let mut rng = seeded(8);
        for _ in 0..200 {
            let (start, end) = select_cut(&mut rng, 0, 100);
            assert!(end < 100);
            assert_eq!(start, (end as f64 / 1.7).floor() as usize);
        }
        let full = (0..400)
            .filter(|_| select_cut(&mut rng, 1, 100).1 == 100)
            .count();
        assert!(
            (60..140).contains(&full),
            "policy 1 should cut to the end about a quarter of the time, got {full}/400"
        );
    }

    #[test]
    fn test_select_slice_rejects_unknown_policy() {
        let mut image = numbered(2, 2);
        let err = SelectSlice { selection: Some(2) }
            .apply(&mut image, &mut seeded(0))
            .unwrap_err();
        assert!(matches!(err, EffectError::InvalidParameter { effect: "selectSlice", .. }));
    }

    #[test]
    fn test_super_slice_keeps_length() {
        let mut image = numbered(8, 8);
        SuperSlice { iterations: Some(5) }
            .apply(&mut image, &mut seeded(1))
            .unwrap();
        assert_eq!(image.len(), 256);
    }

    #[test]
    fn test_drumrolls_preserve_line_multisets() {
        let original = numbered(7, 5);
        let (w, h) = (7, 5);
        for seed in 0..30 {
            let mut rows = original.clone();
            DrumrollHorizontal.apply(&mut rows, &mut seeded(seed)).unwrap();
            let mut wave = original.clone();
            DrumrollHorizontalWave.apply(&mut wave, &mut seeded(seed)).unwrap();
            for image in [&rows, &wave] {
                let before = original.to_words();
                let after = image.to_words();
                for y in 0..h {
                    let line = |words: &[u32]| sorted(words[y * w..(y + 1) * w].to_vec());
                    assert_eq!(line(&after[..]), line(&before[..]), "seed {seed}, row {y}");
                }
            }

            let mut cols = original.clone();
            DrumrollVertical.apply(&mut cols, &mut seeded(seed)).unwrap();
            let mut wave = original.clone();
            DrumrollVerticalWave.apply(&mut wave, &mut seeded(seed)).unwrap();
            for image in [&cols, &wave] {
                let before = original.to_words();
                let after = image.to_words();
                for x in 0..w {
                    let column =
                        |words: &[u32]| sorted((0..h).map(|y| words[y * w + x]).collect());
                    assert_eq!(column(&after[..]), column(&before[..]), "seed {seed}, column {x}");
                }
            }
        }
    }

    #[test]
    fn test_drumroll_eventually_moves_pixels() {
        let original = numbered(16, 16);
        let moved = (0..20).any(|seed| {
            let mut image = original.clone();
            DrumrollVertical.apply(&mut image, &mut seeded(seed)).unwrap();
            image != original
        });
        assert!(moved, "no seed produced a non-zero roll");
    }

    #[test]
    fn test_focus_image_fills_blocks_with_top_left() {
        let mut image = numbered(5, 3);
        let before = image.to_words();
        FocusImage { pixelation: Some(2) }
            .apply(&mut image, &mut seeded(0))
            .unwrap();
        let after = image.to_words();
        for y in 0..3 {
            for x in 0..5 {
                let source = before[(y / 2 * 2) * 5 + x / 2 * 2];
                assert_eq!(after[y * 5 + x], source, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_pixelation_zero_is_invalid() {
        let mut image = numbered(2, 2);
        for result in [
            FocusImage { pixelation: Some(0) }.apply(&mut image, &mut seeded(0)),
            PixelFunk { pixelation: Some(0) }.apply(&mut image, &mut seeded(0)),
        ] {
            assert!(matches!(result, Err(EffectError::InvalidParameter { .. })));
        }
        assert_eq!(image, numbered(2, 2));
    }

    #[test]
    fn test_pixel_funk_blocks_are_all_or_nothing() {
        let original = numbered(8, 8);
        let mut image = original.clone();
        PixelFunk { pixelation: Some(4) }
            .apply(&mut image, &mut seeded(3))
            .unwrap();
        let before = original.to_words();
        let after = image.to_words();
        for (by, bx) in [(0, 0), (0, 4), (4, 0), (4, 4)] {
            let top_left = before[by * 8 + bx];
            let block: Vec<(usize, usize)> = (by..by + 4)
                .flat_map(|y| (bx..bx + 4).map(move |x| (x, y)))
                .collect();
            let filled = block.iter().all(|&(x, y)| after[y * 8 + x] == top_left);
            let untouched = block
                .iter()
                .all(|&(x, y)| after[y * 8 + x] == before[y * 8 + x]);
            assert!(filled || untouched, "block ({bx}, {by}) partially filled");
        }
    }

    #[test]
    fn test_inverse_twice_restores_rgb() {
        let original = numbered(3, 3);
        let mut image = original.clone();
        let mut rng = seeded(0);
        Inverse.apply(&mut image, &mut rng).unwrap();
        assert!(image.as_bytes().chunks(4).all(|px| px[3] == 255));
        Inverse.apply(&mut image, &mut rng).unwrap();
        for (a, b) in original.as_bytes().chunks(4).zip(image.as_bytes().chunks(4)) {
            assert_eq!(&a[..3], &b[..3]);
            assert_eq!(b[3], 255);
        }
    }

    #[test]
    fn test_scanlines_xor_is_self_inverse() {
        let original = numbered(4, 9);
        for option in 0..4 {
            let mut image = original.clone();
            let effect = Scanlines {
                kind: Some(0),
                size: Some(3),
                option: Some(option),
            };
            effect.apply(&mut image, &mut seeded(0)).unwrap();
            assert_ne!(image, original, "option {option} should change row 0");
            effect.apply(&mut image, &mut seeded(0)).unwrap();
            assert_eq!(image, original, "option {option}");
        }
    }

    #[test]
    fn test_scanlines_only_touch_every_size_th_row() {
        let original = PixelBuffer::filled(2, 5, [0, 0, 0, 0]);
        let mut image = original.clone();
        Scanlines {
            kind: Some(1),
            size: Some(2),
            option: Some(0),
        }
        .apply(&mut image, &mut seeded(0))
        .unwrap();
        for y in 0..5 {
            let expected = if y % 2 == 0 {
                [0x55, 0x55, 0x55, 0xFF]
            } else {
                [0, 0, 0, 0]
            };
            assert_eq!(image.pixel(1, y), expected, "row {y}");
        }
    }

    #[test]
    fn test_scanlines_reject_bad_parameters() {
        let mut image = numbered(2, 2);
        let scanlines = |kind, size, option| Scanlines {
            kind: Some(kind),
            size: Some(size),
            option: Some(option),
        };
        let bad = [scanlines(3, 2, 0), scanlines(0, 0, 0), scanlines(0, 2, 4)];
        for effect in bad {
            let result = effect.apply(&mut image, &mut seeded(0));
            assert!(
                matches!(result, Err(EffectError::InvalidParameter { .. })),
                "{effect:?}"
            );
        }
        assert_eq!(image, numbered(2, 2));
    }
}
