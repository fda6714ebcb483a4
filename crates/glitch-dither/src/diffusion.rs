//! Error diffusion dithering to pure black/white per channel.
//!
//! The scan is a single left-to-right, top-to-bottom pass over an RGBA byte
//! buffer. Every colour channel is binarized at [`THRESHOLD`] and the
//! quantization error is spread over the neighbours named by a [`Kernel`].
//! Alpha is never touched.

use crate::kernel::{Kernel, ATKINSON, FLOYD_STEINBERG};
use crate::THRESHOLD;

/// Pending quantization error for the rows a kernel can still reach.
///
/// Error is kept as integer numerators (`error * weight`) and only divided
/// by the kernel divisor when a pixel is read, so shares that are smaller
/// than one level still add up. Row 0 is the row being scanned.
#[derive(Debug)]
pub struct ErrorRows {
    rows: Vec<Vec<[i32; 3]>>,
}

impl ErrorRows {
    /// `depth` rows of `width` pixels, usually `max_dy + 1`.
    pub fn new(width: usize, depth: usize) -> Self {
        Self {
            rows: vec![vec![[0; 3]; width]; depth],
        }
    }

    /// Pending numerators for pixel `x` of the current row.
    #[inline]
    pub fn pending(&self, x: usize) -> [i32; 3] {
        self.rows[0][x]
    }

    /// Queue `share` for pixel `x`, `dy` rows below the current one.
    /// Targets outside the window are dropped.
    #[inline]
    pub fn push(&mut self, x: usize, dy: usize, share: [i32; 3]) {
        if let Some(cell) = self.rows.get_mut(dy).and_then(|row| row.get_mut(x)) {
            for (pending, s) in cell.iter_mut().zip(share) {
                *pending += s;
            }
        }
    }

    /// Move the window down one row; the new last row starts empty.
    pub fn next_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0; 3]);
        }
    }
}

/// Binarize a channel value (including pending error) at [`THRESHOLD`].
#[inline]
fn binarize(value: i32) -> u8 {
    if value > THRESHOLD as i32 {
        0xff
    } else {
        0
    }
}

/// Core error diffusion loop, parameterized by kernel.
///
/// `data` must hold `width * height` RGBA pixels. Neighbours outside the
/// image are skipped, never wrapped. Error arriving at a pixel is applied
/// before that pixel is binarized, so the scan order matters.
pub fn diffuse(data: &mut [u8], width: usize, height: usize, kernel: &Kernel) {
    debug_assert_eq!(data.len(), width * height * 4);

    let divisor = kernel.divisor as i32;
    let mut errors = ErrorRows::new(width, kernel.max_dy + 1);

    for y in 0..height {
        for x in 0..width {
            let i = 4 * (y * width + x);
            let pending = errors.pending(x);

            let mut error = [0i32; 3];
            for c in 0..3 {
                let old = data[i + c] as i32 + pending[c].div_euclid(divisor);
                let new = binarize(old);
                data[i + c] = new;
                error[c] = old - new as i32;
            }

            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                if nx < 0 || nx as usize >= width || y + dy as usize >= height {
                    continue;
                }
                let weight = weight as i32;
                errors.push(
                    nx as usize,
                    dy as usize,
                    [error[0] * weight, error[1] * weight, error[2] * weight],
                );
            }
        }

        errors.next_row();
    }
}

/// Atkinson dithering (6/8 of the error propagated).
pub fn atkinson(data: &mut [u8], width: usize, height: usize) {
    diffuse(data, width, height, &ATKINSON);
}

/// Floyd-Steinberg dithering (all error propagated).
pub fn floyd_steinberg(data: &mut [u8], width: usize, height: usize) {
    diffuse(data, width, height, &FLOYD_STEINBERG);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: usize, height: usize, value: u8) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&[value, value, value, 0xff]);
        }
        data
    }

    #[test]
    fn test_error_rows_sum_numerators() {
        let mut errors = ErrorRows::new(4, 2);
        errors.push(2, 0, [7, -3, 0]);
        errors.push(2, 0, [7, -3, 1]);
        assert_eq!(errors.pending(2), [14, -6, 1]);
        assert_eq!(errors.pending(1), [0, 0, 0]);
    }

    #[test]
    fn test_error_rows_slide_down() {
        let mut errors = ErrorRows::new(2, 3);
        errors.push(0, 1, [5, 0, 0]);
        errors.push(1, 2, [0, 9, 0]);

        errors.next_row();
        assert_eq!(errors.pending(0), [5, 0, 0]);
        errors.next_row();
        assert_eq!(errors.pending(1), [0, 9, 0]);
        errors.next_row();
        assert_eq!(errors.pending(0), [0, 0, 0], "recycled row starts empty");
        assert_eq!(errors.pending(1), [0, 0, 0], "recycled row starts empty");
    }

    #[test]
    fn test_error_rows_drop_targets_outside_window() {
        let mut errors = ErrorRows::new(3, 2);
        errors.push(3, 0, [1, 1, 1]);
        errors.push(0, 2, [1, 1, 1]);
        for x in 0..3 {
            assert_eq!(errors.pending(x), [0, 0, 0]);
        }
    }

    #[test]
    fn test_binarize_threshold_is_exclusive() {
        assert_eq!(binarize(127), 0);
        assert_eq!(binarize(128), 0xff);
        assert_eq!(binarize(-40), 0);
        assert_eq!(binarize(400), 0xff);
    }

    #[test]
    fn test_sub_level_shares_accumulate() {
        // An error of 4 gives each Atkinson neighbour half a level; two such
        // shares reaching one pixel add up to a whole level.
        let mut errors = ErrorRows::new(3, 3);
        errors.push(1, 1, [4, 4, 4]);
        errors.push(1, 1, [4, 4, 4]);
        errors.next_row();
        assert_eq!(errors.pending(1)[0].div_euclid(ATKINSON.divisor as i32), 1);
    }

    #[test]
    fn test_single_row_error_carries_right() {
        // 100 → 0 (error 100), next pixel sees 100 + floor(700 / 16) = 143 → 255.
        let mut data = gray(2, 1, 100);
        floyd_steinberg(&mut data, 2, 1);
        assert_eq!(&data[0..3], &[0, 0, 0]);
        assert_eq!(&data[4..7], &[0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_atkinson_drops_error() {
        // With 6/8 propagation a 100-valued pixel only hands 12 per neighbour,
        // so a 2x1 image of 100s stays black.
        let mut data = gray(2, 1, 100);
        atkinson(&mut data, 2, 1);
        assert!(data.chunks(4).all(|px| px[0] == 0));
    }

    #[test]
    fn test_alpha_untouched() {
        let mut data = vec![200, 10, 130, 77, 5, 250, 128, 12];
        atkinson(&mut data, 2, 1);
        assert_eq!(data[3], 77);
        assert_eq!(data[7], 12);
    }

    #[test]
    fn test_mid_gray_produces_mix() {
        let mut data = gray(16, 16, 128);
        floyd_steinberg(&mut data, 16, 16);
        let whites = data.chunks(4).filter(|px| px[0] == 0xff).count();
        assert!(whites > 64 && whites < 192, "expected roughly half white, got {whites}");
    }
}
