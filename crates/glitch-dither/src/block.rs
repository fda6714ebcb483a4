//! Block-structured dithers: block-average thresholding and 3×3 halftone.

use crate::THRESHOLD;

/// Halftone cell fill order inside a 3×3 block (row-major cell indices).
///
/// The centre grows first, then the dot spreads outward. A block at level
/// `l` (0..=9) fills the first `9 - l` cells with its colour; the rest stay
/// white.
pub const HALFTONE_ORDER: [usize; 9] = [4, 5, 1, 6, 3, 8, 2, 0, 7];

#[inline]
fn binarize_mean(sum: u64, count: u64) -> u8 {
    if sum as f64 / count as f64 > THRESHOLD as f64 {
        0xff
    } else {
        0
    }
}

/// Per-channel sums over a clipped block.
fn block_sums(
    data: &[u8],
    width: usize,
    x0: usize,
    y0: usize,
    bw: usize,
    bh: usize,
) -> [u64; 3] {
    let mut sums = [0u64; 3];
    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            let i = 4 * (y * width + x);
            for c in 0..3 {
                sums[c] += data[i + c] as u64;
            }
        }
    }
    sums
}

/// Block-average threshold ("8-bit" look).
///
/// The image is cut into `size × size` blocks; blocks on the right and
/// bottom edges are clipped to the image. Each channel's block mean is
/// binarized and written to every pixel of the block. Alpha is untouched.
///
/// `size` must be at least 1; callers validate the effect-level minimum.
pub fn block_average(data: &mut [u8], width: usize, height: usize, size: usize) {
    debug_assert!(size > 0);

    for y0 in (0..height).step_by(size) {
        for x0 in (0..width).step_by(size) {
            let bw = size.min(width - x0);
            let bh = size.min(height - y0);
            let sums = block_sums(data, width, x0, y0, bw, bh);
            let count = (bw * bh) as u64;
            let avg = [
                binarize_mean(sums[0], count),
                binarize_mean(sums[1], count),
                binarize_mean(sums[2], count),
            ];

            for y in y0..y0 + bh {
                for x in x0..x0 + bw {
                    let i = 4 * (y * width + x);
                    data[i..i + 3].copy_from_slice(&avg);
                }
            }
        }
    }
}

/// 3×3 halftone.
///
/// Only complete blocks are processed; a partial strip on the right or
/// bottom edge is left as is.
pub fn halftone(data: &mut [u8], width: usize, height: usize) {
    for y0 in (0..height.saturating_sub(2)).step_by(3) {
        for x0 in (0..width.saturating_sub(2)).step_by(3) {
            let sums = block_sums(data, width, x0, y0, 3, 3);
            let avg = [
                binarize_mean(sums[0], 9),
                binarize_mean(sums[1], 9),
                binarize_mean(sums[2], 9),
            ];

            let lum = (avg[0] as f64 + avg[1] as f64 + avg[2] as f64) / 3.0;
            let level = (lum * 9.0 / 255.0).round() as usize;

            let cells: [usize; 9] =
                std::array::from_fn(|n| 4 * ((y0 + n / 3) * width + x0 + n % 3));
            for &i in &cells {
                data[i..i + 3].fill(0xff);
            }
            for &cell in HALFTONE_ORDER.iter().take(9 - level.min(9)) {
                let i = cells[cell];
                data[i..i + 3].copy_from_slice(&avg);
            }
        }
    }
}
