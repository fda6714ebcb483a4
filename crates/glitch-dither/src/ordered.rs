//! Ordered (threshold matrix) dithering.
//!
//! A pixel value is scaled to the matrix rank range with `value * 17 / 255`
//! and compared against the rank at `(x mod N, y mod N)`: below the rank
//! gives 0, otherwise 255. Matrices are indexed `[x][y]`.

/// A fixed square threshold matrix of ranks in `1..=N²`.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdMatrix {
    ranks: &'static [&'static [u8]],
}

/// Order-3 threshold matrix (index 0).
pub const BAYER_3: ThresholdMatrix = ThresholdMatrix {
    ranks: &[&[3, 7, 4], &[6, 1, 9], &[2, 8, 5]],
};

/// Order-4 Bayer matrix (index 1).
pub const BAYER_4: ThresholdMatrix = ThresholdMatrix {
    ranks: &[
        &[1, 9, 3, 11],
        &[13, 5, 15, 7],
        &[4, 12, 2, 10],
        &[16, 8, 14, 6],
    ],
};

/// Order-8 Bayer matrix (index 2).
pub const BAYER_8: ThresholdMatrix = ThresholdMatrix {
    ranks: &[
        &[1, 49, 13, 61, 4, 52, 16, 64],
        &[33, 17, 45, 29, 36, 20, 48, 32],
        &[9, 57, 5, 53, 12, 60, 8, 56],
        &[41, 25, 37, 21, 44, 28, 40, 24],
        &[3, 51, 15, 63, 2, 50, 14, 62],
        &[35, 19, 47, 31, 34, 18, 46, 30],
        &[11, 59, 7, 55, 10, 58, 6, 54],
        &[43, 27, 39, 23, 42, 26, 38, 22],
    ],
};

/// All selectable matrices, in selector order.
pub const THRESHOLD_MATRICES: [ThresholdMatrix; 3] = [BAYER_3, BAYER_4, BAYER_8];

impl ThresholdMatrix {
    /// Look up a matrix by selector (0: 3×3, 1: 4×4, 2: 8×8).
    pub fn by_index(index: usize) -> Option<&'static ThresholdMatrix> {
        match index {
            0 => Some(&BAYER_3),
            1 => Some(&BAYER_4),
            2 => Some(&BAYER_8),
            _ => None,
        }
    }

    /// Matrix order N.
    #[inline]
    pub fn order(&self) -> usize {
        self.ranks.len()
    }

    /// Rank at pixel `(x, y)`, tiled over the image.
    #[inline]
    pub fn rank(&self, x: usize, y: usize) -> u8 {
        let n = self.order();
        self.ranks[x % n][y % n]
    }

    #[inline]
    fn threshold(&self, value: f64, x: usize, y: usize) -> u8 {
        let scaled = value * 17.0 / 255.0;
        if scaled < self.rank(x, y) as f64 {
            0
        } else {
            0xff
        }
    }
}

/// Grayscale ordered dither using `0.3R + 0.59G + 0.11B` luminance.
///
/// The result is written to all three colour channels.
pub fn ordered_gray(data: &mut [u8], width: usize, height: usize, matrix: &ThresholdMatrix) {
    for y in 0..height {
        for x in 0..width {
            let i = 4 * (y * width + x);
            let gray =
                0.3 * data[i] as f64 + 0.59 * data[i + 1] as f64 + 0.11 * data[i + 2] as f64;
            let val = matrix.threshold(gray, x, y);
            data[i] = val;
            data[i + 1] = val;
            data[i + 2] = val;
        }
    }
}

/// Full-colour ordered dither: each channel is compared independently.
pub fn ordered_color(data: &mut [u8], width: usize, height: usize, matrix: &ThresholdMatrix) {
    for y in 0..height {
        for x in 0..width {
            let i = 4 * (y * width + x);
            for c in 0..3 {
                data[i + c] = matrix.threshold(data[i + c] as f64, x, y);
            }
        }
    }
}
