//! Error diffusion kernel definitions.
//!
//! Each kernel specifies how the quantization error of the current pixel is
//! handed to neighbours that the raster scan has not visited yet.

/// An error diffusion kernel.
///
/// Each entry is an offset `(dx, dy)` and a weight. A neighbour receives
/// `error * weight / divisor`.
///
/// # Error Propagation
///
/// The total error propagated is `sum(weights) / divisor`. Floyd-Steinberg
/// propagates all of it; Atkinson deliberately drops a quarter.
///
/// # Buffer Sizing
///
/// `max_dy` is how many rows ahead the kernel reaches, so the error buffer
/// needs `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries, in the order they are applied.
    ///
    /// - `dx`: horizontal offset (positive = right)
    /// - `dy`: vertical offset (always >= 0, rows below the current one)
    /// - `weight`: numerator of the share of error this neighbour receives
    pub entries: &'static [(i32, i32, u8)],

    /// Common denominator for all weights.
    pub divisor: u8,

    /// Largest `dy` in `entries`.
    pub max_dy: usize,
}

impl Kernel {
    /// Fraction of the quantization error this kernel passes on.
    pub fn propagation(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        total as f32 / self.divisor as f32
    }
}

/// Atkinson dithering kernel.
///
/// Six neighbours at 1/8 each, so 6/8 of the error survives and 2/8 is
/// discarded.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),  // right
        (1, 1, 1),  // bottom-right
        (2, 0, 1),  // two right
        (0, 1, 1),  // bottom
        (-1, 1, 1), // bottom-left
        (0, 2, 1),  // two below
    ],
    divisor: 8,
    max_dy: 2,
};

/// Floyd-Steinberg dithering kernel.
///
/// Four neighbours, 16/16 of the error is conserved.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (1, 1, 1),  // bottom-right
        (0, 1, 5),  // bottom
        (-1, 1, 3), // bottom-left
    ],
    divisor: 16,
    max_dy: 1,
};
