#![allow(clippy::needless_range_loop)]

//! glitch-dither: destructive dithering on raw RGBA byte buffers.
//!
//! Every function works in place on a row-major RGBA slice of exactly
//! `width * height * 4` bytes and leaves the alpha channel alone. All
//! outputs are pure black/white per channel (except [`bitmask`], which
//! bands values instead).
//!
//! # Families
//!
//! | Family | Functions | Shape |
//! |--------|-----------|-------|
//! | Error diffusion | [`atkinson`], [`floyd_steinberg`], [`diffuse`] | kernel propagation over a raster scan |
//! | Ordered | [`ordered_gray`], [`ordered_color`] | fixed [`ThresholdMatrix`] tiled over the image |
//! | Block | [`block_average`], [`halftone`] | per-block mean, then fill |
//! | Noise | [`random_threshold_gray`], [`random_threshold_color`] | caller-provided threshold per pixel/channel |
//!
//! # Example
//!
//! ```
//! use glitch_dither::{ordered_gray, ThresholdMatrix};
//!
//! let mut pixels = vec![40, 40, 40, 255, 220, 220, 220, 255];
//! let matrix = ThresholdMatrix::by_index(0).unwrap();
//! ordered_gray(&mut pixels, 2, 1, matrix);
//! assert!(pixels.chunks(4).all(|px| px[0] == 0 || px[0] == 255));
//! ```
//!
//! # Error Propagation
//!
//! Diffusion keeps pending error as integer numerators in a sliding window
//! of rows ([`ErrorRows`]) and divides once per pixel, so channel values
//! never wrap while error is in flight. Atkinson passes on 6/8 of the
//! error, Floyd-Steinberg all of it.

pub mod block;
pub mod diffusion;
pub mod kernel;
pub mod noise;
pub mod ordered;

#[cfg(test)]
mod domain_tests;

/// Channel values strictly above this binarize to 255, the rest to 0.
pub const THRESHOLD: u8 = 127;

pub use block::{block_average, halftone, HALFTONE_ORDER};
pub use diffusion::{atkinson, diffuse, floyd_steinberg, ErrorRows};
pub use kernel::{Kernel, ATKINSON, FLOYD_STEINBERG};
pub use noise::{bitmask, random_threshold_color, random_threshold_gray};
pub use ordered::{ordered_color, ordered_gray, ThresholdMatrix, THRESHOLD_MATRICES};
