//! Noise-threshold dithers and bitmask banding.
//!
//! The noise dithers take the threshold source as a closure so the caller
//! decides where randomness comes from (seeded or not).

/// Grayscale noise dither.
///
/// Each pixel's `((R + G + B) / 3) mod 255` is compared against one fresh
/// threshold; below it gives black, otherwise white.
pub fn random_threshold_gray(data: &mut [u8], mut threshold: impl FnMut() -> u8) {
    for px in data.chunks_exact_mut(4) {
        let scaled = ((px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0) % 255.0;
        let val = if scaled < threshold() as f64 { 0 } else { 0xff };
        px[..3].fill(val);
    }
}

/// Full-colour noise dither: one threshold draw per channel, in R, G, B order.
pub fn random_threshold_color(data: &mut [u8], mut threshold: impl FnMut() -> u8) {
    for px in data.chunks_exact_mut(4) {
        for value in &mut px[..3] {
            *value = if *value < threshold() { 0 } else { 0xff };
        }
    }
}

/// OR each colour channel with `mask`; alpha is untouched.
pub fn bitmask(data: &mut [u8], mask: u8) {
    for px in data.chunks_exact_mut(4) {
        px[0] |= mask;
        px[1] |= mask;
        px[2] |= mask;
    }
}
