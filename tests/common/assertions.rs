//! Assertion helpers for tests.

use glitchery::PixelBuffer;
use pretty_assertions::assert_eq;

/// Assert two buffers have the same dimensions and byte length
pub fn assert_same_shape(actual: &PixelBuffer, expected: &PixelBuffer) {
    assert_eq!(
        (actual.width(), actual.height(), actual.len()),
        (expected.width(), expected.height(), expected.len()),
        "Buffer shape changed"
    );
}

/// Assert every colour channel is 0 or 255
pub fn assert_binary_rgb(image: &PixelBuffer) {
    for (i, px) in image.as_bytes().chunks_exact(4).enumerate() {
        assert!(
            px[..3].iter().all(|&c| c == 0 || c == 255),
            "Pixel {} is not binary: {:?}",
            i,
            px
        );
    }
}

/// Assert every pixel has alpha 255
pub fn assert_opaque(image: &PixelBuffer) {
    for (i, px) in image.as_bytes().chunks_exact(4).enumerate() {
        assert_eq!(px[3], 255, "Pixel {} is not opaque", i);
    }
}

/// Sorted copy of a row's packed pixels
pub fn sorted_row(image: &PixelBuffer, y: usize) -> Vec<[u8; 4]> {
    let mut row: Vec<_> = (0..image.width()).map(|x| image.pixel(x, y)).collect();
    row.sort_unstable();
    row
}

/// Sorted copy of a column's packed pixels
pub fn sorted_column(image: &PixelBuffer, x: usize) -> Vec<[u8; 4]> {
    let mut column: Vec<_> = (0..image.height()).map(|y| image.pixel(x, y)).collect();
    column.sort_unstable();
    column
}
