//! Test images and constants.

use glitchery::PixelBuffer;

/// Seeds used by reproducibility tests
pub mod seeds {
    pub const PRIMARY: u64 = 0x5eed;
    pub const SECONDARY: u64 = 42;
}

/// Uniform opaque image
pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> PixelBuffer {
    PixelBuffer::filled(width, height, [rgb[0], rgb[1], rgb[2], 255])
}

/// Every byte distinct modulo 256, alpha included
pub fn numbered(width: usize, height: usize) -> PixelBuffer {
    let data = (0..width * height * 4).map(|i| (i % 256) as u8).collect();
    PixelBuffer::from_raw(width, height, data).expect("numbered fixture")
}

/// Opaque diagonal gradient with varied channels
pub fn gradient(width: usize, height: usize) -> PixelBuffer {
    let mut image = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
    let span = (width + height).max(1);
    for y in 0..height {
        for x in 0..width {
            let level = ((x + y) * 255 / span) as u8;
            image.set_pixel(x, y, [level, 255 - level, level / 2, 255]);
        }
    }
    image
}

/// Single row whose packed words run `len - 1` down to 0
pub fn descending_row(len: usize) -> PixelBuffer {
    let mut image = PixelBuffer::filled(len, 1, [0, 0, 0, 0]);
    let words: Vec<u32> = (0..len as u32).rev().collect();
    image.store_words(&words);
    image
}

/// Small YAML config with one named preset
pub const CONFIG_YAML: &str = "
seed: 1234
presets:
  crunchy:
    - effect: dither8Bit
      size: 2
    - effect: scanlines
      kind: 2
      size: 2
      option: 0
  negative:
    - effect: inverse
";
