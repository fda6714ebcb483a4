//! The pixel buffer every effect operates on.
//!
//! A [`PixelBuffer`] owns `width * height * 4` bytes of row-major RGBA data
//! with a top-left origin. Effects address it either by byte
//! (`4 * (y * width + x) + channel`) or by packed word (`y * width + x`).
//! Words are composed with the fixed [`WORD_ORDER`], independent of the
//! host platform.

use crate::error::EffectError;

/// Byte order used to pack an RGBA pixel into a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOrder {
    /// R in the low byte, A in the high byte.
    LittleEndian,
    /// R in the high byte, A in the low byte.
    BigEndian,
}

/// The packing convention for the word view.
pub const WORD_ORDER: WordOrder = WordOrder::LittleEndian;

/// Pack RGBA bytes into a word using [`WORD_ORDER`].
#[inline]
pub const fn pack_word(px: [u8; 4]) -> u32 {
    match WORD_ORDER {
        WordOrder::LittleEndian => u32::from_le_bytes(px),
        WordOrder::BigEndian => u32::from_be_bytes(px),
    }
}

/// Unpack a word into RGBA bytes using [`WORD_ORDER`].
#[inline]
pub const fn unpack_word(word: u32) -> [u8; 4] {
    match WORD_ORDER {
        WordOrder::LittleEndian => word.to_le_bytes(),
        WordOrder::BigEndian => word.to_be_bytes(),
    }
}

/// Bits of a packed word holding the alpha channel.
pub const ALPHA_MASK: u32 = pack_word([0, 0, 0, 0xff]);

/// Rewrite every packed word of `bytes` in place.
///
/// `bytes` must hold whole pixels; a trailing partial pixel is left alone.
pub fn map_packed(bytes: &mut [u8], mut f: impl FnMut(u32) -> u32) {
    for px in bytes.chunks_exact_mut(4) {
        let word = pack_word([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&unpack_word(f(word)));
    }
}

/// Channel index within a pixel.
pub const RED: usize = 0;
pub const GREEN: usize = 1;
pub const BLUE: usize = 2;
pub const ALPHA: usize = 3;

/// A decoded RGBA image, mutated in place by effects.
///
/// The length invariant `data.len() == width * height * 4` holds for the
/// whole lifetime of the buffer; nothing in this crate resizes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap host-decoded RGBA bytes.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EffectError> {
        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(4));
        if expected != Some(data.len()) {
            return Err(EffectError::BufferSize {
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel is `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: rgba.repeat(width * height),
        }
    }

    /// Hand the bytes back to the host.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable byte view. The slice cannot change the buffer's length.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = 4 * (y * self.width + x);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = 4 * (y * self.width + x);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Copy the buffer out as packed words.
    pub fn to_words(&self) -> Vec<u32> {
        self.data
            .chunks_exact(4)
            .map(|px| pack_word([px[0], px[1], px[2], px[3]]))
            .collect()
    }

    /// Write packed words back over the buffer.
    ///
    /// # Panics
    ///
    /// Panics if `words.len()` is not the pixel count.
    pub fn store_words(&mut self, words: &[u32]) {
        assert_eq!(
            words.len(),
            self.pixel_count(),
            "word view must cover every pixel"
        );
        for (px, &word) in self.data.chunks_exact_mut(4).zip(words) {
            px.copy_from_slice(&unpack_word(word));
        }
    }

    /// Rewrite each packed word in place, one pixel at a time.
    ///
    /// For per-pixel word transforms; no word copy of the buffer is made.
    pub fn map_words(&mut self, f: impl FnMut(u32) -> u32) {
        map_packed(&mut self.data, f);
    }

    /// Run `f` over the word view and copy the result back.
    ///
    /// For effects that move words between pixels (sorts, rolls).
    ///
    /// `f` receives the words plus `(width, height)`.
    pub fn with_words<T>(&mut self, f: impl FnOnce(&mut [u32], usize, usize) -> T) -> T {
        let mut words = self.to_words();
        let result = f(&mut words, self.width, self.height);
        self.store_words(&words);
        result
    }
}
