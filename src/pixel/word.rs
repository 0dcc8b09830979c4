//! # Colors and Pixel Words
//!
//! A [`Color`] is one pixel's channels by name. A [`PixelWord`] is the same four
//! bytes viewed as a big-endian 32-bit ARGB integer:
//!
//! ```text
//! byte:    0      1     2      3
//!        alpha   red  green  blue
//! ```
//!
//! Bytes 1..=3 are the payload slots. Byte 0 is never payload.

/// Number of payload bytes a single carrier pixel holds.
pub const PAYLOAD_SLOTS: usize = 3;

/// Alpha value written when carrier pixels are revealed.
pub const MARKER_ALPHA: u8 = u8::MAX;

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with the alpha channel replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Big-endian ARGB view of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelWord([u8; 4]);

impl PixelWord {
    /// Pack channels into a word: `a` lands in byte 0, `b` in byte 3.
    pub const fn pack(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self([a, r, g, b])
    }

    /// Inverse of [`PixelWord::pack`], returning `(a, r, g, b)`.
    pub const fn unpack(self) -> (u8, u8, u8, u8) {
        let [a, r, g, b] = self.0;
        (a, r, g, b)
    }

    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub const fn alpha(self) -> u8 {
        self.0[0]
    }

    /// Payload byte at `slot` (0 = red, 1 = green, 2 = blue).
    ///
    /// # Panics
    /// If `slot >= PAYLOAD_SLOTS`. The stream cursor never produces such a slot.
    pub(crate) fn payload(self, slot: usize) -> u8 {
        assert!(slot < PAYLOAD_SLOTS, "payload slot {slot} out of range");
        self.0[slot + 1]
    }

    pub(crate) fn set_payload(&mut self, slot: usize, value: u8) {
        assert!(slot < PAYLOAD_SLOTS, "payload slot {slot} out of range");
        self.0[slot + 1] = value;
    }
}

impl From<Color> for PixelWord {
    fn from(c: Color) -> Self {
        PixelWord::pack(c.a, c.r, c.g, c.b)
    }
}

impl From<PixelWord> for Color {
    fn from(word: PixelWord) -> Self {
        let (a, r, g, b) = word.unpack();
        Color { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_places_alpha_in_high_byte() {
        let word = PixelWord::pack(0x11, 0x22, 0x33, 0x44);
        assert_eq!(word.to_u32(), 0x1122_3344);
        assert_eq!(word.alpha(), 0x11);
        assert_eq!(PixelWord::from_u32(0x1122_3344), word);
    }

    #[test]
    fn test_payload_slots_map_to_rgb() {
        let word = PixelWord::from(Color::rgba(1, 2, 3, 0));
        assert_eq!(
            [word.payload(0), word.payload(1), word.payload(2)],
            [1, 2, 3]
        );

        let mut word = word;
        word.set_payload(1, 0xAB);
        assert_eq!(Color::from(word), Color::rgba(1, 0xAB, 3, 0));
    }

    #[test]
    #[should_panic]
    fn test_alpha_is_not_a_payload_slot() {
        PixelWord::default().payload(3);
    }
}
