//! Packed RGB565 colors
//!
//! This module defines the [`Color`] type used throughout the driver: a 16-bit
//! value with 5 bits of red, 6 bits of green and 5 bits of blue, sent to the
//! controller most significant byte first.
//!
//! ## Color Representation
//!
//! | Bits  | Channel |
//! |-------|---------|
//! | 15-11 | Red     |
//! | 10-5  | Green   |
//! | 4-0   | Blue    |
//!
//! Packing an 8-bit-per-channel triple truncates each channel to its top
//! 5/6/5 bits. Unpacking recovers those bits left-aligned, so the round trip
//! is lossy.
//!
//! ## Example
//!
//! ```
//! use st7789_panel::Color;
//!
//! let orange = Color::from_rgb(255, 165, 0);
//! assert_eq!(orange.raw(), 0xFD20);
//! assert_eq!(orange.to_be_bytes(), [0xFD, 0x20]);
//!
//! let (r, g, b) = orange.to_rgb();
//! assert_eq!((r, g, b), (0xF8, 0xA4, 0x00));
//! ```

/// A packed RGB565 color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Color(u16);

impl Color {
    /// Black (0x0000)
    pub const BLACK: Self = Self(0x0000);
    /// White (0xFFFF)
    pub const WHITE: Self = Self(0xFFFF);
    /// Red (0xF800)
    pub const RED: Self = Self(0xF800);
    /// Green (0x07E0)
    pub const GREEN: Self = Self(0x07E0);
    /// Blue (0x001F)
    pub const BLUE: Self = Self(0x001F);
    /// Yellow (0xFFE0)
    pub const YELLOW: Self = Self(0xFFE0);
    /// Cyan (0x07FF)
    pub const CYAN: Self = Self(0x07FF);
    /// Magenta (0xF81F)
    pub const MAGENTA: Self = Self(0xF81F);
    /// Orange (0xFD20)
    pub const ORANGE: Self = Self(0xFD20);
    /// Pink (0xFC18)
    pub const PINK: Self = Self(0xFC18);
    /// Purple (0x8010)
    pub const PURPLE: Self = Self(0x8010);
    /// Brown (0xA145)
    pub const BROWN: Self = Self(0xA145);
    /// Gray (0x8410)
    pub const GRAY: Self = Self(0x8410);
    /// Light gray (0xC618)
    pub const LIGHTGRAY: Self = Self(0xC618);
    /// Dark gray (0x4208)
    pub const DARKGRAY: Self = Self(0x4208);

    /// Wrap an already packed RGB565 value
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Get the packed RGB565 value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Pack an 8-bit-per-channel triple, truncating to 5/6/5 bits
    ///
    /// ```
    /// use st7789_panel::Color;
    ///
    /// assert_eq!(Color::from_rgb(255, 255, 255), Color::WHITE);
    /// assert_eq!(Color::from_rgb(7, 3, 7), Color::BLACK);
    /// ```
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Unpack into 8-bit channels
    ///
    /// Each channel holds the packed bits in its most significant positions;
    /// the low bits are zero.
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 8) & 0xF8) as u8;
        let g = ((self.0 >> 3) & 0xFC) as u8;
        let b = ((self.0 << 3) & 0xF8) as u8;
        (r, g, b)
    }

    /// Bytes in wire order (high byte first)
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Linear per-channel interpolation towards `other`
    ///
    /// `ratio` is clamped: `<= 0.0` returns `self`, `>= 1.0` returns `other`.
    /// The mix happens on the unpacked channels and is not gamma-aware.
    ///
    /// ```
    /// use st7789_panel::Color;
    ///
    /// let mid = Color::WHITE.interpolate(Color::BLACK, 0.5);
    /// assert_eq!(mid.to_rgb(), (0x78, 0x7C, 0x78));
    /// ```
    pub fn interpolate(self, other: Self, ratio: f32) -> Self {
        if ratio <= 0.0 {
            return self;
        }
        if ratio >= 1.0 {
            return other;
        }

        let (r1, g1, b1) = self.to_rgb();
        let (r2, g2, b2) = other.to_rgb();
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * ratio) as u8;

        Self::from_rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
    }

    /// Fixed 50/50 mix of two colors, used to soften scaled glyph edges
    pub fn blend(self, other: Self) -> Self {
        self.interpolate(other, 0.5)
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Color> for u16 {
    fn from(color: Color) -> Self {
        color.0
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::Rgb565> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::Rgb565) -> Self {
        use embedded_graphics_core::pixelcolor::raw::RawU16;
        use embedded_graphics_core::prelude::RawData;

        Self(RawU16::from(color).into_inner())
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics_core::pixelcolor::Rgb565 {
    fn from(color: Color) -> Self {
        use embedded_graphics_core::pixelcolor::raw::RawU16;

        Self::from(RawU16::new(color.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_named_colors_match_packing() {
        assert_eq!(Color::from_rgb(255, 0, 0), Color::RED);
        assert_eq!(Color::from_rgb(0, 255, 0), Color::GREEN);
        assert_eq!(Color::from_rgb(0, 0, 255), Color::BLUE);
        assert_eq!(Color::from_rgb(255, 255, 0), Color::YELLOW);
        assert_eq!(Color::from_rgb(128, 128, 128), Color::GRAY);
    }

    #[test]
    fn test_wire_order_is_big_endian() {
        assert_eq!(Color::RED.to_be_bytes(), [0xF8, 0x00]);
        assert_eq!(Color::BLUE.to_be_bytes(), [0x00, 0x1F]);
    }

    #[test]
    fn test_interpolate_endpoints() {
        assert_eq!(Color::RED.interpolate(Color::BLUE, 0.0), Color::RED);
        assert_eq!(Color::RED.interpolate(Color::BLUE, -3.0), Color::RED);
        assert_eq!(Color::RED.interpolate(Color::BLUE, 1.0), Color::BLUE);
        assert_eq!(Color::RED.interpolate(Color::BLUE, 7.5), Color::BLUE);
    }

    #[test]
    fn test_blend_is_halfway() {
        // 0xF8 -> 0x00 at 0.5 gives 0x7C, which packs to 0x78
        let blend = Color::RED.blend(Color::BLACK);
        assert_eq!(blend.to_rgb(), (0x78, 0x00, 0x00));
        assert_eq!(Color::BLACK.blend(Color::BLACK), Color::BLACK);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_rgb565_conversion_keeps_bits() {
        use embedded_graphics_core::pixelcolor::{Rgb565, RgbColor};

        assert_eq!(Color::from(Rgb565::RED), Color::RED);
        assert_eq!(Rgb565::from(Color::CYAN), Rgb565::CYAN);
        assert_eq!(Color::from(Rgb565::from(Color::BROWN)), Color::BROWN);
    }

    proptest! {
        #[test]
        fn prop_unpack_recovers_top_bits(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let (r2, g2, b2) = Color::from_rgb(r, g, b).to_rgb();
            prop_assert_eq!(r2, r & 0xF8);
            prop_assert_eq!(g2, g & 0xFC);
            prop_assert_eq!(b2, b & 0xF8);
        }

        #[test]
        fn prop_repack_is_stable(raw in any::<u16>()) {
            let (r, g, b) = Color::from_raw(raw).to_rgb();
            prop_assert_eq!(Color::from_rgb(r, g, b).raw(), raw);
        }
    }
}
