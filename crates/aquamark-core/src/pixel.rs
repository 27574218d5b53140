//! 8-bit RGBA pixel type and alpha-scale conversions.
//!
//! # Alpha convention
//!
//! Inside aquamark every alpha value is *straight coverage* on a 0..=255
//! scale: 0 is fully transparent, [`ALPHA_MAX`] is fully opaque. Backends that
//! store alpha differently convert at the [`RasterImage`](crate::RasterImage)
//! boundary. The common inverted 7-bit scale (0 = opaque, 127 = transparent)
//! is handled by [`Rgba8::from_inverted_alpha`] and
//! [`Rgba8::inverted_alpha`].
//!
//! ```
//! use aquamark_core::Rgba8;
//!
//! let px = Rgba8::from_inverted_alpha(10, 20, 30, 0, 127);
//! assert_eq!(px.a, 255);
//! let px = Rgba8::from_inverted_alpha(10, 20, 30, 127, 127);
//! assert_eq!(px.a, 0);
//! ```

/// Alpha value of a fully opaque pixel.
pub const ALPHA_MAX: u8 = 255;

/// An 8-bit straight-alpha RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha coverage, 0 = transparent.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a pixel from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque pixel.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, ALPHA_MAX)
    }

    /// Creates a pixel from `[r, g, b, a]`.
    #[inline]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Returns `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns `[r, g, b]`.
    #[inline]
    pub const fn color(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Replaces the color channels, keeping alpha.
    #[inline]
    pub const fn with_color(self, c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2], self.a)
    }

    /// Replaces alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// `true` when alpha is [`ALPHA_MAX`].
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == ALPHA_MAX
    }

    /// Converts from an inverted alpha scale where 0 is opaque and `max` is
    /// transparent.
    ///
    /// Values above `max` saturate to transparent. Rounds to nearest.
    pub fn from_inverted_alpha(r: u8, g: u8, b: u8, raw: u8, max: u8) -> Self {
        if max == 0 {
            return Self::rgb(r, g, b);
        }
        let raw = raw.min(max) as u32;
        let max = max as u32;
        let coverage = ((max - raw) * ALPHA_MAX as u32 + max / 2) / max;
        Self::new(r, g, b, coverage as u8)
    }

    /// Alpha on an inverted scale of `0..=max` (0 = opaque). Rounds to nearest.
    pub fn inverted_alpha(&self, max: u8) -> u8 {
        let transparency = (ALPHA_MAX - self.a) as u32;
        ((transparency * max as u32 + ALPHA_MAX as u32 / 2) / ALPHA_MAX as u32) as u8
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(c: [u8; 4]) -> Self {
        Self::from_array(c)
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(px: Rgba8) -> Self {
        px.to_array()
    }
}
