//! Per-channel blend functions.
//!
//! Each function combines one 8-bit base channel with the matching watermark
//! channel. Alpha and opacity are not applied here; the composite engine mixes
//! the blended value back over the base afterwards.
//!
//! All divisions truncate, so results are pixel-identical across platforms.
//!
//! # Modes
//!
//! - [`BlendMode::Opacity`] - Pass-through, pure alpha-over
//! - [`BlendMode::Multiply`] - `b * t / 255`
//! - [`BlendMode::Screen`] - `255 - (255 - b)(255 - t) / 255`
//! - [`BlendMode::Overlay`] - Multiply below mid-grey, screen above
//!
//! # Example
//!
//! ```rust
//! use aquamark_ops::blend::{multiply, screen, BlendMode};
//!
//! assert_eq!(multiply(255, 17), 17);
//! assert_eq!(screen(0, 17), 17);
//! assert_eq!("overlay".parse::<BlendMode>().unwrap(), BlendMode::Overlay);
//! ```

use crate::OpsError;
use serde::{Deserialize, Serialize};

/// Signature shared by every per-channel blend function.
pub type PixelBlendFn = fn(u8, u8) -> u8;

/// Blend mode for watermark compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Plain alpha-over using the watermark's own colors.
    #[default]
    Opacity,
    /// Darken by multiplication.
    Multiply,
    /// Lighten (inverse multiply).
    Screen,
    /// Contrast: multiply or screen depending on the base.
    Overlay,
}

impl BlendMode {
    /// Every defined mode, in registry order.
    pub const ALL: [BlendMode; 4] = [Self::Opacity, Self::Multiply, Self::Screen, Self::Overlay];

    /// Settings key of this mode.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
        }
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for BlendMode {
    type Err = OpsError;

    /// Keys are matched exactly; anything else is unsupported.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.key() == s)
            .ok_or_else(|| OpsError::UnsupportedBlendMode(s.to_string()))
    }
}

/// Pass-through: the watermark channel as-is.
#[inline]
pub fn opacity(_base: u8, top: u8) -> u8 {
    top
}

/// `floor(base * top / 255)`.
#[inline]
pub fn multiply(base: u8, top: u8) -> u8 {
    (base as u32 * top as u32 / 255) as u8
}

/// `255 - floor((255 - base) * (255 - top) / 255)`.
#[inline]
pub fn screen(base: u8, top: u8) -> u8 {
    255 - ((255 - base as u32) * (255 - top as u32) / 255) as u8
}

/// Multiply for `base < 128`, screen otherwise, both doubled.
#[inline]
pub fn overlay(base: u8, top: u8) -> u8 {
    let (b, t) = (base as u32, top as u32);
    if b < 128 {
        (2 * b * t / 255) as u8
    } else {
        255 - (2 * (255 - b) * (255 - t) / 255) as u8
    }
}

/// Blend function for `mode`.
pub fn blend_fn(mode: BlendMode) -> PixelBlendFn {
    match mode {
        BlendMode::Opacity => opacity,
        BlendMode::Multiply => multiply,
        BlendMode::Screen => screen,
        BlendMode::Overlay => overlay,
    }
}

/// Applies `f` to the three color channels of `base` and `top`.
#[inline]
pub fn blend_color(f: PixelBlendFn, base: [u8; 3], top: [u8; 3]) -> [u8; 3] {
    [f(base[0], top[0]), f(base[1], top[1]), f(base[2], top[2])]
}
