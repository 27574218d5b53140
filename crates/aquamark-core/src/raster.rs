//! The raster image contract consumed by the compositing engine.
//!
//! The engine never decodes, encodes or owns files. It works against
//! [`RasterImage`], which exposes dimensions, per-pixel RGBA access, an
//! independent-copy resize, and an optional native bulk composite primitive
//! advertised through [`RasterImage::supports_native_composite`].
//!
//! Strategy selection always goes through that capability query, never
//! through the concrete image type.
//!
//! # Architecture
//!
//! ```text
//! RasterImage
//!     +-- RgbaImage { Backend::Accelerated }  bulk over/multiply/screen (rayon)
//!     +-- RgbaImage { Backend::Scalar }       per-pixel access only
//!     +-- (decoder-specific handles provided by callers)
//! ```

use crate::{Point, Result, Rgba8, Size};

/// Raster representation an image handle belongs to.
///
/// Images of different backends cannot be composited onto each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Bulk composite primitives available.
    #[default]
    Accelerated,
    /// Per-pixel access only.
    Scalar,
}

impl Backend {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Accelerated => "accelerated",
            Self::Scalar => "scalar",
        }
    }

    /// Native operations this backend implements.
    pub fn native_ops(&self) -> &'static [NativeOp] {
        match self {
            Self::Accelerated => &[NativeOp::Over, NativeOp::Multiply, NativeOp::Screen],
            Self::Scalar => &[],
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accelerated" | "bulk" | "native" => Ok(Self::Accelerated),
            "scalar" | "pixel" => Ok(Self::Scalar),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Operation code for a backend's bulk composite primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum NativeOp {
    /// Source-over alpha compositing.
    Over = 0,
    /// Multiply, then source-over.
    Multiply = 1,
    /// Screen, then source-over.
    Screen = 2,
}

/// An opened image the compositor can read and mutate.
///
/// Pixels are exchanged as straight-alpha [`Rgba8`] on a 0..=255 alpha scale;
/// implementations storing another alpha convention convert here.
pub trait RasterImage: Sized {
    /// Image dimensions.
    fn size(&self) -> Size;

    /// Raster representation of this handle.
    fn backend(&self) -> Backend;

    /// Reads the pixel at (x, y).
    fn get_pixel(&self, x: u32, y: u32) -> Result<Rgba8>;

    /// Writes the pixel at (x, y).
    fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> Result<()>;

    /// Returns an independent resampled copy; `self` is left unchanged.
    fn resize(&self, size: Size) -> Result<Self>;

    /// Whether [`composite_bulk`](Self::composite_bulk) implements `op`.
    fn supports_native_composite(&self, op: NativeOp) -> bool {
        self.backend().native_ops().contains(&op)
    }

    /// Makes the alpha channel authoritative. Images without one become
    /// fully opaque with a writable alpha channel.
    fn activate_alpha(&mut self) {}

    /// Multiplies every pixel's alpha by `percent / 100`, truncating.
    fn scale_alpha(&mut self, percent: u8) -> Result<()> {
        let percent = percent.min(100) as u32;
        let size = self.size();
        for y in 0..size.height {
            for x in 0..size.width {
                let px = self.get_pixel(x, y)?;
                let a = (px.a as u32 * percent / 100) as u8;
                self.set_pixel(x, y, px.with_alpha(a))?;
            }
        }
        Ok(())
    }

    /// Composites `layer` onto `self` with its top-left corner at `at`.
    ///
    /// Only called when [`supports_native_composite`](Self::supports_native_composite)
    /// returned `true` for `op`. `at` may lie partly or fully off-canvas;
    /// the primitive clips.
    fn composite_bulk(&mut self, layer: &Self, at: Point, op: NativeOp) -> Result<()>;
}
