//! In-memory RGBA8 raster image.
//!
//! [`RgbaImage`] is the reference [`RasterImage`] implementation: a tightly
//! packed, row-major `Vec<u8>` with four bytes per pixel. Decoded RGB sources
//! keep an *inactive* alpha channel that reads as opaque until
//! [`RasterImage::activate_alpha`] is called.
//!
//! # Example
//!
//! ```rust
//! use aquamark_core::{Backend, RasterImage, RgbaImage, Rgba8, Size};
//!
//! let mut img = RgbaImage::filled(Size::new(4, 4), Rgba8::rgb(255, 0, 0), Backend::Scalar);
//! img.set_pixel(1, 1, Rgba8::rgb(0, 255, 0)).unwrap();
//! assert_eq!(img.get_pixel(1, 1).unwrap(), Rgba8::rgb(0, 255, 0));
//!
//! let half = img.resize(Size::new(2, 2)).unwrap();
//! assert_eq!(half.size(), Size::new(2, 2));
//! assert_eq!(img.size(), Size::new(4, 4));
//! ```

use crate::resize::{resize_rgba8, Filter};
use crate::{clip_to_canvas, Backend, Error, NativeOp, Point, RasterImage, Result, Rgba8, Size};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const CHANNELS: usize = 4;

/// Owned RGBA8 pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
    backend: Backend,
    alpha: bool,
    filter: Filter,
}

impl RgbaImage {
    /// Creates a fully transparent image.
    pub fn new(size: Size, backend: Backend) -> Self {
        Self::filled(size, Rgba8::TRANSPARENT, backend)
    }

    /// Creates an image with every pixel set to `px`.
    pub fn filled(size: Size, px: Rgba8, backend: Backend) -> Self {
        let count = size.area() as usize;
        let data = px.to_array().repeat(count);
        Self {
            width: size.width,
            height: size.height,
            data,
            backend,
            alpha: true,
            filter: Filter::default(),
        }
    }

    /// Wraps an existing RGBA8 buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>, backend: Backend) -> Result<Self> {
        let expected = checked_len(width, height, CHANNELS)?;
        if data.len() != expected {
            return Err(Error::BufferSize { expected, actual: data.len() });
        }
        Ok(Self {
            width,
            height,
            data,
            backend,
            alpha: true,
            filter: Filter::default(),
        })
    }

    /// Builds an image from packed RGB8 data. The alpha channel starts
    /// inactive.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8], backend: Backend) -> Result<Self> {
        let expected = checked_len(width, height, 3)?;
        if rgb.len() != expected {
            return Err(Error::BufferSize { expected, actual: rgb.len() });
        }
        let data = rgb
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect();
        Ok(Self {
            width,
            height,
            data,
            backend,
            alpha: false,
            filter: Filter::default(),
        })
    }

    /// Sets the filter used by [`RasterImage::resize`].
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the alpha channel is active.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    /// Raw RGBA8 bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image, returning the raw RGBA8 bytes.
    ///
    /// An inactive alpha channel is returned as opaque.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Iterates `(x, y, pixel)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba8)> + '_ {
        let width = self.width.max(1);
        let alpha = self.alpha;
        self.data.chunks_exact(CHANNELS).enumerate().map(move |(i, c)| {
            let px = Rgba8::new(c[0], c[1], c[2], if alpha { c[3] } else { 255 });
            ((i as u32) % width, (i as u32) / width, px)
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        Ok((y as usize * self.width as usize + x as usize) * CHANNELS)
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("backend", &self.backend)
            .field("alpha", &self.alpha)
            .finish()
    }
}

fn checked_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| Error::InvalidDimensions(format!("{}x{} overflows", width, height)))
}

impl RasterImage for RgbaImage {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn backend(&self) -> Backend {
        self.backend
    }

    fn get_pixel(&self, x: u32, y: u32) -> Result<Rgba8> {
        let i = self.index(x, y)?;
        let a = if self.alpha { self.data[i + 3] } else { 255 };
        Ok(Rgba8::new(self.data[i], self.data[i + 1], self.data[i + 2], a))
    }

    fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> Result<()> {
        let i = self.index(x, y)?;
        self.data[i..i + CHANNELS].copy_from_slice(&px.to_array());
        Ok(())
    }

    fn resize(&self, size: Size) -> Result<Self> {
        let data = resize_rgba8(
            &self.data,
            self.width as usize,
            self.height as usize,
            size.width as usize,
            size.height as usize,
            self.filter,
        )?;
        debug!(from = %self.size(), to = %size, filter = ?self.filter, "resized");
        Ok(Self {
            width: size.width,
            height: size.height,
            data,
            backend: self.backend,
            alpha: self.alpha,
            filter: self.filter,
        })
    }

    fn activate_alpha(&mut self) {
        if self.alpha {
            return;
        }
        for c in self.data.chunks_exact_mut(CHANNELS) {
            c[3] = 255;
        }
        self.alpha = true;
    }

    fn scale_alpha(&mut self, percent: u8) -> Result<()> {
        self.activate_alpha();
        let percent = percent.min(100) as u32;
        if percent == 100 {
            return Ok(());
        }
        let scale = |c: &mut [u8]| c[3] = (c[3] as u32 * percent / 100) as u8;

        #[cfg(feature = "parallel")]
        self.data.par_chunks_exact_mut(CHANNELS).for_each(scale);
        #[cfg(not(feature = "parallel"))]
        self.data.chunks_exact_mut(CHANNELS).for_each(scale);

        Ok(())
    }

    fn composite_bulk(&mut self, layer: &Self, at: Point, op: NativeOp) -> Result<()> {
        if !self.supports_native_composite(op) {
            return Err(Error::Unsupported(format!(
                "{:?} composite on {} backend",
                op, self.backend
            )));
        }
        let Some(clip) = clip_to_canvas(self.size(), layer.size(), at) else {
            trace!(?at, "bulk composite entirely off-canvas");
            return Ok(());
        };
        trace!(?op, ?clip, "bulk composite");

        let stride = self.width as usize * CHANNELS;
        let layer_stride = layer.width as usize * CHANNELS;
        let start = clip.dst_y as usize * stride;
        let end = (clip.dst_y + clip.height) as usize * stride;
        let dst_alpha = self.alpha;
        let src_alpha = layer.alpha;
        let layer_data = &layer.data;

        let blend_row = |(row, line): (usize, &mut [u8])| {
            let src_row = (clip.src_y as usize + row) * layer_stride;
            for col in 0..clip.width as usize {
                let d = (clip.dst_x as usize + col) * CHANNELS;
                let s = src_row + (clip.src_x as usize + col) * CHANNELS;
                let src = &layer_data[s..s + CHANNELS];
                let sa = if src_alpha { src[3] } else { 255 };
                let da = if dst_alpha { line[d + 3] } else { 255 };
                let out = composite_pixel(
                    [line[d], line[d + 1], line[d + 2], da],
                    [src[0], src[1], src[2], sa],
                    op,
                );
                line[d..d + CHANNELS].copy_from_slice(&out);
            }
        };

        #[cfg(feature = "parallel")]
        self.data[start..end].par_chunks_mut(stride).enumerate().for_each(blend_row);
        #[cfg(not(feature = "parallel"))]
        self.data[start..end].chunks_mut(stride).enumerate().for_each(blend_row);

        Ok(())
    }
}

/// Separable blend followed by source-over, straight alpha in and out.
///
/// `Cr = (sa(1-da)Cs + sa·da·B(Cb,Cs) + (1-sa)da·Cb) / ar`, `ar = sa + da(1-sa)`.
fn composite_pixel(dst: [u8; 4], src: [u8; 4], op: NativeOp) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let ar = sa + da * (1.0 - sa);
    if ar <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let cs = src[c] as f32 / 255.0;
        let cb = dst[c] as f32 / 255.0;
        let mixed = match op {
            NativeOp::Over => cs,
            NativeOp::Multiply => cs * cb,
            NativeOp::Screen => cs + cb - cs * cb,
        };
        let co = (sa * (1.0 - da) * cs + sa * da * mixed + (1.0 - sa) * da * cb) / ar;
        out[c] = (co * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (ar * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red(size: Size, backend: Backend) -> RgbaImage {
        RgbaImage::filled(size, Rgba8::rgb(255, 0, 0), backend)
    }

    #[test]
    fn test_from_raw_validates_length() {
        assert!(RgbaImage::from_raw(2, 2, vec![0; 16], Backend::Scalar).is_ok());
        assert!(matches!(
            RgbaImage::from_raw(2, 2, vec![0; 15], Backend::Scalar),
            Err(Error::BufferSize { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_pixel_access_bounds() {
        let mut img = red(Size::new(3, 2), Backend::Scalar);
        assert!(img.get_pixel(2, 1).is_ok());
        assert!(matches!(img.get_pixel(3, 0), Err(Error::OutOfBounds { x: 3, .. })));
        assert!(img.set_pixel(0, 2, Rgba8::BLACK).is_err());
    }

    #[test]
    fn test_rgb_alpha_inactive_until_activated() {
        let mut img = RgbaImage::from_rgb(1, 1, &[10, 20, 30], Backend::Scalar).unwrap();
        assert!(!img.has_alpha());
        assert_eq!(img.get_pixel(0, 0).unwrap(), Rgba8::rgb(10, 20, 30));
        img.activate_alpha();
        assert!(img.has_alpha());
        img.scale_alpha(50).unwrap();
        assert_eq!(img.get_pixel(0, 0).unwrap().a, 127);
    }

    #[test]
    fn test_resize_leaves_source_untouched() {
        let src = red(Size::new(8, 4), Backend::Accelerated);
        let before = src.clone();
        let scaled = src.resize(Size::new(4, 2)).unwrap();
        assert_eq!(src, before);
        assert_eq!(scaled.size(), Size::new(4, 2));
        assert_eq!(scaled.backend(), Backend::Accelerated);
        assert!(scaled.pixels().all(|(_, _, px)| px == Rgba8::rgb(255, 0, 0)));
    }

    #[test]
    fn test_native_capabilities() {
        let fast = red(Size::new(1, 1), Backend::Accelerated);
        let slow = red(Size::new(1, 1), Backend::Scalar);
        assert!(fast.supports_native_composite(NativeOp::Multiply));
        assert!(!slow.supports_native_composite(NativeOp::Over));
    }

    #[test]
    fn test_bulk_over_opaque_copies_layer() {
        let mut base = red(Size::new(4, 4), Backend::Accelerated);
        let layer = RgbaImage::filled(Size::new(2, 2), Rgba8::rgb(0, 255, 0), Backend::Accelerated);
        base.composite_bulk(&layer, Point::new(1, 1), NativeOp::Over).unwrap();

        for (x, y, px) in base.pixels() {
            let inside = (1..3).contains(&x) && (1..3).contains(&y);
            let expected = if inside { Rgba8::rgb(0, 255, 0) } else { Rgba8::rgb(255, 0, 0) };
            assert_eq!(px, expected, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn test_bulk_multiply_and_screen() {
        let mut base = RgbaImage::filled(Size::new(2, 1), Rgba8::rgb(255, 128, 0), Backend::Accelerated);
        let layer = RgbaImage::filled(Size::new(1, 1), Rgba8::rgb(0, 255, 255), Backend::Accelerated);
        base.composite_bulk(&layer, Point::new(0, 0), NativeOp::Multiply).unwrap();
        base.composite_bulk(&layer, Point::new(1, 0), NativeOp::Screen).unwrap();
        assert_eq!(base.get_pixel(0, 0).unwrap(), Rgba8::rgb(0, 128, 0));
        assert_eq!(base.get_pixel(1, 0).unwrap(), Rgba8::rgb(255, 255, 255));
    }

    #[test]
    fn test_bulk_half_alpha_over() {
        let mut base = RgbaImage::filled(Size::new(1, 1), Rgba8::rgb(0, 0, 0), Backend::Accelerated);
        let mut layer = RgbaImage::filled(Size::new(1, 1), Rgba8::rgb(200, 100, 50), Backend::Accelerated);
        layer.scale_alpha(50).unwrap();
        base.composite_bulk(&layer, Point::new(0, 0), NativeOp::Over).unwrap();
        let px = base.get_pixel(0, 0).unwrap();
        assert_eq!(px.a, 255);
        assert!((px.r as i32 - 100).abs() <= 1);
        assert!((px.g as i32 - 50).abs() <= 1);
    }

    #[test]
    fn test_bulk_clips_off_canvas() {
        let mut base = red(Size::new(3, 3), Backend::Accelerated);
        let layer = RgbaImage::filled(Size::new(2, 2), Rgba8::rgb(0, 0, 255), Backend::Accelerated);
        base.composite_bulk(&layer, Point::new(-1, 2), NativeOp::Over).unwrap();
        assert_eq!(base.get_pixel(0, 2).unwrap(), Rgba8::rgb(0, 0, 255));
        assert_eq!(base.get_pixel(1, 2).unwrap(), Rgba8::rgb(255, 0, 0));
        assert_eq!(base.get_pixel(0, 1).unwrap(), Rgba8::rgb(255, 0, 0));

        let before = base.clone();
        base.composite_bulk(&layer, Point::new(10, 10), NativeOp::Over).unwrap();
        assert_eq!(base, before);
    }

    #[test]
    fn test_bulk_rejected_on_scalar() {
        let mut base = red(Size::new(2, 2), Backend::Scalar);
        let layer = red(Size::new(1, 1), Backend::Scalar);
        assert!(matches!(
            base.composite_bulk(&layer, Point::new(0, 0), NativeOp::Over),
            Err(Error::Unsupported(_))
        ));
    }
}
