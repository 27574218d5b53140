//! Separable resampling of 8-bit RGBA buffers.
//!
//! Watermarks are rescaled to a different size for every image variant, so
//! the source is resampled into a fresh buffer and never touched.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - Fastest, no interpolation (blocky)
//! - [`Filter::Bilinear`] - Linear interpolation (smooth but blurry)
//! - [`Filter::Bicubic`] - Mitchell-Netravali cubic
//! - [`Filter::Lanczos3`] - Sinc-based, best for downscaling logos
//!
//! # Example
//!
//! ```rust
//! use aquamark_core::resize::{resize_rgba8, Filter};
//!
//! let src = vec![128u8; 8 * 8 * 4];
//! let dst = resize_rgba8(&src, 8, 8, 4, 2, Filter::Lanczos3).unwrap();
//! assert_eq!(dst.len(), 4 * 2 * 4);
//! assert!(dst.iter().all(|&v| v == 128));
//! ```

use crate::{Error, Result};

const CHANNELS: usize = 4;

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor.
    Nearest,
    /// Bilinear (triangle).
    Bilinear,
    /// Bicubic (Mitchell-Netravali, B = C = 1/3).
    Bicubic,
    /// Lanczos-3.
    #[default]
    Lanczos3,
}

impl Filter {
    /// Support radius of the kernel.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the kernel at distance `x`.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Filter::Nearest => {
                if x.abs() < 0.5 { 1.0 } else { 0.0 }
            }
            Filter::Bilinear => {
                let ax = x.abs();
                if ax < 1.0 { 1.0 - ax } else { 0.0 }
            }
            Filter::Bicubic => mitchell(x),
            Filter::Lanczos3 => {
                if x.abs() < 3.0 { sinc(x) * sinc(x / 3.0) } else { 0.0 }
            }
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "box" => Ok(Filter::Nearest),
            "bilinear" | "linear" | "triangle" => Ok(Filter::Bilinear),
            "bicubic" | "cubic" | "mitchell" => Ok(Filter::Bicubic),
            "lanczos3" | "lanczos" => Ok(Filter::Lanczos3),
            other => Err(format!("unknown filter '{}'", other)),
        }
    }
}

/// Mitchell-Netravali with B = C = 1/3, coefficients pre-expanded.
#[inline]
fn mitchell(x: f32) -> f32 {
    let t = x.abs();
    let p = if t < 1.0 {
        (7.0 * t - 12.0) * t * t + 16.0 / 3.0
    } else if t < 2.0 {
        ((-7.0 / 3.0 * t + 12.0) * t - 20.0) * t + 32.0 / 3.0
    } else {
        return 0.0;
    };
    p / 6.0
}

/// Normalized sinc, `sin(pi x) / (pi x)`.
#[inline]
fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        return 1.0;
    }
    let px = std::f32::consts::PI * x;
    px.sin() / px
}

/// Resamples a tightly packed RGBA8 buffer to `dst_w` x `dst_h`.
///
/// Same-size requests return an exact copy. Channels are filtered
/// independently (straight alpha), then rounded and clamped back to 8 bits.
pub fn resize_rgba8(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> Result<Vec<u8>> {
    let expected = src_w
        .checked_mul(src_h)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or_else(|| Error::InvalidDimensions("source dimensions overflow".into()))?;
    if src.len() != expected {
        return Err(Error::BufferSize { expected, actual: src.len() });
    }
    if src_w == 0 || src_h == 0 {
        return Err(Error::InvalidDimensions("source size must be > 0".into()));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(Error::InvalidDimensions(format!(
            "destination size must be > 0, got {}x{}",
            dst_w, dst_h
        )));
    }

    if src_w == dst_w && src_h == dst_h {
        return Ok(src.to_vec());
    }

    let src_f: Vec<f32> = src.iter().map(|&v| v as f32).collect();
    let temp = resize_horizontal(&src_f, src_w, src_h, dst_w, filter);
    let result = resize_vertical(&temp, dst_w, src_h, dst_h, filter);

    Ok(result
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect())
}

/// Horizontal pass.
fn resize_horizontal(src: &[f32], src_w: usize, src_h: usize, dst_w: usize, filter: Filter) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h * CHANNELS];
    let scale = src_w as f32 / dst_w as f32;
    let support = filter.support() * scale.max(1.0);

    for y in 0..src_h {
        for x in 0..dst_w {
            let center = (x as f32 + 0.5) * scale - 0.5;
            let left = ((center - support).floor() as isize).max(0) as usize;
            let right = (((center + support).ceil().max(0.0)) as usize).min(src_w - 1);

            let mut sum = [0.0f32; CHANNELS];
            let mut weight_sum = 0.0f32;

            for sx in left..=right {
                let w = filter.weight((sx as f32 - center) / scale.max(1.0));
                weight_sum += w;

                let src_idx = (y * src_w + sx) * CHANNELS;
                for c in 0..CHANNELS {
                    sum[c] += src[src_idx + c] * w;
                }
            }

            let dst_idx = (y * dst_w + x) * CHANNELS;
            if weight_sum.abs() > 1e-8 {
                for c in 0..CHANNELS {
                    dst[dst_idx + c] = sum[c] / weight_sum;
                }
            } else {
                // Kernel missed every tap; fall back to the nearest sample.
                let sx = (center.round().max(0.0) as usize).min(src_w - 1);
                let src_idx = (y * src_w + sx) * CHANNELS;
                dst[dst_idx..dst_idx + CHANNELS].copy_from_slice(&src[src_idx..src_idx + CHANNELS]);
            }
        }
    }

    dst
}

/// Vertical pass.
fn resize_vertical(src: &[f32], src_w: usize, src_h: usize, dst_h: usize, filter: Filter) -> Vec<f32> {
    let mut dst = vec![0.0f32; src_w * dst_h * CHANNELS];
    let scale = src_h as f32 / dst_h as f32;
    let support = filter.support() * scale.max(1.0);

    for y in 0..dst_h {
        let center = (y as f32 + 0.5) * scale - 0.5;
        let top = ((center - support).floor() as isize).max(0) as usize;
        let bottom = (((center + support).ceil().max(0.0)) as usize).min(src_h - 1);

        for x in 0..src_w {
            let mut sum = [0.0f32; CHANNELS];
            let mut weight_sum = 0.0f32;

            for sy in top..=bottom {
                let w = filter.weight((sy as f32 - center) / scale.max(1.0));
                weight_sum += w;

                let src_idx = (sy * src_w + x) * CHANNELS;
                for c in 0..CHANNELS {
                    sum[c] += src[src_idx + c] * w;
                }
            }

            let dst_idx = (y * src_w + x) * CHANNELS;
            if weight_sum.abs() > 1e-8 {
                for c in 0..CHANNELS {
                    dst[dst_idx + c] = sum[c] / weight_sum;
                }
            } else {
                let sy = (center.round().max(0.0) as usize).min(src_h - 1);
                let src_idx = (sy * src_w + x) * CHANNELS;
                dst[dst_idx..dst_idx + CHANNELS].copy_from_slice(&src[src_idx..src_idx + CHANNELS]);
            }
        }
    }

    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_filter_weights() {
        assert_relative_eq!(Filter::Nearest.weight(0.0), 1.0);
        assert_relative_eq!(Filter::Nearest.weight(0.6), 0.0);
        assert_relative_eq!(Filter::Bilinear.weight(0.5), 0.5);
        assert_relative_eq!(Filter::Lanczos3.weight(0.0), 1.0);
        assert_relative_eq!(Filter::Lanczos3.weight(3.5), 0.0);
    }

    #[test]
    fn test_kernel_shapes() {
        assert_relative_eq!(Filter::Bicubic.weight(0.0), 8.0 / 9.0, epsilon = 1e-6);
        assert_relative_eq!(Filter::Bicubic.weight(1.0), 1.0 / 18.0, epsilon = 1e-6);
        assert_relative_eq!(Filter::Bicubic.weight(-1.0), 1.0 / 18.0, epsilon = 1e-6);
        assert_relative_eq!(Filter::Bicubic.weight(2.0), 0.0, epsilon = 1e-6);
        for x in [1.0f32, 2.0, -1.0] {
            assert_abs_diff_eq!(Filter::Lanczos3.weight(x), 0.0, epsilon = 1e-6);
        }
        assert!(Filter::Lanczos3.weight(1.5) < 0.0);
    }

    #[test]
    fn test_filter_names() {
        assert_eq!("Lanczos".parse::<Filter>().unwrap(), Filter::Lanczos3);
        assert_eq!("box".parse::<Filter>().unwrap(), Filter::Nearest);
        assert!("sinc".parse::<Filter>().is_err());
    }

    #[test]
    fn test_same_size_is_exact_copy() {
        let src: Vec<u8> = (0..(3 * 2 * 4)).map(|v| (v * 7) as u8).collect();
        let dst = resize_rgba8(&src, 3, 2, 3, 2, Filter::Lanczos3).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_constant_stays_constant() {
        let src = vec![200u8; 16 * 16 * 4];
        for filter in [Filter::Nearest, Filter::Bilinear, Filter::Bicubic, Filter::Lanczos3] {
            let up = resize_rgba8(&src, 16, 16, 40, 24, filter).unwrap();
            assert_eq!(up.len(), 40 * 24 * 4);
            assert!(up.iter().all(|&v| v == 200), "{:?} upscale drifted", filter);

            let down = resize_rgba8(&src, 16, 16, 5, 3, filter).unwrap();
            assert!(down.iter().all(|&v| v == 200), "{:?} downscale drifted", filter);
        }
    }

    #[test]
    fn test_rejects_zero_destination() {
        let src = vec![0u8; 4 * 4 * 4];
        assert!(matches!(
            resize_rgba8(&src, 4, 4, 0, 4, Filter::Bilinear),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_rejects_short_buffer() {
        let src = vec![0u8; 10];
        assert!(matches!(
            resize_rgba8(&src, 4, 4, 2, 2, Filter::Bilinear),
            Err(Error::BufferSize { expected: 64, actual: 10 })
        ));
    }
}
