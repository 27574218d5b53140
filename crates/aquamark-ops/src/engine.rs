//! Composite execution: native bulk primitive or manual pixel loop.
//!
//! The engine first clips the placed watermark to the base canvas, then
//! picks a strategy from the resolved [`BlendEntry`] and the base image's
//! capability flags:
//!
//! - **Native**: the mode has a [`NativeOp`] and the backend reports support.
//!   The watermark's alpha is activated, scaled by `opacity / 100` when below
//!   100, and handed to [`RasterImage::composite_bulk`].
//! - **Manual**: every pixel in the clipped rectangle is read, blended per
//!   channel and mixed back over the base:
//!
//!   ```text
//!   combined = (wm_alpha / 255) * (opacity / 100)
//!   out      = floor(blended * combined + base * (1 - combined))
//!   ```
//!
//!   evaluated in exact integer arithmetic. The base pixel's alpha is kept.
//!
//! A manual-path error mid-loop leaves the base partially blended; callers
//! needing atomicity composite onto a copy.

use crate::registry::{BlendEntry, BlendModeRegistry};
use crate::blend::{blend_color, BlendMode, PixelBlendFn};
use crate::{OpsError, OpsResult};
use aquamark_core::{clip_to_canvas, ClipRegion, NativeOp, Point, RasterImage, ALPHA_MAX};
use tracing::trace;

/// Denominator of the combined alpha weight: `ALPHA_MAX * 100`.
const WEIGHT_MAX: u32 = ALPHA_MAX as u32 * 100;

/// How a composite call was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Backend bulk primitive.
    Native(NativeOp),
    /// Per-pixel read-modify-write.
    Manual,
    /// Watermark lies entirely off-canvas; nothing was touched.
    Skipped,
}

/// Runs one blend mode over a placed watermark.
#[derive(Debug, Clone, Copy)]
pub struct CompositeEngine {
    entry: &'static BlendEntry,
}

impl CompositeEngine {
    /// Engine for a registry entry.
    pub fn new(entry: &'static BlendEntry) -> Self {
        Self { entry }
    }

    /// Engine for a typed mode.
    pub fn for_mode(mode: BlendMode) -> Self {
        Self::new(BlendModeRegistry.get(mode))
    }

    /// Mode this engine runs.
    pub fn mode(&self) -> BlendMode {
        self.entry.mode
    }

    /// Strategy that [`composite`](Self::composite) would use on `base`,
    /// ignoring clipping.
    pub fn strategy_for<I: RasterImage>(&self, base: &I) -> Strategy {
        match self.entry.native {
            Some(op) if base.supports_native_composite(op) => Strategy::Native(op),
            _ => Strategy::Manual,
        }
    }

    /// Composites `watermark` onto `base` with its top-left corner at `at`.
    ///
    /// `watermark` must be a copy the caller owns: the native path rewrites
    /// its alpha channel. `opacity` is a percentage and is clamped to 100.
    pub fn composite<I: RasterImage>(
        &self,
        base: &mut I,
        watermark: &mut I,
        at: Point,
        opacity: u8,
    ) -> OpsResult<Strategy> {
        if base.backend() != watermark.backend() {
            return Err(OpsError::UnsupportedBackendCombination {
                base: base.backend(),
                watermark: watermark.backend(),
            });
        }
        let opacity = opacity.min(100);

        let Some(clip) = clip_to_canvas(base.size(), watermark.size(), at) else {
            trace!(?at, base = %base.size(), watermark = %watermark.size(), "watermark off-canvas");
            return Ok(Strategy::Skipped);
        };

        let strategy = self.strategy_for(base);
        trace!(mode = %self.entry.mode, ?strategy, ?clip, opacity, "compositing");

        match strategy {
            Strategy::Native(op) => {
                watermark.activate_alpha();
                if opacity < 100 {
                    watermark.scale_alpha(opacity)?;
                }
                base.composite_bulk(watermark, at, op)?;
            }
            _ => composite_manual(base, watermark, &clip, opacity, self.entry.blender)?,
        }

        Ok(strategy)
    }
}

/// Per-pixel composite over an already clipped region.
pub fn composite_manual<I: RasterImage>(
    base: &mut I,
    watermark: &I,
    clip: &ClipRegion,
    opacity: u8,
    blender: PixelBlendFn,
) -> OpsResult<()> {
    let opacity = opacity.min(100) as u32;

    for y in 0..clip.height {
        for x in 0..clip.width {
            let (bx, by) = (clip.dst_x + x, clip.dst_y + y);
            let top = watermark.get_pixel(clip.src_x + x, clip.src_y + y)?;

            let weight = top.a as u32 * opacity;
            if weight == 0 {
                continue;
            }

            let under = base.get_pixel(bx, by)?;
            let blended = blend_color(blender, under.color(), top.color());
            let c = under.color();
            let mixed = [
                mix_channel(c[0], blended[0], weight),
                mix_channel(c[1], blended[1], weight),
                mix_channel(c[2], blended[2], weight),
            ];
            base.set_pixel(bx, by, under.with_color(mixed))?;
        }
    }

    Ok(())
}

/// `floor(blended * w + base * (1 - w))` with `w = weight / (255 * 100)`.
#[inline]
pub fn mix_channel(base: u8, blended: u8, weight: u32) -> u8 {
    let weight = weight.min(WEIGHT_MAX);
    ((blended as u32 * weight + base as u32 * (WEIGHT_MAX - weight)) / WEIGHT_MAX) as u8
}
