//! Watermark orchestration for one base image or a set of size variants.
//!
//! [`WatermarkCompositor::compose`] sequences the whole operation for one
//! (base, watermark) pair:
//!
//! 1. resolve the blend mode (unknown keys fail before anything is touched)
//! 2. compute the scaled size
//! 3. resample the watermark into an owned copy
//! 4. compute the position
//! 5. composite
//!
//! The watermark source is only read, so the same handle can be reused for
//! every size variant of an upload.
//!
//! # Example
//!
//! ```rust
//! use aquamark_core::{Backend, RasterImage, RgbaImage, Rgba8, Size};
//! use aquamark_ops::{PlacementSettings, WatermarkCompositor};
//!
//! let settings = PlacementSettings {
//!     width: 10,
//!     opacity: 100,
//!     ..Default::default()
//! };
//! let logo = RgbaImage::filled(Size::new(20, 10), Rgba8::WHITE, Backend::Accelerated);
//! let mut photo = RgbaImage::filled(Size::new(64, 48), Rgba8::BLACK, Backend::Accelerated);
//!
//! let report = WatermarkCompositor::new(settings).compose(&mut photo, &logo).unwrap();
//! assert_eq!(report.scaled, Size::new(10, 5));
//! assert_eq!(photo.get_pixel(63 - 10, 47 - 10).unwrap(), Rgba8::WHITE);
//! ```

use crate::blend::BlendMode;
use crate::engine::{CompositeEngine, Strategy};
use crate::placement::{self, PlacementSettings};
use crate::registry::BlendModeRegistry;
use crate::{OpsError, OpsResult};
use aquamark_core::{clip_to_canvas, ClipRegion, Point, RasterImage, Size};
use tracing::{debug, warn};

/// What a successful compose call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeReport {
    /// Resolved blend mode.
    pub mode: BlendMode,
    /// Size the watermark was resampled to.
    pub scaled: Size,
    /// Top-left canvas position of the watermark.
    pub position: Point,
    /// Strategy the engine used.
    pub strategy: Strategy,
    /// Part of the base that was covered; `None` when fully off-canvas.
    pub clip: Option<ClipRegion>,
}

/// Result of one size variant in a batch.
#[derive(Debug)]
pub struct VariantOutcome {
    /// Caller-supplied variant name, e.g. `"thumbnail"`.
    pub name: String,
    /// Report, or the error that skipped this variant.
    pub result: OpsResult<CompositeReport>,
}

impl VariantOutcome {
    /// Whether the variant was watermarked.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Applies one settings record to any number of base images.
#[derive(Debug, Clone)]
pub struct WatermarkCompositor {
    settings: PlacementSettings,
    registry: BlendModeRegistry,
}

impl WatermarkCompositor {
    /// Creates a compositor; opacity is clamped to 0..=100.
    pub fn new(settings: PlacementSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            registry: BlendModeRegistry,
        }
    }

    /// Settings in effect.
    pub fn settings(&self) -> &PlacementSettings {
        &self.settings
    }

    /// Watermarks `base` in place.
    ///
    /// Fails without touching `base` on an unknown blend mode, mismatched
    /// backends or a degenerate size. Not reentrant on the same `base`.
    pub fn compose<I: RasterImage>(&self, base: &mut I, source: &I) -> OpsResult<CompositeReport> {
        let entry = self.registry.resolve(&self.settings.blend_mode)?;

        if base.backend() != source.backend() {
            return Err(OpsError::UnsupportedBackendCombination {
                base: base.backend(),
                watermark: source.backend(),
            });
        }

        let base_size = base.size();
        let scaled = placement::size(base_size, source.size(), &self.settings)?;
        let mut watermark = source.resize(scaled)?;
        let position = placement::position(base_size, scaled, &self.settings);
        let clip = clip_to_canvas(base_size, scaled, position);

        let strategy = CompositeEngine::new(entry).composite(
            base,
            &mut watermark,
            position,
            self.settings.opacity_percent(),
        )?;

        debug!(
            mode = %entry.mode,
            base = %base_size,
            %scaled,
            x = position.x,
            y = position.y,
            ?strategy,
            "watermark applied"
        );

        Ok(CompositeReport {
            mode: entry.mode,
            scaled,
            position,
            strategy,
            clip,
        })
    }

    /// Watermarks every variant with the same source.
    ///
    /// A failing variant is logged and reported; the remaining variants are
    /// still processed.
    pub fn compose_variants<'a, I, N>(
        &self,
        variants: impl IntoIterator<Item = (N, &'a mut I)>,
        source: &I,
    ) -> Vec<VariantOutcome>
    where
        I: RasterImage + 'a,
        N: Into<String>,
    {
        variants
            .into_iter()
            .map(|(name, base)| {
                let name = name.into();
                let result = self.compose(base, source);
                if let Err(e) = &result {
                    warn!(variant = %name, error = %e, "skipping size variant");
                }
                VariantOutcome { name, result }
            })
            .collect()
    }
}

/// One-shot [`WatermarkCompositor::compose`].
pub fn compose<I: RasterImage>(
    base: &mut I,
    source: &I,
    settings: &PlacementSettings,
) -> OpsResult<CompositeReport> {
    WatermarkCompositor::new(settings.clone()).compose(base, source)
}
