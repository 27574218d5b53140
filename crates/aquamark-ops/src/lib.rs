//! # aquamark-ops
//!
//! Watermark placement and blend-mode compositing.
//!
//! This crate turns a settings record and two raster handles into a
//! watermarked base image.
//!
//! # Modules
//!
//! - [`blend`] - Per-channel blend functions
//! - [`registry`] - Blend-mode lookup with native-op capabilities
//! - [`placement`] - Watermark sizing and anchor positioning
//! - [`engine`] - Native bulk vs. manual per-pixel compositing
//! - [`compositor`] - End-to-end orchestration and size-variant batches
//! - [`settings`] - YAML settings document
//!
//! # Example
//!
//! ```rust
//! use aquamark_core::{Backend, RasterImage, RgbaImage, Rgba8, Size};
//! use aquamark_ops::{compose, Anchor, PlacementSettings};
//!
//! let settings = PlacementSettings {
//!     position: Anchor::TopLeft,
//!     offset_x: 0,
//!     offset_y: 0,
//!     width: 2,
//!     height: 2,
//!     opacity: 100,
//!     blend_mode: "multiply".into(),
//!     ..Default::default()
//! };
//!
//! let mut base = RgbaImage::filled(Size::new(4, 4), Rgba8::rgb(255, 0, 0), Backend::Scalar);
//! let logo = RgbaImage::filled(Size::new(2, 2), Rgba8::rgb(0, 255, 0), Backend::Scalar);
//!
//! compose(&mut base, &logo, &settings).unwrap();
//! assert_eq!(base.get_pixel(0, 0).unwrap(), Rgba8::rgb(0, 0, 0));
//! assert_eq!(base.get_pixel(3, 3).unwrap(), Rgba8::rgb(255, 0, 0));
//! ```
//!
//! ## Loading settings
//!
//! ```rust,ignore
//! use aquamark_ops::{WatermarkCompositor, WatermarkSettings};
//!
//! let settings = WatermarkSettings::from_yaml_file("watermark.yaml")?;
//! let compositor = WatermarkCompositor::new(settings.placement);
//! let outcomes = compositor.compose_variants(variants, &logo);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blend;
pub mod compositor;
pub mod engine;
pub mod placement;
pub mod registry;
pub mod settings;

pub use error::{OpsError, OpsResult};
pub use blend::{BlendMode, PixelBlendFn};
pub use compositor::{compose, CompositeReport, VariantOutcome, WatermarkCompositor};
pub use engine::{CompositeEngine, Strategy};
pub use placement::{Align, Anchor, PlacementSettings, Unit};
pub use registry::{BlendEntry, BlendModeRegistry};
pub use settings::WatermarkSettings;
