//! # aquamark-core
//!
//! Core raster types for watermark compositing.
//!
//! This crate provides the foundational types used by the aquamark engine:
//!
//! - [`Rgba8`] - Straight-alpha 8-bit pixel and alpha-scale conversions
//! - [`Point`], [`Size`], [`Rect`] - Placement geometry
//! - [`clip_to_canvas`] - Overlap of a placed layer with its canvas
//! - [`RasterImage`] - The image-handle contract the engine works against
//! - [`RgbaImage`] - In-memory implementation with two [`Backend`]s
//! - [`resize`] - Separable resampling filters
//!
//! ## Crate Structure
//!
//! ```text
//! aquamark-core (this crate)
//!    ^
//!    |
//!    +-- aquamark-ops (blend modes, placement, compositing)
//!    +-- aquamark-cli (PNG I/O, batch over size variants)
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Row-parallel bulk compositing via rayon (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod geometry;
pub mod image;
pub mod pixel;
pub mod raster;
pub mod resize;

pub use error::{Error, Result};
pub use geometry::{clip_to_canvas, ClipRegion, Point, Rect, Size};
pub use image::RgbaImage;
pub use pixel::{Rgba8, ALPHA_MAX};
pub use raster::{Backend, NativeOp, RasterImage};
pub use resize::Filter;
