//! Watermark sizing and anchoring.
//!
//! Turns abstract placement settings (named anchor, px/percent units,
//! auto-aspect height) into an exact scaled size and canvas position.
//!
//! # Sizing
//!
//! 1. Percent sizes are taken from the base image: `w = floor(base_w * width / 100)`,
//!    `h = height > 0 ? floor(base_h * height / 100) : 0`. Pixel sizes are used as-is.
//! 2. A zero height is derived from the source aspect: `h = round(w / aspect)`.
//! 3. A zero width (only when `width` itself is 0) is derived likewise:
//!    `w = round(h * aspect)`.
//!
//! # Anchors
//!
//! ```text
//!  top-left      top-center      top-right
//!  middle-left   middle-center   middle-right
//!  bottom-left   bottom-center   bottom-right
//! ```
//!
//! Each axis resolves to `0`, `floor((base - scaled) / 2)` or `base - scaled`.
//! The offset (px or percent of the base dimension, floored) then moves the
//! watermark inward from its anchored edge: it is added on start- and
//! center-aligned axes and subtracted on end-aligned ones, so a positive
//! offset acts as a margin for every anchor. The result may lie partly or
//! fully off-canvas.
//!
//! # Example
//!
//! ```rust
//! use aquamark_core::{Point, Size};
//! use aquamark_ops::placement::{position, PlacementSettings};
//!
//! let settings = PlacementSettings::default(); // bottom-right, 10px offset
//! let at = position(Size::new(1000, 1000), Size::new(100, 50), &settings);
//! assert_eq!(at, Point::new(890, 940));
//! ```

use crate::{OpsError, OpsResult};
use aquamark_core::{Point, Size};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Unit for offsets and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Absolute pixels.
    #[default]
    #[serde(rename = "px")]
    Px,
    /// Percent of the base image dimension on the same axis.
    #[serde(rename = "%", alias = "percent")]
    Percent,
}

impl Unit {
    /// Resolves `value` against `base_dim`, flooring percentages.
    #[inline]
    pub fn resolve(&self, value: i64, base_dim: u32) -> i64 {
        match self {
            Unit::Px => value,
            Unit::Percent => (base_dim as i64).saturating_mul(value).div_euclid(100),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Unit::Px => "px",
            Unit::Percent => "%",
        })
    }
}

impl std::str::FromStr for Unit {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "px" => Ok(Unit::Px),
            "%" | "percent" => Ok(Unit::Percent),
            other => Err(OpsError::Settings(format!("unknown unit '{}'", other))),
        }
    }
}

/// Alignment of the watermark along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    /// Flush with the left/top edge.
    Start,
    /// Centered, rounding toward the start.
    Center,
    /// Flush with the right/bottom edge.
    End,
}

impl Align {
    /// Coordinate of the watermark's leading edge.
    #[inline]
    pub fn offset(&self, base_dim: u32, scaled_dim: u32) -> i64 {
        let free = base_dim as i64 - scaled_dim as i64;
        match self {
            Align::Start => 0,
            Align::Center => free.div_euclid(2),
            Align::End => free,
        }
    }

    /// Moves `coord` by `offset` away from the aligned edge, saturating.
    #[inline]
    pub fn shift(&self, coord: i64, offset: i64) -> i64 {
        match self {
            Align::Start | Align::Center => coord.saturating_add(offset),
            Align::End => coord.saturating_sub(offset),
        }
    }
}

/// One of the nine named canvas anchors.
///
/// Parsing is lenient: unknown keys fall back to [`Anchor::BottomRight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Anchor {
    /// Top-left corner.
    TopLeft,
    /// Middle of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Middle of the left edge.
    MiddleLeft,
    /// Canvas center.
    MiddleCenter,
    /// Middle of the right edge.
    MiddleRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Middle of the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    #[default]
    BottomRight,
}

impl Anchor {
    /// All anchors, row-major.
    pub const ALL: [Anchor; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleCenter,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Settings key, e.g. `"middle-center"`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::MiddleLeft => "middle-left",
            Self::MiddleCenter => "middle-center",
            Self::MiddleRight => "middle-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Lenient lookup; unrecognized keys resolve to bottom-right.
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|a| a.key() == key)
            .unwrap_or(Self::BottomRight)
    }

    /// Horizontal alignment.
    pub fn horizontal(&self) -> Align {
        match self {
            Self::TopLeft | Self::MiddleLeft | Self::BottomLeft => Align::Start,
            Self::TopCenter | Self::MiddleCenter | Self::BottomCenter => Align::Center,
            Self::TopRight | Self::MiddleRight | Self::BottomRight => Align::End,
        }
    }

    /// Vertical alignment.
    pub fn vertical(&self) -> Align {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => Align::Start,
            Self::MiddleLeft | Self::MiddleCenter | Self::MiddleRight => Align::Center,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => Align::End,
        }
    }
}

impl From<String> for Anchor {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<&str> for Anchor {
    fn from(key: &str) -> Self {
        Self::from_key(key)
    }
}

impl From<Anchor> for String {
    fn from(anchor: Anchor) -> Self {
        anchor.key().to_string()
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Settings consumed by sizing, positioning and compositing.
///
/// Defaults: bottom-right, 10px offsets, 150px wide with auto height,
/// 80% opacity, `opacity` blend mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementSettings {
    /// Named anchor.
    pub position: Anchor,
    /// Horizontal offset, inward from the anchored edge.
    pub offset_x: i64,
    /// Vertical offset, inward from the anchored edge.
    pub offset_y: i64,
    /// Unit of both offsets.
    pub offset_unit: Unit,
    /// Target width; 0 derives it from the height.
    pub width: u32,
    /// Target height; 0 means auto from the source aspect.
    pub height: u32,
    /// Unit of width and height.
    pub size_unit: Unit,
    /// Watermark opacity in percent. Clamped to 0..=100 before compositing.
    pub opacity: i32,
    /// Blend mode key, resolved through the registry at compose time.
    pub blend_mode: String,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            position: Anchor::BottomRight,
            offset_x: 10,
            offset_y: 10,
            offset_unit: Unit::Px,
            width: 150,
            height: 0,
            size_unit: Unit::Px,
            opacity: 80,
            blend_mode: "opacity".to_string(),
        }
    }
}

impl PlacementSettings {
    /// Opacity clamped to 0..=100.
    #[inline]
    pub fn opacity_percent(&self) -> u8 {
        self.opacity.clamp(0, 100) as u8
    }

    /// Copy with opacity clamped to 0..=100.
    pub fn sanitized(&self) -> Self {
        Self {
            opacity: self.opacity_percent() as i32,
            ..self.clone()
        }
    }
}

/// `round(num / den)` for non-negative integers, halves rounding up.
#[inline]
fn div_round(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

/// Computes the scaled watermark size.
///
/// Fails with [`OpsError::InvalidDimensions`] when the source is empty or the
/// settings resolve to a zero dimension (e.g. width and height both 0).
pub fn size(base: Size, source: Size, settings: &PlacementSettings) -> OpsResult<Size> {
    if source.is_empty() {
        return Err(OpsError::InvalidDimensions(format!(
            "watermark source is {}",
            source
        )));
    }

    let (mut w, mut h) = match settings.size_unit {
        Unit::Percent => {
            let w = base.width as u64 * settings.width as u64 / 100;
            let h = if settings.height > 0 {
                base.height as u64 * settings.height as u64 / 100
            } else {
                0
            };
            (w, h)
        }
        Unit::Px => (settings.width as u64, settings.height as u64),
    };

    let (src_w, src_h) = (source.width as u64, source.height as u64);
    if h == 0 {
        h = div_round(w * src_h, src_w);
    }
    if w == 0 {
        w = div_round(h * src_w, src_h);
    }

    if w == 0 || h == 0 || w > u32::MAX as u64 || h > u32::MAX as u64 {
        return Err(OpsError::InvalidDimensions(format!(
            "watermark resolves to {}x{} (width {}, height {}, unit {})",
            w, h, settings.width, settings.height, settings.size_unit
        )));
    }

    let scaled = Size::new(w as u32, h as u32);
    debug!(%base, %source, %scaled, "watermark size");
    Ok(scaled)
}

/// Computes the watermark's top-left canvas coordinate.
pub fn position(base: Size, scaled: Size, settings: &PlacementSettings) -> Point {
    let anchor = settings.position;
    let (h, v) = (anchor.horizontal(), anchor.vertical());

    let dx = settings.offset_unit.resolve(settings.offset_x, base.width);
    let dy = settings.offset_unit.resolve(settings.offset_y, base.height);

    let at = Point::new(
        h.shift(h.offset(base.width, scaled.width), dx),
        v.shift(v.offset(base.height, scaled.height), dy),
    );
    debug!(%anchor, x = at.x, y = at.y, "watermark position");
    at
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px_offset(anchor: Anchor, x: i64, y: i64) -> PlacementSettings {
        PlacementSettings {
            position: anchor,
            offset_x: x,
            offset_y: y,
            offset_unit: Unit::Px,
            ..Default::default()
        }
    }

    #[test]
    fn test_top_left_ignores_sizes() {
        let s = px_offset(Anchor::TopLeft, 10, 10);
        for (base, wm) in [
            (Size::new(1000, 1000), Size::new(100, 50)),
            (Size::new(10, 10), Size::new(500, 500)),
            (Size::new(1, 1), Size::new(1, 1)),
        ] {
            assert_eq!(position(base, wm, &s), Point::new(10, 10));
        }
    }

    #[test]
    fn test_bottom_right() {
        let s = px_offset(Anchor::BottomRight, 10, 10);
        assert_eq!(position(Size::new(1000, 1000), Size::new(100, 50), &s), Point::new(890, 940));
    }

    #[test]
    fn test_offsets_move_inward() {
        let base = Size::new(200, 100);
        let wm = Size::new(20, 10);
        let cases = [
            (Anchor::TopRight, Point::new(175, 5)),
            (Anchor::BottomLeft, Point::new(5, 85)),
            (Anchor::MiddleCenter, Point::new(95, 50)),
            (Anchor::BottomCenter, Point::new(95, 85)),
        ];
        for (anchor, expected) in cases {
            assert_eq!(position(base, wm, &px_offset(anchor, 5, 5)), expected, "{}", anchor);
        }
        // Negative offsets push past the edge.
        assert_eq!(
            position(base, wm, &px_offset(Anchor::BottomRight, -30, -30)),
            Point::new(210, 120)
        );
    }

    #[test]
    fn test_all_anchors_grid() {
        let base = Size::new(101, 51);
        let wm = Size::new(10, 10);
        let s = |a| px_offset(a, 0, 0);
        let expected = [
            (0, 0), (45, 0), (91, 0),
            (0, 20), (45, 20), (91, 20),
            (0, 41), (45, 41), (91, 41),
        ];
        for (anchor, (x, y)) in Anchor::ALL.into_iter().zip(expected) {
            assert_eq!(position(base, wm, &s(anchor)), Point::new(x, y), "{}", anchor);
        }
    }

    #[test]
    fn test_center_floors_when_watermark_larger() {
        let s = px_offset(Anchor::MiddleCenter, 0, 0);
        // (10 - 15) / 2 = -2.5 -> -3
        assert_eq!(position(Size::new(10, 10), Size::new(15, 15), &s), Point::new(-3, -3));
    }

    #[test]
    fn test_unknown_anchor_defaults_bottom_right() {
        assert_eq!(Anchor::from_key("somewhere"), Anchor::BottomRight);
        assert_eq!(Anchor::from_key(""), Anchor::BottomRight);
        assert_eq!(Anchor::from_key("top-center"), Anchor::TopCenter);
        for a in Anchor::ALL {
            assert_eq!(Anchor::from_key(a.key()), a);
        }
    }

    #[test]
    fn test_percent_offset() {
        assert_eq!(Unit::Percent.resolve(10, 1000), 100);
        assert_eq!(Unit::Percent.resolve(15, 333), 49); // 49.95
        assert_eq!(Unit::Percent.resolve(-15, 333), -50);
        assert_eq!(Unit::Px.resolve(-7, 333), -7);

        let s = PlacementSettings {
            position: Anchor::TopLeft,
            offset_x: 10,
            offset_y: 5,
            offset_unit: Unit::Percent,
            ..Default::default()
        };
        assert_eq!(position(Size::new(1000, 200), Size::new(10, 10), &s), Point::new(100, 10));
    }

    #[test]
    fn test_extreme_offsets_saturate() {
        let base = Size::new(1000, 1000);
        let wm = Size::new(100, 50);

        let far = px_offset(Anchor::TopLeft, i64::MAX, i64::MAX);
        assert_eq!(position(base, wm, &far), Point::new(i64::MAX, i64::MAX));

        let back = px_offset(Anchor::BottomRight, i64::MIN, i64::MIN);
        assert_eq!(position(base, wm, &back), Point::new(i64::MAX, i64::MAX));

        assert_eq!(Unit::Percent.resolve(i64::MAX, 1000), i64::MAX / 100);
        assert_eq!(Unit::Percent.resolve(i64::MIN, 1000), i64::MIN.div_euclid(100));
    }

    #[test]
    fn test_size_px_auto_height() {
        let s = PlacementSettings { width: 150, height: 0, size_unit: Unit::Px, ..Default::default() };
        let scaled = size(Size::new(800, 600), Size::new(200, 100), &s).unwrap();
        assert_eq!(scaled, Size::new(150, 75));
    }

    #[test]
    fn test_size_auto_height_rounds() {
        // 100 / (3/2) = 66.67 -> 67
        let s = PlacementSettings { width: 100, height: 0, ..Default::default() };
        assert_eq!(size(Size::new(10, 10), Size::new(3, 2), &s).unwrap(), Size::new(100, 67));
        // 5 / (4/1) = 1.25 -> 1
        let s = PlacementSettings { width: 5, height: 0, ..Default::default() };
        assert_eq!(size(Size::new(10, 10), Size::new(4, 1), &s).unwrap(), Size::new(5, 1));
    }

    #[test]
    fn test_size_auto_width() {
        let s = PlacementSettings { width: 0, height: 40, ..Default::default() };
        assert_eq!(size(Size::new(10, 10), Size::new(300, 100), &s).unwrap(), Size::new(120, 40));
    }

    #[test]
    fn test_size_percent() {
        let s = PlacementSettings {
            width: 25,
            height: 0,
            size_unit: Unit::Percent,
            ..Default::default()
        };
        // 25% of 1001 = 250.25 -> 250, height from 2:1 aspect
        assert_eq!(size(Size::new(1001, 500), Size::new(200, 100), &s).unwrap(), Size::new(250, 125));

        let s = PlacementSettings { width: 10, height: 50, size_unit: Unit::Percent, ..Default::default() };
        assert_eq!(size(Size::new(1000, 301), Size::new(1, 1), &s).unwrap(), Size::new(100, 150));
    }

    #[test]
    fn test_size_zero_by_zero_rejected() {
        let s = PlacementSettings { width: 0, height: 0, ..Default::default() };
        assert!(matches!(
            size(Size::new(100, 100), Size::new(10, 10), &s),
            Err(OpsError::InvalidDimensions(_))
        ));
        let s = PlacementSettings::default();
        assert!(size(Size::new(100, 100), Size::new(0, 10), &s).is_err());
    }

    #[test]
    fn test_opacity_clamp() {
        let s = PlacementSettings { opacity: 140, ..Default::default() };
        assert_eq!(s.opacity_percent(), 100);
        assert_eq!(PlacementSettings { opacity: -5, ..Default::default() }.sanitized().opacity, 0);
    }
}
