//! Points, sizes and rectangles for watermark placement.
//!
//! # Coordinate System
//!
//! All coordinates use the standard image convention:
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Canvas  │
//!   │   │    ┌─────┼───┐
//!   │   └────┼─────┘   │  <- layer placed partly off-canvas
//!   │        └─────────┘
//!   ▼
//!   Y
//! ```
//!
//! A [`Point`] is signed: a layer may start left of or above the canvas, or
//! past its far edge. [`clip_to_canvas`] turns such a placement into the
//! sub-rectangle that actually overlaps the canvas.
//!
//! # Usage
//!
//! ```rust
//! use aquamark_core::{clip_to_canvas, Point, Size};
//!
//! let clip = clip_to_canvas(Size::new(100, 100), Size::new(20, 20), Point::new(-5, 90)).unwrap();
//! assert_eq!((clip.dst_x, clip.dst_y), (0, 90));
//! assert_eq!((clip.src_x, clip.src_y), (5, 0));
//! assert_eq!((clip.width, clip.height), (15, 10));
//! ```

/// Integer canvas offset. May be negative or beyond the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Horizontal offset in pixels.
    pub x: i64,
    /// Vertical offset in pixels.
    pub y: i64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by (dx, dy).
    #[inline]
    pub const fn offset(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width divided by height, or `None` for a zero height.
    #[inline]
    pub fn aspect(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A signed-origin rectangle.
///
/// The rectangle is inclusive on the left/top edges and exclusive on the
/// right/bottom edges.
///
/// # Example
///
/// ```rust
/// use aquamark_core::Rect;
///
/// let a = Rect::new(0, 0, 100, 100);
/// let b = Rect::new(50, -20, 100, 100);
/// assert_eq!(a.intersect(&b), Some(Rect::new(50, 0, 50, 80)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge.
    pub x: i64,
    /// Y coordinate of the top edge.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    #[inline]
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of `size` anchored at `origin`.
    #[inline]
    pub const fn at(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rectangle of `size` at (0, 0).
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// X coordinate of the right edge (exclusive), saturating at `i64::MAX`.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x.saturating_add(self.width as i64)
    }

    /// Y coordinate of the bottom edge (exclusive), saturating at `i64::MAX`.
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height as i64)
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the intersection with `other`, or `None` if they don't overlap.
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, (right - x) as u32, (bottom - y) as u32))
        } else {
            None
        }
    }
}

/// Overlap between a placed layer and the canvas it is drawn onto.
///
/// `dst_*` are canvas coordinates, `src_*` are layer coordinates of the same
/// top-left pixel. Both sides share `width` x `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipRegion {
    /// First canvas column written.
    pub dst_x: u32,
    /// First canvas row written.
    pub dst_y: u32,
    /// First layer column read.
    pub src_x: u32,
    /// First layer row read.
    pub src_y: u32,
    /// Overlap width.
    pub width: u32,
    /// Overlap height.
    pub height: u32,
}

impl ClipRegion {
    /// Canvas-space rectangle of the overlap.
    pub fn dst_rect(&self) -> Rect {
        Rect::new(self.dst_x as i64, self.dst_y as i64, self.width, self.height)
    }

    /// Number of pixels inside the overlap.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Clips a layer of `layer` size placed at `at` to a canvas of `canvas` size.
///
/// Returns `None` when the layer lies entirely outside the canvas or either
/// size is empty.
pub fn clip_to_canvas(canvas: Size, layer: Size, at: Point) -> Option<ClipRegion> {
    let placed = Rect::at(at, layer);
    let overlap = Rect::from_size(canvas).intersect(&placed)?;

    Some(ClipRegion {
        dst_x: overlap.x as u32,
        dst_y: overlap.y as u32,
        src_x: (overlap.x - at.x) as u32,
        src_y: (overlap.y - at.y) as u32,
        width: overlap.width,
        height: overlap.height,
    })
}
