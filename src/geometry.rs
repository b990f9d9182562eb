//! Pixel geometry shared by every layer of the engine.
//!
//! Everything in here is pure: no registry access, no clocks, no surface
//! handles beyond the [`Viewport`] trait. The registry, the layout algorithms
//! and the interaction controllers all route their writes through
//! [`clamp_rect`] and [`clamp_position`], so the invariants they enforce
//! (minimum size, on-screen reachability) live in exactly one place.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CASCADE_ORIGIN, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, MIN_HEIGHT, MIN_VISIBLE,
    MIN_WIDTH,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Component-wise `self - other`.
    pub fn delta(self, other: Point) -> (i32, i32) {
        (
            self.x.saturating_sub(other.x),
            self.y.saturating_sub(other.y),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> i64 {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        self.width as i64 * self.height as i64
    }

    pub fn contains(&self, point: Point) -> bool {
        if self.width <= 0 || self.height <= 0 {
            return false;
        }
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// A rendering surface that may or may not be able to report its size.
pub trait Viewport {
    fn size(&self) -> Option<Size>;
}

/// Surface with a known, fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedViewport(pub Size);

impl Viewport for FixedViewport {
    fn size(&self) -> Option<Size> {
        Some(self.0)
    }
}

/// Stand-in for non-interactive contexts where no surface exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSurface;

impl Viewport for NoSurface {
    fn size(&self) -> Option<Size> {
        None
    }
}

pub const DEFAULT_VIEWPORT: Size = Size::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);

/// Current surface size, falling back to 1920x1080 when the surface reports
/// nothing or a degenerate size.
pub fn viewport_size(surface: &dyn Viewport) -> Size {
    match surface.size() {
        Some(size) if size.width > 0 && size.height > 0 => size,
        _ => DEFAULT_VIEWPORT,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampConstraints {
    pub min: Size,
    /// Upper bound for the size; `None` means "the viewport".
    pub max: Option<Size>,
    pub padding: i32,
}

impl Default for ClampConstraints {
    fn default() -> Self {
        Self {
            min: Size::new(MIN_WIDTH, MIN_HEIGHT),
            max: None,
            padding: 0,
        }
    }
}

/// Clamp `value` into `[lo, hi]`; an empty range resolves to `lo`.
pub(crate) fn clamp_axis(value: i32, lo: i32, hi: i32) -> i32 {
    if hi < lo { lo } else { value.clamp(lo, hi) }
}

/// Clamp a rectangle so it is fully addressable on screen.
///
/// Width and height are clamped into `[min, max]` first (the minimum wins when
/// the viewport is smaller than it), then the origin is clamped into
/// `[padding, viewport - size - padding]` on each axis.
pub fn clamp_rect(
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    constraints: &ClampConstraints,
    viewport: Size,
) -> Rect {
    let max = constraints.max.unwrap_or(viewport);
    let width = clamp_axis(width, constraints.min.width, max.width);
    let height = clamp_axis(height, constraints.min.height, max.height);
    let pad = constraints.padding;
    let x = clamp_axis(
        x,
        pad,
        viewport.width.saturating_sub(width).saturating_sub(pad),
    );
    let y = clamp_axis(
        y,
        pad,
        viewport.height.saturating_sub(height).saturating_sub(pad),
    );
    Rect::new(x, y, width, height)
}

/// Keep an origin inside `[0, viewport - MIN_VISIBLE]` so some chrome is
/// always reachable.
pub fn clamp_position(point: Point, viewport: Size) -> Point {
    Point::new(
        clamp_axis(point.x, 0, viewport.width.saturating_sub(MIN_VISIBLE)),
        clamp_axis(point.y, 0, viewport.height.saturating_sub(MIN_VISIBLE)),
    )
}

/// Round `value` to the nearest multiple of `grid_size`; halves round away
/// from zero. Non-positive grids leave the value untouched.
pub fn snap_to_grid(value: i32, grid_size: i32) -> i32 {
    if grid_size <= 0 {
        return value;
    }
    let cells = (value as f64 / grid_size as f64).round();
    (cells as i64 * grid_size as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

pub fn center_rect(width: i32, height: i32, viewport: Size) -> Point {
    Point::new(
        viewport.width.saturating_sub(width) / 2,
        viewport.height.saturating_sub(height) / 2,
    )
}

pub fn cascade_offset(index: usize, step: i32) -> Point {
    let shift = (index as i64 * step as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    let v = CASCADE_ORIGIN.saturating_add(shift);
    Point::new(v, v)
}
