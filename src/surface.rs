//! Mapping between the engine's pixel space and terminal cells.
//!
//! The desktop is rendered into a grid of character cells. Every cell stands
//! for a fixed block of pixels, so registry geometry stays in pixels and only
//! the renderer and the pointer translation deal in cells.

use crate::geometry::{Point, Rect, Size, Viewport};

/// Pixels represented by one terminal column when no viewport is configured.
pub const CELL_WIDTH: i32 = 10;

/// Pixels represented by one terminal row when no viewport is configured.
pub const CELL_HEIGHT: i32 = 20;

/// Rows reserved at the bottom of the screen for the taskbar.
pub const TASKBAR_ROWS: u16 = 1;

/// A terminal of `cols` by `rows` cells showing a `viewport` of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    pub cols: u16,
    pub rows: u16,
    pub viewport: Size,
}

impl CellGrid {
    pub fn new(cols: u16, rows: u16, viewport: Size) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            viewport,
        }
    }

    /// Grid for a terminal of `cols` by `rows`, taskbar excluded, whose
    /// viewport follows the terminal at the stock cell size.
    pub fn native(cols: u16, rows: u16) -> Self {
        let rows = desktop_rows(rows);
        Self::new(cols, rows, native_viewport(cols, rows))
    }

    /// Same as [`CellGrid::native`] but showing a fixed pixel viewport.
    pub fn scaled(cols: u16, rows: u16, viewport: Size) -> Self {
        Self::new(cols, desktop_rows(rows), viewport)
    }

    /// Pixel at the top-left corner of cell `(col, row)`.
    pub fn to_pixel(&self, col: u16, row: u16) -> Point {
        Point::new(
            scale(col as i64, self.viewport.width, self.cols),
            scale(row as i64, self.viewport.height, self.rows),
        )
    }

    /// Cells covered by a pixel rect. The result may lie partly outside the
    /// grid; callers clip.
    pub fn to_cells(&self, rect: Rect) -> Rect {
        let left = unscale_floor(rect.x, self.cols, self.viewport.width);
        let top = unscale_floor(rect.y, self.rows, self.viewport.height);
        let right = unscale_ceil(rect.right(), self.cols, self.viewport.width).max(left + 1);
        let bottom = unscale_ceil(rect.bottom(), self.rows, self.viewport.height).max(top + 1);
        Rect::new(left, top, right - left, bottom - top)
    }
}

impl Viewport for CellGrid {
    fn size(&self) -> Option<Size> {
        Some(self.viewport)
    }
}

/// Terminal rows left for windows once the taskbar is placed.
pub fn desktop_rows(rows: u16) -> u16 {
    rows.saturating_sub(TASKBAR_ROWS).max(1)
}

fn native_viewport(cols: u16, rows: u16) -> Size {
    Size::new(cols.max(1) as i32 * CELL_WIDTH, rows.max(1) as i32 * CELL_HEIGHT)
}

fn scale(cell: i64, extent: i32, cells: u16) -> i32 {
    (cell * extent as i64 / cells as i64) as i32
}

fn unscale_floor(pixel: i32, cells: u16, extent: i32) -> i32 {
    if extent <= 0 {
        return 0;
    }
    (pixel as i64 * cells as i64).div_euclid(extent as i64) as i32
}

fn unscale_ceil(pixel: i32, cells: u16, extent: i32) -> i32 {
    if extent <= 0 {
        return 0;
    }
    let scaled = pixel as i64 * cells as i64;
    let extent = extent as i64;
    (scaled.div_euclid(extent) + i64::from(scaled.rem_euclid(extent) != 0)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_grid_uses_stock_cell_size() {
        let grid = CellGrid::native(120, 41);
        assert_eq!(grid.viewport, Size::new(1200, 800));
        assert_eq!(grid.to_pixel(3, 2), Point::new(30, 40));
    }

    #[test]
    fn scaled_grid_maps_corners() {
        let grid = CellGrid::scaled(192, 55, Size::new(1920, 1080));
        assert_eq!(grid.rows, 54);
        assert_eq!(grid.to_pixel(0, 0), Point::new(0, 0));
        assert_eq!(grid.to_pixel(96, 27), Point::new(960, 540));
        assert_eq!(
            grid.to_cells(Rect::new(100, 100, 800, 600)),
            Rect::new(10, 5, 80, 30)
        );
    }

    #[test]
    fn partial_cells_round_outwards() {
        let grid = CellGrid::native(100, 31);
        assert_eq!(
            grid.to_cells(Rect::new(15, 25, 300, 200)),
            Rect::new(1, 1, 31, 11)
        );
    }

    #[test]
    fn offscreen_origin_stays_negative() {
        let grid = CellGrid::native(100, 31);
        let cells = grid.to_cells(Rect::new(-50, 0, 300, 200));
        assert_eq!(cells.x, -5);
        assert_eq!(cells.right(), 25);
    }

    #[test]
    fn degenerate_terminal_is_clamped() {
        let grid = CellGrid::native(0, 0);
        assert_eq!(grid.cols, 1);
        assert_eq!(grid.rows, 1);
        assert_eq!(grid.viewport, Size::new(10, 20));
    }
}
