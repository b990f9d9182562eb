use super::{LayoutDelta, LayoutOptions, LayoutPlan, participants};
use crate::geometry::{Point, Rect, Size};
use crate::window::WindowRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Children laid out left to right.
    Horizontal,
    /// Children laid out top to bottom.
    Vertical,
}

/// Arrange normal windows in a near-square grid, row-major by ascending z.
///
/// `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`. Each cell is shrunk by the
/// gutter so neighbouring windows never touch.
pub fn tile_grid(windows: &[WindowRecord], viewport: Size, opts: &LayoutOptions) -> LayoutPlan {
    let tiled = participants(windows);
    if tiled.is_empty() {
        return LayoutPlan::new();
    }
    let count = tiled.len();
    let cols = ceil_sqrt(count);
    let rows = count.div_ceil(cols);
    let area = usable_area(viewport, opts.padding);

    let col_rects = split(Direction::Horizontal, area, cols);
    let row_rects = split(Direction::Vertical, area, rows);

    tiled
        .into_iter()
        .enumerate()
        .map(|(index, window)| {
            let col = col_rects[index % cols];
            let row = row_rects[index / cols];
            let cell = Rect::new(col.x, row.y, col.width, row.height);
            (window.id, place(cell, opts.gutter))
        })
        .collect()
}

/// Side-by-side columns, one per normal window, each spanning the full height.
pub fn tile_horizontal(
    windows: &[WindowRecord],
    viewport: Size,
    opts: &LayoutOptions,
) -> LayoutPlan {
    tile_strips(Direction::Horizontal, windows, viewport, opts)
}

/// Stacked rows, one per normal window, each spanning the full width.
pub fn tile_vertical(windows: &[WindowRecord], viewport: Size, opts: &LayoutOptions) -> LayoutPlan {
    tile_strips(Direction::Vertical, windows, viewport, opts)
}

fn tile_strips(
    direction: Direction,
    windows: &[WindowRecord],
    viewport: Size,
    opts: &LayoutOptions,
) -> LayoutPlan {
    let tiled = participants(windows);
    if tiled.is_empty() {
        return LayoutPlan::new();
    }
    let area = usable_area(viewport, opts.padding);
    let cells = split(direction, area, tiled.len());
    tiled
        .into_iter()
        .zip(cells)
        .map(|(window, cell)| {
            // Only the split axis carries a gutter.
            let rect = match direction {
                Direction::Horizontal => Rect {
                    width: cell.width.saturating_sub(opts.gutter).max(0),
                    ..cell
                },
                Direction::Vertical => Rect {
                    height: cell.height.saturating_sub(opts.gutter).max(0),
                    ..cell
                },
            };
            (
                window.id,
                LayoutDelta::placed(rect.position(), rect.size()),
            )
        })
        .collect()
}

fn usable_area(viewport: Size, padding: i32) -> Rect {
    let padding = padding.max(0);
    Rect::new(
        padding,
        padding,
        viewport.width.saturating_sub(padding * 2).max(0),
        viewport.height.saturating_sub(padding * 2).max(0),
    )
}

fn place(cell: Rect, gutter: i32) -> LayoutDelta {
    LayoutDelta::placed(
        Point::new(cell.x, cell.y),
        Size::new(
            cell.width.saturating_sub(gutter).max(0),
            cell.height.saturating_sub(gutter).max(0),
        ),
    )
}

/// Split `area` into `count` equal slices along `direction`; the last slice
/// absorbs the rounding remainder.
fn split(direction: Direction, area: Rect, count: usize) -> Vec<Rect> {
    let count = count.max(1);
    let total = match direction {
        Direction::Horizontal => area.width,
        Direction::Vertical => area.height,
    };
    let portion = total / count as i32;
    let mut sizes = vec![portion; count];
    if let Some(last) = sizes.last_mut() {
        *last = total - portion * (count as i32 - 1);
    }
    build_rects_from_sizes(direction, area, &sizes)
}

fn build_rects_from_sizes(direction: Direction, area: Rect, sizes: &[i32]) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(sizes.len());
    let mut cursor_x = area.x;
    let mut cursor_y = area.y;
    for size in sizes {
        let rect = match direction {
            Direction::Horizontal => {
                let rect = Rect::new(cursor_x, area.y, *size, area.height);
                cursor_x = cursor_x.saturating_add(*size);
                rect
            }
            Direction::Vertical => {
                let rect = Rect::new(area.x, cursor_y, area.width, *size);
                cursor_y = cursor_y.saturating_add(*size);
                rect
            }
        };
        rects.push(rect);
    }
    rects
}

fn ceil_sqrt(n: usize) -> usize {
    let mut root = 1;
    while root * root < n {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::record;
    use crate::window::{WindowId, WindowState};

    const VIEW: Size = Size::new(1920, 1080);

    fn normal(n: u64) -> Vec<WindowRecord> {
        (1..=n).map(|i| record(i, i, WindowState::Normal)).collect()
    }

    fn rects(plan: &LayoutPlan) -> Vec<Rect> {
        plan.values()
            .map(|d| Rect::from_parts(d.position.unwrap(), d.size.unwrap()))
            .collect()
    }

    fn assert_disjoint_and_inside(rects: &[Rect], viewport: Size) {
        let total: i64 = rects.iter().map(Rect::area).sum();
        assert!(total <= viewport.width as i64 * viewport.height as i64);
        for (i, a) in rects.iter().enumerate() {
            assert!(a.x >= 0 && a.right() <= viewport.width, "{a:?}");
            assert!(a.y >= 0 && a.bottom() <= viewport.height, "{a:?}");
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn ceil_sqrt_values() {
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(2), 2);
        assert_eq!(ceil_sqrt(4), 2);
        assert_eq!(ceil_sqrt(5), 3);
        assert_eq!(ceil_sqrt(9), 3);
        assert_eq!(ceil_sqrt(10), 4);
    }

    #[test]
    fn grid_covers_without_overlap() {
        for n in [1u64, 2, 5, 9] {
            let plan = tile_grid(&normal(n), VIEW, &LayoutOptions::default());
            assert_eq!(plan.len(), n as usize);
            assert_disjoint_and_inside(&rects(&plan), VIEW);
        }
    }

    #[test]
    fn grid_of_five_uses_three_columns_two_rows() {
        let plan = tile_grid(&normal(5), VIEW, &LayoutOptions::default());
        // usable 1900x1060; columns of 633/633/634, rows of 530/530
        let first = plan[&WindowId::new(1)];
        assert_eq!(first.position, Some(Point::new(10, 10)));
        assert_eq!(first.size, Some(Size::new(623, 520)));
        let fourth = plan[&WindowId::new(4)];
        assert_eq!(fourth.position, Some(Point::new(10, 540)));
    }

    #[test]
    fn single_window_fills_padded_viewport() {
        let plan = tile_grid(&normal(1), VIEW, &LayoutOptions::default());
        let only = plan[&WindowId::new(1)];
        assert_eq!(only.position, Some(Point::new(10, 10)));
        assert_eq!(only.size, Some(Size::new(1890, 1050)));
    }

    #[test]
    fn grid_orders_by_z() {
        let windows = vec![
            record(1, 9, WindowState::Normal),
            record(2, 3, WindowState::Normal),
        ];
        let plan = tile_grid(&windows, VIEW, &LayoutOptions::default());
        assert_eq!(plan[&WindowId::new(2)].position, Some(Point::new(10, 10)));
        assert!(plan[&WindowId::new(1)].position.unwrap().x > 10);
    }

    #[test]
    fn excludes_minimized_and_maximized() {
        let windows = vec![
            record(1, 1, WindowState::Normal),
            record(2, 2, WindowState::Minimized),
            record(3, 3, WindowState::Maximized),
        ];
        let plan = tile_grid(&windows, VIEW, &LayoutOptions::default());
        assert_eq!(plan.keys().copied().collect::<Vec<_>>(), vec![WindowId::new(1)]);
        assert!(tile_horizontal(&windows[1..], VIEW, &LayoutOptions::default()).is_empty());
    }

    #[test]
    fn strips_span_the_other_axis() {
        let opts = LayoutOptions::default();
        let plan = tile_horizontal(&normal(3), VIEW, &opts);
        for rect in rects(&plan) {
            assert_eq!(rect.y, 10);
            assert_eq!(rect.height, 1060);
        }
        assert_disjoint_and_inside(&rects(&plan), VIEW);

        let plan = tile_vertical(&normal(4), VIEW, &opts);
        for rect in rects(&plan) {
            assert_eq!(rect.x, 10);
            assert_eq!(rect.width, 1900);
        }
        assert_disjoint_and_inside(&rects(&plan), VIEW);
    }

    #[test]
    fn empty_input_yields_empty_plan() {
        assert!(tile_grid(&[], VIEW, &LayoutOptions::default()).is_empty());
        assert!(tile_vertical(&[], VIEW, &LayoutOptions::default()).is_empty());
    }

    #[test]
    fn plan_is_deterministic() {
        let windows = normal(7);
        let opts = LayoutOptions::default();
        assert_eq!(
            tile_grid(&windows, VIEW, &opts),
            tile_grid(&windows, VIEW, &opts)
        );
    }
}
