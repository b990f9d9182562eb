use ratatui::buffer::Buffer;
use ratatui::prelude::Rect as Area;
use ratatui::style::{Color, Modifier, Style};

use crate::geometry::{Point, Rect};
use crate::window::{Capabilities, ResizeHandle, WindowRecord, WindowState};

/// Cells taken by one title-bar button, brackets included.
pub const CONTROL_WIDTH: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleControl {
    Minimize,
    Maximize,
    Close,
}

/// Part of a decorated frame under a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePart {
    Control(TitleControl),
    TitleBar,
    Handle(ResizeHandle),
    Body,
}

/// What the decorator needs to know about a window.
#[derive(Debug, Clone, Copy)]
pub struct Chrome<'a> {
    pub title: &'a str,
    pub focused: bool,
    pub state: WindowState,
    pub capabilities: Capabilities,
}

impl<'a> Chrome<'a> {
    pub fn of(window: &'a WindowRecord, focused: bool) -> Self {
        Self {
            title: &window.title,
            focused,
            state: window.state,
            capabilities: window.capabilities,
        }
    }
}

/// Draws window frames into a cell buffer and answers which part of a frame
/// sits under a cell. `cells` is the window's cell rect and may extend past
/// `bounds`; drawing is clipped to `bounds`.
pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, buffer: &mut Buffer, cells: Rect, bounds: Area, chrome: &Chrome<'_>);

    fn hit(&self, cells: Rect, chrome: &Chrome<'_>, col: i32, row: i32) -> Option<FramePart>;

    /// Interior left for the window's content.
    fn body(&self, cells: Rect) -> Rect {
        Rect::new(
            cells.x + 1,
            cells.y + 2,
            (cells.width - 2).max(0),
            (cells.height - 3).max(0),
        )
    }
}

/// Title-bar buttons the window's capabilities allow, right to left from the
/// frame's right border, paired with their first column.
pub fn title_controls(cells: Rect, capabilities: &Capabilities) -> Vec<(TitleControl, i32)> {
    let wanted = [
        (TitleControl::Close, capabilities.closeable),
        (TitleControl::Maximize, capabilities.maximizable),
        (TitleControl::Minimize, capabilities.minimizable),
    ];
    let mut next = cells.right() - 1 - CONTROL_WIDTH;
    let mut out = Vec::new();
    for (control, enabled) in wanted {
        if !enabled {
            continue;
        }
        if next <= cells.x {
            break;
        }
        out.push((control, next));
        next -= CONTROL_WIDTH;
    }
    out
}

#[derive(Debug, Default)]
pub struct OpenStepDecorator;

impl OpenStepDecorator {
    fn control_symbol(control: TitleControl, state: WindowState) -> &'static str {
        match control {
            TitleControl::Minimize => "[_]",
            TitleControl::Maximize if state == WindowState::Maximized => "[❐]",
            TitleControl::Maximize => "[□]",
            TitleControl::Close => "[x]",
        }
    }
}

impl WindowDecorator for OpenStepDecorator {
    fn render_window(&self, buffer: &mut Buffer, cells: Rect, bounds: Area, chrome: &Chrome<'_>) {
        let header_style = if chrome.focused {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        let border_style = Style::default().fg(Color::DarkGray).bg(Color::Reset);
        let body_style = Style::default();

        let left = cells.x;
        let top = cells.y;
        let right = cells.right() - 1;
        let bottom = cells.bottom() - 1;
        let header_y = top + 1;

        let mut put = |x: i32, y: i32, symbol: &str, style: Style| {
            if let Some(pos) = clip(bounds, x, y)
                && let Some(cell) = buffer.cell_mut(pos)
            {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        };

        // Background: windows underneath must not show through.
        for y in header_y + 1..bottom {
            for x in left + 1..right {
                put(x, y, " ", body_style);
            }
        }

        // Header
        if header_y < bottom {
            for x in left + 1..right {
                put(x, header_y, " ", header_style);
            }
            let controls = title_controls(cells, &chrome.capabilities);
            let title_end = controls.last().map_or(right, |(_, x)| *x);
            let header_width = (title_end - left - 1).max(0) as usize;
            let title: Vec<char> = chrome.title.chars().take(header_width).collect();
            let start = left + 1 + (header_width - title.len()) as i32 / 2;
            for (idx, ch) in title.iter().enumerate() {
                put(start + idx as i32, header_y, &ch.to_string(), header_style);
            }
            for (control, x) in controls {
                let symbol = Self::control_symbol(control, chrome.state);
                for (idx, ch) in symbol.chars().enumerate() {
                    put(x + idx as i32, header_y, &ch.to_string(), header_style);
                }
            }
        }

        // Borders
        for x in left..=right {
            let (top_symbol, bottom_symbol) = if x == left {
                ("┌", "└")
            } else if x == right {
                ("┐", "┘")
            } else {
                ("─", "─")
            };
            put(x, top, top_symbol, border_style);
            if bottom > top {
                put(x, bottom, bottom_symbol, border_style);
            }
        }
        for y in top + 1..bottom {
            put(left, y, "│", border_style);
            if right > left {
                put(right, y, "│", border_style);
            }
        }
    }

    fn hit(&self, cells: Rect, chrome: &Chrome<'_>, col: i32, row: i32) -> Option<FramePart> {
        if !cells.contains(Point::new(col, row)) {
            return None;
        }
        let on_left = col == cells.x;
        let on_right = col == cells.right() - 1;
        let on_top = row == cells.y;
        let on_bottom = row == cells.bottom() - 1;

        if chrome.state == WindowState::Normal && chrome.capabilities.resizable {
            let handle = match (on_top, on_bottom, on_left, on_right) {
                (true, _, true, _) => Some(ResizeHandle::NW),
                (true, _, _, true) => Some(ResizeHandle::NE),
                (_, true, true, _) => Some(ResizeHandle::SW),
                (_, true, _, true) => Some(ResizeHandle::SE),
                (true, ..) => Some(ResizeHandle::N),
                (_, true, ..) => Some(ResizeHandle::S),
                (_, _, true, _) => Some(ResizeHandle::W),
                (.., true) => Some(ResizeHandle::E),
                _ => None,
            };
            if let Some(handle) = handle {
                return Some(FramePart::Handle(handle));
            }
        }

        if row == cells.y + 1 {
            let control = title_controls(cells, &chrome.capabilities)
                .into_iter()
                .find(|(_, x)| (*x..*x + CONTROL_WIDTH).contains(&col));
            return Some(match control {
                Some((control, _)) => FramePart::Control(control),
                None => FramePart::TitleBar,
            });
        }
        if on_top {
            return Some(FramePart::TitleBar);
        }
        Some(FramePart::Body)
    }
}

/// Write `text` starting at `(x, y)`, at most `max_width` cells, skipping
/// whatever falls outside `bounds`.
pub(crate) fn write_clipped(
    buffer: &mut Buffer,
    bounds: Area,
    x: i32,
    y: i32,
    text: &str,
    max_width: i32,
    style: Style,
) {
    for (idx, ch) in text.chars().take(max_width.max(0) as usize).enumerate() {
        if let Some(pos) = clip(bounds, x + idx as i32, y)
            && let Some(cell) = buffer.cell_mut(pos)
        {
            cell.set_symbol(&ch.to_string());
            cell.set_style(style);
        }
    }
}

fn clip(bounds: Area, x: i32, y: i32) -> Option<(u16, u16)> {
    let inside = x >= bounds.x as i32
        && x < bounds.x as i32 + bounds.width as i32
        && y >= bounds.y as i32
        && y < bounds.y as i32 + bounds.height as i32;
    inside.then_some((x as u16, y as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome(state: WindowState) -> Chrome<'static> {
        Chrome {
            title: "Notes",
            focused: true,
            state,
            capabilities: Capabilities::default(),
        }
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_frame_title_and_controls() {
        let area = Area::new(0, 0, 24, 6);
        let mut buffer = Buffer::empty(area);
        OpenStepDecorator.render_window(
            &mut buffer,
            Rect::new(0, 0, 24, 6),
            area,
            &chrome(WindowState::Normal),
        );
        assert_eq!(row_text(&buffer, 0), format!("┌{}┐", "─".repeat(22)));
        let header = row_text(&buffer, 1);
        assert!(header.starts_with('│'));
        assert!(header.contains("Notes"));
        assert!(header.ends_with("[_][□][x]│"));
        assert_eq!(row_text(&buffer, 5), format!("└{}┘", "─".repeat(22)));
    }

    #[test]
    fn drawing_is_clipped_to_bounds() {
        let area = Area::new(0, 0, 10, 4);
        let mut buffer = Buffer::empty(area);
        OpenStepDecorator.render_window(
            &mut buffer,
            Rect::new(-5, -1, 30, 10),
            area,
            &chrome(WindowState::Normal),
        );
        // The header row (y = 0) is visible; the top border is not.
        assert_ne!(buffer[(0, 0)].symbol(), "─");
        assert_eq!(buffer[(0, 1)].symbol(), " ");
    }

    #[test]
    fn controls_respect_capabilities() {
        let caps = Capabilities {
            maximizable: false,
            ..Default::default()
        };
        let controls = title_controls(Rect::new(0, 0, 30, 10), &caps);
        assert_eq!(
            controls,
            vec![(TitleControl::Close, 26), (TitleControl::Minimize, 23)]
        );
    }

    #[test]
    fn hit_regions() {
        let cells = Rect::new(10, 5, 30, 10);
        let normal = chrome(WindowState::Normal);
        let deco = OpenStepDecorator;
        assert_eq!(deco.hit(cells, &normal, 9, 5), None);
        assert_eq!(
            deco.hit(cells, &normal, 10, 5),
            Some(FramePart::Handle(ResizeHandle::NW))
        );
        assert_eq!(
            deco.hit(cells, &normal, 39, 14),
            Some(FramePart::Handle(ResizeHandle::SE))
        );
        assert_eq!(
            deco.hit(cells, &normal, 20, 5),
            Some(FramePart::Handle(ResizeHandle::N))
        );
        assert_eq!(
            deco.hit(cells, &normal, 10, 8),
            Some(FramePart::Handle(ResizeHandle::W))
        );
        assert_eq!(deco.hit(cells, &normal, 20, 6), Some(FramePart::TitleBar));
        assert_eq!(
            deco.hit(cells, &normal, 37, 6),
            Some(FramePart::Control(TitleControl::Close))
        );
        assert_eq!(deco.hit(cells, &normal, 20, 9), Some(FramePart::Body));

        let maximized = chrome(WindowState::Maximized);
        assert_eq!(deco.hit(cells, &maximized, 20, 5), Some(FramePart::TitleBar));
        assert_eq!(deco.hit(cells, &maximized, 10, 8), Some(FramePart::Body));
    }

    #[test]
    fn body_sits_inside_header_and_borders() {
        assert_eq!(
            OpenStepDecorator.body(Rect::new(10, 5, 30, 10)),
            Rect::new(11, 7, 28, 7)
        );
    }
}
