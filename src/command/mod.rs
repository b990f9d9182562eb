//! Keyboard shortcuts and taskbar actions mapped onto registry operations.

pub mod keybindings;
pub mod taskbar;

pub use keybindings::{KeyBindings, KeyCombo};
pub use taskbar::{TaskbarAction, TaskbarEntry, taskbar_click};

use std::fmt;

use crossterm::event::KeyEvent;

use crate::layout::{Arrangement, LayoutOptions, SnapZone, snap_half};
use crate::window::{WindowId, WindowRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    CycleFocusForward,
    CycleFocusBackward,
    CloseFocused,
    MinimizeFocused,
    ToggleMaximizeFocused,
    SnapFocusedLeft,
    SnapFocusedRight,
    CascadeAll,
    TileAll,
    TileHorizontal,
    TileVertical,
    Deselect,
}

impl Intent {
    pub const ALL: [Intent; 12] = [
        Intent::CycleFocusForward,
        Intent::CycleFocusBackward,
        Intent::CloseFocused,
        Intent::MinimizeFocused,
        Intent::ToggleMaximizeFocused,
        Intent::SnapFocusedLeft,
        Intent::SnapFocusedRight,
        Intent::CascadeAll,
        Intent::TileAll,
        Intent::TileHorizontal,
        Intent::TileVertical,
        Intent::Deselect,
    ];
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::CycleFocusForward => "Cycle focus forward",
            Intent::CycleFocusBackward => "Cycle focus backward",
            Intent::CloseFocused => "Close window",
            Intent::MinimizeFocused => "Minimize window",
            Intent::ToggleMaximizeFocused => "Maximize / restore window",
            Intent::SnapFocusedLeft => "Snap window left",
            Intent::SnapFocusedRight => "Snap window right",
            Intent::CascadeAll => "Cascade windows",
            Intent::TileAll => "Tile windows (grid)",
            Intent::TileHorizontal => "Tile windows side by side",
            Intent::TileVertical => "Tile windows stacked",
            Intent::Deselect => "Leave text field (Esc)",
        };
        write!(f, "{}", s)
    }
}

/// Where keyboard focus currently sits in the host UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputTarget {
    #[default]
    Desktop,
    /// Typing goes to an editable field; only `Deselect` is honoured.
    TextField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Ignored,
    /// The host should blur the active text field.
    Deselect,
}

/// Cyclic order over a list of items, stepping from `current`.
#[derive(Debug, Clone)]
pub struct FocusRing<T: Copy + Eq> {
    order: Vec<T>,
    current: Option<T>,
}

impl<T: Copy + Eq> FocusRing<T> {
    pub fn new(order: Vec<T>, current: Option<T>) -> Self {
        Self { order, current }
    }

    pub fn current(&self) -> Option<T> {
        self.current
    }

    /// Step once and return the new current item. Without a current item the
    /// ring starts at the first (forward) or last (backward) entry.
    pub fn advance(&mut self, forward: bool) -> Option<T> {
        if self.order.is_empty() {
            return None;
        }
        let len = self.order.len() as isize;
        let next = match self
            .current
            .and_then(|cur| self.order.iter().position(|item| *item == cur))
        {
            Some(idx) => {
                let step = if forward { 1isize } else { -1isize };
                (idx as isize + step).rem_euclid(len) as usize
            }
            None if forward => 0,
            None => (len - 1) as usize,
        };
        self.current = Some(self.order[next]);
        self.current
    }
}

/// Focus the next visible window in ascending z-order, wrapping around.
///
/// Focusing raises the target to the top, so the order is recomputed on each
/// call. Cycling backward with three or more windows therefore alternates
/// between the two topmost ones.
pub fn cycle_focus(registry: &mut WindowRegistry, forward: bool) -> Option<WindowId> {
    let order: Vec<WindowId> = registry
        .windows()
        .into_iter()
        .filter(|w| !w.is_minimized())
        .map(|w| w.id)
        .collect();
    let mut ring = FocusRing::new(order, registry.focused());
    let next = ring.advance(forward)?;
    registry.focus(next);
    Some(next)
}

#[derive(Debug, Clone, Default)]
pub struct CommandSurface {
    bindings: KeyBindings,
    layout: LayoutOptions,
}

impl CommandSurface {
    pub fn new(bindings: KeyBindings, layout: LayoutOptions) -> Self {
        Self { bindings, layout }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Resolve `key` to an intent and dispatch it. Returns the intent when a
    /// binding matched and the input target allowed it.
    pub fn handle_key(
        &self,
        key: &KeyEvent,
        target: InputTarget,
        registry: &mut WindowRegistry,
    ) -> Option<Intent> {
        let intent = self.bindings.intent_for_key(key)?;
        if target == InputTarget::TextField && intent != Intent::Deselect {
            tracing::trace!(%intent, "shortcut suppressed inside text field");
            return None;
        }
        let outcome = self.dispatch(intent, registry);
        tracing::debug!(%intent, ?outcome, "shortcut");
        Some(intent)
    }

    pub fn dispatch(&self, intent: Intent, registry: &mut WindowRegistry) -> Dispatch {
        let before = registry.revision();
        match intent {
            Intent::Deselect => return Dispatch::Deselect,
            Intent::CycleFocusForward => {
                cycle_focus(registry, true);
            }
            Intent::CycleFocusBackward => {
                cycle_focus(registry, false);
            }
            Intent::CloseFocused => {
                if let Some(id) = registry.focused() {
                    registry.close(id);
                }
            }
            Intent::MinimizeFocused => {
                if let Some(id) = registry.focused() {
                    registry.minimize(id);
                }
            }
            Intent::ToggleMaximizeFocused => {
                if let Some(id) = registry.focused() {
                    registry.toggle_maximize(id);
                }
            }
            Intent::SnapFocusedLeft => self.snap_focused(registry, SnapZone::Left),
            Intent::SnapFocusedRight => self.snap_focused(registry, SnapZone::Right),
            Intent::CascadeAll => self.arrange(registry, Arrangement::Cascade),
            Intent::TileAll => self.arrange(registry, Arrangement::Grid),
            Intent::TileHorizontal => self.arrange(registry, Arrangement::Horizontal),
            Intent::TileVertical => self.arrange(registry, Arrangement::Vertical),
        }
        if registry.revision() != before {
            Dispatch::Handled
        } else {
            Dispatch::Ignored
        }
    }

    pub fn arrange(&self, registry: &mut WindowRegistry, arrangement: Arrangement) {
        let plan = arrangement.plan(&registry.snapshot(), registry.viewport(), &self.layout);
        tracing::debug!(%arrangement, windows = plan.len(), "arranging windows");
        registry.apply_layout(&plan);
    }

    fn snap_focused(&self, registry: &mut WindowRegistry, zone: SnapZone) {
        let Some(id) = registry.focused() else {
            return;
        };
        snap_window(registry, id, zone);
    }
}

/// Place `id` into a half of the viewport, leaving maximize first.
pub fn snap_window(registry: &mut WindowRegistry, id: WindowId, zone: SnapZone) {
    let Some(window) = registry.get(id) else {
        return;
    };
    if window.is_maximized() {
        registry.restore_from_maximize(id);
    }
    let rect = snap_half(zone, registry.viewport());
    registry.set_rect(id, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DEFAULT_VIEWPORT, Point, Rect, Size};
    use crate::window::WindowConfig;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn open_three(registry: &mut WindowRegistry) -> [WindowId; 3] {
        let a = registry.open("app", "a", WindowConfig::default());
        let b = registry.open("app", "b", WindowConfig::default());
        let c = registry.open("app", "c", WindowConfig::default());
        [a, b, c]
    }

    #[test]
    fn focus_ring_wraps_both_ways() {
        let mut ring = FocusRing::new(vec![1, 2, 3], Some(3));
        assert_eq!(ring.advance(true), Some(1));
        assert_eq!(ring.advance(false), Some(3));
        let mut ring = FocusRing::new(vec![1, 2, 3], None);
        assert_eq!(ring.advance(false), Some(3));
        let mut ring: FocusRing<u8> = FocusRing::new(vec![], None);
        assert_eq!(ring.advance(true), None);
    }

    #[test]
    fn cycle_forward_wraps_to_lowest_z() {
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let [a, b, c] = open_three(&mut registry);
        assert_eq!(cycle_focus(&mut registry, true), Some(a));
        assert_eq!(cycle_focus(&mut registry, true), Some(b));
        assert_eq!(cycle_focus(&mut registry, true), Some(c));
        assert_eq!(cycle_focus(&mut registry, true), Some(a));
    }

    #[test]
    fn cycle_skips_minimized_and_starts_without_focus() {
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let [a, b, c] = open_three(&mut registry);
        registry.minimize(c);
        assert_eq!(registry.focused(), None);
        assert_eq!(cycle_focus(&mut registry, false), Some(b));
        assert_eq!(cycle_focus(&mut registry, false), Some(a));
        assert!(registry.get(c).unwrap().is_minimized());
    }

    #[test]
    fn text_field_blocks_everything_but_deselect() {
        let surface = CommandSurface::default();
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let [_, _, c] = open_three(&mut registry);
        let close = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::ALT);
        assert_eq!(
            surface.handle_key(&close, InputTarget::TextField, &mut registry),
            None
        );
        assert!(registry.contains(c));
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(
            surface.handle_key(&esc, InputTarget::TextField, &mut registry),
            Some(Intent::Deselect)
        );
        assert_eq!(
            surface.handle_key(&close, InputTarget::Desktop, &mut registry),
            Some(Intent::CloseFocused)
        );
        assert!(!registry.contains(c));
    }

    #[test]
    fn dispatch_reports_outcome() {
        let surface = CommandSurface::default();
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        assert_eq!(
            surface.dispatch(Intent::CloseFocused, &mut registry),
            Dispatch::Ignored
        );
        assert_eq!(
            surface.dispatch(Intent::Deselect, &mut registry),
            Dispatch::Deselect
        );
        registry.open("app", "a", WindowConfig::default());
        assert_eq!(
            surface.dispatch(Intent::MinimizeFocused, &mut registry),
            Dispatch::Handled
        );
    }

    #[test]
    fn snap_left_leaves_maximize_first() {
        let surface = CommandSurface::default();
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let id = registry.open(
            "app",
            "a",
            WindowConfig {
                position: Some(Point::new(50, 50)),
                size: Size::new(400, 300),
                ..Default::default()
            },
        );
        registry.maximize(id);
        surface.dispatch(Intent::SnapFocusedLeft, &mut registry);
        let w = registry.get(id).unwrap();
        assert!(w.is_normal());
        assert!(w.previous_geometry.is_none());
        assert_eq!(w.rect(), Rect::new(0, 0, 960, 1080));

        surface.dispatch(Intent::SnapFocusedRight, &mut registry);
        assert_eq!(registry.get(id).unwrap().rect(), Rect::new(960, 0, 960, 1080));
    }

    #[test]
    fn tile_all_via_shortcut() {
        let surface = CommandSurface::default();
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let [a, b, _] = open_three(&mut registry);
        let tile = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::ALT);
        surface.handle_key(&tile, InputTarget::Desktop, &mut registry);
        let ra = registry.get(a).unwrap().rect();
        let rb = registry.get(b).unwrap().rect();
        assert!(!ra.intersects(&rb));
        assert_eq!(ra.position(), Point::new(10, 10));
    }
}
