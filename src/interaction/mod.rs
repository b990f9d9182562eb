//! Pointer-driven drag and resize gestures.
//!
//! Controllers follow `Idle -> Active -> Idle`. While active they own a
//! [`PointerCapture`] on the host's [`PointerHub`], buffer at most one pending
//! write in a [`FrameCoalescer`] and commit it when the host ticks
//! (`on_frame`) or when the pointer is released.

pub mod capture;
pub mod drag;
pub mod resize;

pub use capture::{PointerCapture, PointerHub};
pub use drag::{DragController, DragOptions};
pub use resize::{ResizeController, hit_test_handle, resize_rect};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::constants::{RESIZE_HANDLE_THICKNESS, TITLE_BAR_HEIGHT};
use crate::geometry::Point;
use crate::window::{ResizeHandle, WindowId, WindowRecord, WindowRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Move,
    Release,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn press(x: i32, y: i32) -> Self {
        Self::primary(PointerKind::Press, x, y)
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self::primary(PointerKind::Move, x, y)
    }

    pub fn release(x: i32, y: i32) -> Self {
        Self::primary(PointerKind::Release, x, y)
    }

    fn primary(kind: PointerKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Only primary-button presses start a gesture.
    pub fn starts_gesture(&self) -> bool {
        self.kind == PointerKind::Press && self.button == PointerButton::Primary
    }
}

/// Region of a window frame under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The drag region.
    TitleBar,
    Handle(ResizeHandle),
    Body,
}

/// Classify `point` against a window frame. Resize handles win over the title
/// bar; windows that cannot be resized (or are maximized) expose none.
pub fn hit_test(window: &WindowRecord, point: Point) -> Option<HitTarget> {
    let rect = window.rect();
    if !rect.contains(point) {
        return None;
    }
    if window.is_normal()
        && window.capabilities.resizable
        && let Some(handle) = hit_test_handle(rect, point, RESIZE_HANDLE_THICKNESS)
    {
        return Some(HitTarget::Handle(handle));
    }
    if point.y < rect.y.saturating_add(TITLE_BAR_HEIGHT) {
        Some(HitTarget::TitleBar)
    } else {
        Some(HitTarget::Body)
    }
}

/// Topmost visible window under `point`.
pub fn window_at(registry: &WindowRegistry, point: Point) -> Option<WindowId> {
    registry
        .windows()
        .into_iter()
        .rev()
        .find(|w| !w.is_minimized() && w.rect().contains(point))
        .map(|w| w.id)
}

/// Defers a write to the next tick, replacing any write still pending.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    dropped: u64,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            dropped: 0,
        }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer `value`. Returns `true` when it replaced an unapplied value.
    pub fn schedule(&mut self, value: T) -> bool {
        let replaced = self.pending.replace(value).is_some();
        if replaced {
            self.dropped = self.dropped.saturating_add(1);
        }
        replaced
    }

    /// Called on tick.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Called on release; identical to [`Self::take`] but reads better there.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How many scheduled values were superseded before reaching a tick.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Bookkeeping shared by both controllers while a gesture is active.
#[derive(Debug)]
struct Gesture {
    window: WindowId,
    press: Point,
    inbox: Rc<RefCell<VecDeque<PointerEvent>>>,
    capture: PointerCapture,
}

impl Gesture {
    fn begin(hub: &PointerHub, window: WindowId, press: Point) -> Self {
        let inbox: Rc<RefCell<VecDeque<PointerEvent>>> = Rc::default();
        let sink = Rc::clone(&inbox);
        let capture = hub.attach(move |event| sink.borrow_mut().push_back(*event));
        Self {
            window,
            press,
            inbox,
            capture,
        }
    }

    /// Events delivered through the hub since the last drain.
    fn drain(&self) -> Vec<PointerEvent> {
        self.inbox.borrow_mut().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DEFAULT_VIEWPORT, Size};
    use crate::window::{Capabilities, WindowConfig};

    #[test]
    fn coalescer_keeps_latest() {
        let mut c = FrameCoalescer::new();
        assert!(!c.schedule(1));
        assert!(c.schedule(2));
        assert!(c.schedule(3));
        assert_eq!(c.dropped(), 2);
        assert_eq!(c.take(), Some(3));
        assert_eq!(c.take(), None);
        c.schedule(4);
        assert_eq!(c.flush(), Some(4));
        assert!(!c.is_pending());
    }

    #[test]
    fn hit_test_regions() {
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let id = registry.open(
            "app",
            "w",
            WindowConfig {
                position: Some(Point::new(100, 100)),
                size: Size::new(400, 300),
                ..Default::default()
            },
        );
        let w = registry.get(id).unwrap();
        assert_eq!(
            hit_test(w, Point::new(102, 102)),
            Some(HitTarget::Handle(ResizeHandle::NW))
        );
        assert_eq!(hit_test(w, Point::new(200, 115)), Some(HitTarget::TitleBar));
        assert_eq!(hit_test(w, Point::new(200, 250)), Some(HitTarget::Body));
        assert_eq!(hit_test(w, Point::new(99, 250)), None);
    }

    #[test]
    fn fixed_size_windows_have_no_handles() {
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let id = registry.open(
            "app",
            "w",
            WindowConfig {
                position: Some(Point::new(100, 100)),
                size: Size::new(400, 300),
                capabilities: Capabilities {
                    resizable: false,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let w = registry.get(id).unwrap();
        assert_eq!(hit_test(w, Point::new(102, 102)), Some(HitTarget::TitleBar));
    }

    #[test]
    fn window_at_prefers_topmost() {
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let config = WindowConfig {
            position: Some(Point::new(100, 100)),
            size: Size::new(400, 300),
            ..Default::default()
        };
        let a = registry.open("app", "a", config);
        let b = registry.open("app", "b", config);
        assert_eq!(window_at(&registry, Point::new(150, 150)), Some(b));
        registry.minimize(b);
        assert_eq!(window_at(&registry, Point::new(150, 150)), Some(a));
        assert_eq!(window_at(&registry, Point::new(5, 5)), None);
    }

    #[test]
    fn only_primary_press_starts_gesture() {
        assert!(PointerEvent::press(0, 0).starts_gesture());
        assert!(!PointerEvent::moved(0, 0).starts_gesture());
        assert!(
            !PointerEvent::press(0, 0)
                .with_button(PointerButton::Secondary)
                .starts_gesture()
        );
    }
}
