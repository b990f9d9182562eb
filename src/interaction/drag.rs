use super::{FrameCoalescer, Gesture, HitTarget, PointerEvent, PointerHub, PointerKind};
use crate::constants::EDGE_THRESHOLD;
use crate::geometry::{Point, Rect, Size};
use crate::layout::{edge_snap, half_snap};
use crate::window::{Interaction, WindowId, WindowRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOptions {
    pub edge_snap: bool,
    pub half_snap_on_release: bool,
    pub threshold: i32,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            edge_snap: true,
            half_snap_on_release: false,
            threshold: EDGE_THRESHOLD,
        }
    }
}

#[derive(Debug)]
struct ActiveDrag {
    gesture: Gesture,
    initial: Point,
    size: Size,
    pending: FrameCoalescer<Point>,
}

/// Moves a window by its title bar.
#[derive(Debug, Default)]
pub struct DragController {
    options: DragOptions,
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new(options: DragOptions) -> Self {
        Self {
            options,
            active: None,
        }
    }

    pub fn options(&self) -> DragOptions {
        self.options
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn window(&self) -> Option<WindowId> {
        self.active.as_ref().map(|a| a.gesture.window)
    }

    pub fn has_capture(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.gesture.capture.is_attached())
    }

    pub fn press(
        &mut self,
        registry: &mut WindowRegistry,
        hub: &PointerHub,
        id: WindowId,
        target: HitTarget,
        event: &PointerEvent,
    ) -> bool {
        if self.active.is_some() || !event.starts_gesture() || target != HitTarget::TitleBar {
            return false;
        }
        let Some(window) = registry.get(id) else {
            return false;
        };
        if window.is_maximized() {
            tracing::trace!(window_id = %id, "drag press ignored: maximized");
            return false;
        }
        let initial = window.position;
        let size = window.size;
        let (ox, oy) = event.position.delta(initial);
        registry.begin_interaction(
            id,
            Interaction::Dragging {
                pointer_offset: Point::new(ox, oy),
            },
        );
        registry.focus(id);
        tracing::debug!(window_id = %id, "drag started");
        self.active = Some(ActiveDrag {
            gesture: Gesture::begin(hub, id, event.position),
            initial,
            size,
            pending: FrameCoalescer::new(),
        });
        true
    }

    pub fn pointer_move(&mut self, registry: &WindowRegistry, pointer: Point) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let (dx, dy) = pointer.delta(active.gesture.press);
        let mut candidate = active.initial.offset(dx, dy);
        if self.options.edge_snap {
            candidate = edge_snap(
                Rect::from_parts(candidate, active.size),
                registry.viewport(),
                self.options.threshold,
            )
            .position();
        }
        active.pending.schedule(candidate);
    }

    pub fn on_frame(&mut self, registry: &mut WindowRegistry) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let id = active.gesture.window;
        if !registry.contains(id) {
            self.cancel(registry);
            return false;
        }
        let Some(position) = active.pending.take() else {
            return false;
        };
        tracing::trace!(window_id = %id, ?position, "drag frame");
        registry.move_to(id, position.x, position.y);
        true
    }

    pub fn release(&mut self, registry: &mut WindowRegistry) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let id = active.gesture.window;
        if let Some(position) = active.pending.flush() {
            registry.move_to(id, position.x, position.y);
        }
        if self.options.half_snap_on_release
            && let Some(window) = registry.get(id)
            && let Some((zone, rect)) =
                half_snap(window.rect(), registry.viewport(), self.options.threshold)
        {
            tracing::debug!(window_id = %id, %zone, "half snap on release");
            registry.set_rect(id, rect);
        }
        registry.end_interaction(id);
        tracing::debug!(window_id = %id, "drag finished");
    }

    pub fn cancel(&mut self, registry: &mut WindowRegistry) {
        if let Some(active) = self.active.take() {
            registry.end_interaction(active.gesture.window);
            tracing::debug!(window_id = %active.gesture.window, "drag cancelled");
        }
    }

    /// Process events delivered through the pointer hub since the last call.
    pub fn pump(&mut self, registry: &mut WindowRegistry) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        for event in active.gesture.drain() {
            match event.kind {
                PointerKind::Move => self.pointer_move(registry, event.position),
                PointerKind::Release => {
                    self.pointer_move(registry, event.position);
                    self.release(registry);
                    break;
                }
                PointerKind::Press => {}
            }
        }
    }
}
