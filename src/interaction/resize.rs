use super::{FrameCoalescer, Gesture, HitTarget, PointerEvent, PointerHub, PointerKind};
use crate::geometry::{ClampConstraints, Point, Rect, Size, clamp_axis};
use crate::window::{Interaction, ResizeHandle, WindowId, WindowRegistry};

/// Locate the resize handle under `point`, `thickness` pixels deep inside the
/// frame. Corners take precedence over edges.
pub fn hit_test_handle(rect: Rect, point: Point, thickness: i32) -> Option<ResizeHandle> {
    if !rect.contains(point) {
        return None;
    }
    let left = point.x < rect.x.saturating_add(thickness);
    let right = point.x >= rect.right().saturating_sub(thickness);
    let top = point.y < rect.y.saturating_add(thickness);
    let bottom = point.y >= rect.bottom().saturating_sub(thickness);
    match (top, bottom, left, right) {
        (true, _, true, _) => Some(ResizeHandle::NW),
        (true, _, _, true) => Some(ResizeHandle::NE),
        (_, true, true, _) => Some(ResizeHandle::SW),
        (_, true, _, true) => Some(ResizeHandle::SE),
        (true, _, _, _) => Some(ResizeHandle::N),
        (_, true, _, _) => Some(ResizeHandle::S),
        (_, _, true, _) => Some(ResizeHandle::W),
        (_, _, _, true) => Some(ResizeHandle::E),
        _ => None,
    }
}

/// Apply a pointer delta to the gesture's original rectangle.
///
/// Dimensions are clamped into `[min, max]` (max defaulting to the viewport).
/// Near-side handles derive the origin from the fixed far edge, so clamping a
/// dimension never drags the opposite edge along.
pub fn resize_rect(
    original: Rect,
    handle: ResizeHandle,
    dx: i32,
    dy: i32,
    constraints: &ClampConstraints,
    viewport: Size,
) -> Rect {
    let max = constraints.max.unwrap_or(viewport);
    let mut out = original;

    if handle.moves_left_edge() {
        out.width = clamp_axis(
            original.width.saturating_sub(dx),
            constraints.min.width,
            max.width,
        );
        out.x = original.right().saturating_sub(out.width);
    } else if handle.moves_right_edge() {
        out.width = clamp_axis(
            original.width.saturating_add(dx),
            constraints.min.width,
            max.width,
        );
    }

    if handle.moves_top_edge() {
        out.height = clamp_axis(
            original.height.saturating_sub(dy),
            constraints.min.height,
            max.height,
        );
        out.y = original.bottom().saturating_sub(out.height);
    } else if handle.moves_bottom_edge() {
        out.height = clamp_axis(
            original.height.saturating_add(dy),
            constraints.min.height,
            max.height,
        );
    }
    out
}

#[derive(Debug)]
struct ActiveResize {
    gesture: Gesture,
    handle: ResizeHandle,
    original: Rect,
    pending: FrameCoalescer<Rect>,
}

#[derive(Debug, Default)]
pub struct ResizeController {
    active: Option<ActiveResize>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
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

    /// Start resizing `id` if `target` is a handle and the window allows it.
    pub fn press(
        &mut self,
        registry: &mut WindowRegistry,
        hub: &PointerHub,
        id: WindowId,
        target: HitTarget,
        event: &PointerEvent,
    ) -> bool {
        if self.active.is_some() || !event.starts_gesture() {
            return false;
        }
        let HitTarget::Handle(handle) = target else {
            return false;
        };
        let Some(window) = registry.get(id) else {
            return false;
        };
        if window.is_maximized() || !window.capabilities.resizable {
            tracing::trace!(window_id = %id, "resize press ignored");
            return false;
        }
        let original = window.rect();
        registry.begin_interaction(
            id,
            Interaction::Resizing {
                handle,
                original_size: original.size(),
                original_position: original.position(),
            },
        );
        registry.focus(id);
        tracing::debug!(window_id = %id, ?handle, "resize started");
        self.active = Some(ActiveResize {
            gesture: Gesture::begin(hub, id, event.position),
            handle,
            original,
            pending: FrameCoalescer::new(),
        });
        true
    }

    pub fn pointer_move(&mut self, registry: &WindowRegistry, pointer: Point) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let (dx, dy) = pointer.delta(active.gesture.press);
        let candidate = resize_rect(
            active.original,
            active.handle,
            dx,
            dy,
            &registry.constraints(),
            registry.viewport(),
        );
        active.pending.schedule(candidate);
    }

    /// Commit the buffered candidate, if any. Cancels the gesture when its
    /// window has disappeared.
    pub fn on_frame(&mut self, registry: &mut WindowRegistry) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let id = active.gesture.window;
        if !registry.contains(id) {
            self.cancel(registry);
            return false;
        }
        let Some(rect) = active.pending.take() else {
            return false;
        };
        tracing::trace!(window_id = %id, ?rect, "resize frame");
        registry.set_rect(id, rect);
        true
    }

    pub fn release(&mut self, registry: &mut WindowRegistry) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let id = active.gesture.window;
        if let Some(rect) = active.pending.flush() {
            registry.set_rect(id, rect);
        }
        registry.end_interaction(id);
        tracing::debug!(window_id = %id, "resize finished");
    }

    /// Abort without writing; used when the window or its view goes away.
    pub fn cancel(&mut self, registry: &mut WindowRegistry) {
        if let Some(active) = self.active.take() {
            registry.end_interaction(active.gesture.window);
            tracing::debug!(window_id = %active.gesture.window, "resize cancelled");
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
