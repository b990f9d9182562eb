#[cfg(test)]
mod tests {
    use desktop_wm::geometry::{DEFAULT_VIEWPORT, Point, Size};
    use desktop_wm::interaction::{
        DragController, DragOptions, HitTarget, PointerEvent, PointerHub, ResizeController,
        hit_test, window_at,
    };
    use desktop_wm::window::{ResizeHandle, WindowConfig, WindowRegistry};

    fn registry_with_window() -> (WindowRegistry, desktop_wm::WindowId) {
        let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
        let id = registry.open(
            "editor",
            "Notes",
            WindowConfig {
                position: Some(Point::new(100, 100)),
                size: Size::new(800, 600),
                ..Default::default()
            },
        );
        (registry, id)
    }

    #[test]
    fn drag_near_left_edge_snaps_flush() {
        let (mut registry, id) = registry_with_window();
        let hub = PointerHub::new();
        let mut drag = DragController::new(DragOptions::default());

        let press = PointerEvent::press(110, 110);
        let target = hit_test(registry.get(id).unwrap(), press.position).unwrap();
        assert_eq!(target, HitTarget::TitleBar);
        assert!(drag.press(&mut registry, &hub, id, target, &press));
        assert!(hub.is_captured());

        // Pointer ends 85px left of the press: the window would land at x = 15.
        hub.dispatch(&PointerEvent::moved(25, 210));
        hub.dispatch(&PointerEvent::release(25, 210));
        drag.pump(&mut registry);

        assert!(!drag.is_active());
        assert!(!hub.is_captured());
        assert_eq!(registry.get(id).unwrap().position, Point::new(0, 200));
    }

    #[test]
    fn resize_is_relative_to_press_point() {
        let (mut registry, id) = registry_with_window();
        let hub = PointerHub::new();
        let mut resize = ResizeController::new();

        let press = PointerEvent::press(899, 699);
        let target = hit_test(registry.get(id).unwrap(), press.position).unwrap();
        assert_eq!(target, HitTarget::Handle(ResizeHandle::SE));
        assert!(resize.press(&mut registry, &hub, id, target, &press));

        hub.dispatch(&PointerEvent::moved(949, 749));
        resize.pump(&mut registry);
        resize.on_frame(&mut registry);
        assert_eq!(registry.get(id).unwrap().size, Size::new(850, 650));

        // Shrinking far past the minimum stops at 300x200.
        hub.dispatch(&PointerEvent::release(0, 0));
        resize.pump(&mut registry);
        assert_eq!(registry.get(id).unwrap().size, Size::new(300, 200));
        assert_eq!(registry.get(id).unwrap().position, Point::new(100, 100));
    }

    #[test]
    fn topmost_window_wins_hit_testing() {
        let (mut registry, a) = registry_with_window();
        let b = registry.open(
            "terminal",
            "Shell",
            WindowConfig {
                position: Some(Point::new(300, 300)),
                ..Default::default()
            },
        );
        assert_eq!(window_at(&registry, Point::new(400, 400)), Some(b));
        registry.focus(a);
        assert_eq!(window_at(&registry, Point::new(400, 400)), Some(a));
        registry.minimize(a);
        assert_eq!(window_at(&registry, Point::new(400, 400)), Some(b));
    }
}
