use desktop_wm::CommandSurface;
use desktop_wm::config::EngineConfig;
use desktop_wm::constants::LAYOUT_STORAGE_KEY;
use desktop_wm::geometry::{DEFAULT_VIEWPORT, Point, Rect};
use desktop_wm::layout::Arrangement;
use desktop_wm::persistence::{self, FileStore, LayoutStore};
use desktop_wm::window::{WindowConfig, WindowRegistry, WindowState};
use indoc::indoc;

#[test]
fn layout_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());

    let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
    let a = registry.open("editor", "Notes", WindowConfig::default());
    let b = registry.open("terminal", "Shell", WindowConfig::default());
    registry.move_to(a, 400, 250);
    registry.maximize(b);
    registry.focus(a);
    persistence::save(&mut store, LAYOUT_STORAGE_KEY, &registry).unwrap();

    let seed = persistence::restore_or_default(&store, LAYOUT_STORAGE_KEY);
    let restored = EngineConfig::default().registry(seed, DEFAULT_VIEWPORT);
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.get(a).unwrap().position, Point::new(400, 250));
    assert_eq!(restored.get(b).unwrap().state, WindowState::Maximized);
    assert_eq!(
        restored.get(b).unwrap().previous_geometry,
        Some(Rect::new(100, 100, 800, 600))
    );
    assert_eq!(restored.focused(), Some(a));
    restored.check_invariants().unwrap();

    let mut restored = restored;
    let c = restored.open("editor", "Draft", WindowConfig::default());
    assert!(c > b);
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store.save(LAYOUT_STORAGE_KEY, "{ not json").unwrap();
    let seed = persistence::restore_or_default(&store, LAYOUT_STORAGE_KEY);
    assert!(seed.windows.is_empty());
    assert_eq!(seed.focused, None);
}

#[test]
fn older_layouts_with_missing_fields_load() {
    let json = indoc! {r#"
        {
          "windows": {
            "3": { "appId": "editor", "title": "Old", "position": { "x": 10, "y": 20 }, "zIndex": 4 }
          }
        }
    "#};
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store.save(LAYOUT_STORAGE_KEY, json).unwrap();

    let seed = persistence::restore_or_default(&store, LAYOUT_STORAGE_KEY);
    let mut registry = EngineConfig::default().registry(seed, DEFAULT_VIEWPORT);
    let window = registry.windows()[0].clone();
    assert_eq!(window.title, "Old");
    assert_eq!(window.state, WindowState::Normal);
    assert_eq!(window.size.width, 800);
    let next = registry.open("editor", "New", WindowConfig::default());
    assert_eq!(next.get(), 4);
}

#[test]
fn tiling_four_windows_fills_viewport_without_overlap() {
    let mut registry = WindowRegistry::new(DEFAULT_VIEWPORT);
    for n in 0..4 {
        registry.open(format!("app{n}"), format!("w{n}"), WindowConfig::default());
    }
    CommandSurface::default().arrange(&mut registry, Arrangement::Grid);

    let rects: Vec<Rect> = registry.windows().iter().map(|w| w.rect()).collect();
    for (i, a) in rects.iter().enumerate() {
        assert!(a.x >= 10 && a.y >= 10);
        assert!(a.right() <= 1910 && a.bottom() <= 1070);
        for b in &rects[i + 1..] {
            assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
        }
    }
    assert_eq!(rects[0], Rect::new(10, 10, 940, 520));
}
