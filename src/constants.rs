//! Shared crate-wide constants.

/// Smallest width (in pixels) a window may be resized to.
pub const MIN_WIDTH: i32 = 300;

/// Smallest height (in pixels) a window may be resized to.
pub const MIN_HEIGHT: i32 = 200;

/// Number of pixels of a window that must stay inside the viewport so the
/// user can grab its chrome again.
///
/// Every position write clamps the origin into `[0, viewport - MIN_VISIBLE]`.
pub const MIN_VISIBLE: i32 = 100;

/// Viewport assumed when the rendering surface cannot report a size, for
/// example in headless runs and tests.
pub const DEFAULT_VIEWPORT_WIDTH: i32 = 1920;
pub const DEFAULT_VIEWPORT_HEIGHT: i32 = 1080;

/// Size given to windows opened without an explicit size.
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;

/// Distance (in pixels) from a viewport edge within which edge and half
/// snapping engage.
pub const EDGE_THRESHOLD: i32 = 20;

/// Default alignment grid used by `snap_to_grid`.
pub const GRID_SIZE: i32 = 20;

/// Origin of the first cascaded window on both axes.
pub const CASCADE_ORIGIN: i32 = 100;

/// Diagonal step between successive cascaded windows.
pub const CASCADE_STEP: i32 = 30;

/// Outer padding kept free around tiled layouts.
pub const TILE_PADDING: i32 = 10;

/// Spacing subtracted from every tiled cell.
pub const TILE_GUTTER: i32 = 10;

/// Thickness of the invisible resize handles around a window frame.
pub const RESIZE_HANDLE_THICKNESS: i32 = 8;

/// Height of the title bar that acts as the drag region.
pub const TITLE_BAR_HEIGHT: i32 = 32;

/// Storage key the persisted layout is written under.
pub const LAYOUT_STORAGE_KEY: &str = "window-layout";

/// Largest window id or z-index accepted from persisted state. Anything above
/// is treated as corrupt so the registry's counters always have headroom.
pub const MAX_PERSISTED_COUNTER: u64 = u32::MAX as u64;
