pub mod decorator;

mod registry;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::geometry::{Point, Rect, Size};

pub use registry::{
    InvariantViolation, ListenerId, RegistryEvent, RegistrySeed, WindowRegistry,
};

/// Opaque window identifier, allocated monotonically by the registry and
/// never reused within a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WindowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(WindowId)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WindowState::Normal => "normal",
            WindowState::Minimized => "minimized",
            WindowState::Maximized => "maximized",
        };
        write!(f, "{}", s)
    }
}

/// Operations a window permits, fixed when the window is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub minimizable: bool,
    pub maximizable: bool,
    pub closeable: bool,
    pub resizable: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            minimizable: true,
            maximizable: true,
            closeable: true,
            resizable: true,
        }
    }
}

/// One of the eight grab regions around a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
        ResizeHandle::NW,
    ];

    /// Handles on the left side drag the window's x along with its width.
    pub fn moves_left_edge(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    pub fn moves_right_edge(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    /// Handles on the top side drag the window's y along with its height.
    pub fn moves_top_edge(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    pub fn moves_bottom_edge(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }
}

/// Transient gesture state attached to a window while the pointer is held.
/// Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Dragging {
        pointer_offset: Point,
    },
    Resizing {
        handle: ResizeHandle,
        original_size: Size,
        original_position: Point,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: String,
    pub title: String,
    pub position: Point,
    pub size: Size,
    pub z_index: u64,
    pub state: WindowState,
    pub previous_geometry: Option<Rect>,
    pub capabilities: Capabilities,
    pub interaction: Option<Interaction>,
}

impl WindowRecord {
    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    pub fn is_minimized(&self) -> bool {
        self.state == WindowState::Minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.state == WindowState::Maximized
    }

    pub fn is_normal(&self) -> bool {
        self.state == WindowState::Normal
    }
}

/// Options accepted by [`WindowRegistry::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Explicit origin; when absent the window is cascaded after its siblings.
    pub position: Option<Point>,
    pub size: Size,
    pub capabilities: Capabilities,
    /// Initial state hint. Honoured only when the capabilities allow it.
    pub state: WindowState,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            position: None,
            size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            capabilities: Capabilities::default(),
            state: WindowState::Normal,
        }
    }
}

/// Props handed to the external renderer of a window's body. The engine knows
/// nothing about the content beyond these.
pub struct ContentProps {
    pub window_id: WindowId,
    on_close_request: Box<dyn Fn() -> WindowId>,
}

impl ContentProps {
    pub fn new(window_id: WindowId) -> Self {
        Self {
            window_id,
            on_close_request: Box::new(move || window_id),
        }
    }

    /// Content asks to be closed; the returned id is what the host should pass
    /// to [`WindowRegistry::close`].
    pub fn request_close(&self) -> WindowId {
        (self.on_close_request)()
    }
}

impl fmt::Debug for ContentProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentProps")
            .field("window_id", &self.window_id)
            .finish_non_exhaustive()
    }
}
