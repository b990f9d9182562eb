//! Window management engine for a simulated desktop.
//!
//! The [`window::WindowRegistry`] is the single source of truth for every
//! window's geometry, state, stacking and focus. Pure helpers in
//! [`geometry`] and [`layout`] compute positions, [`interaction`] turns
//! pointer gestures into registry writes, [`command`] maps shortcuts and
//! taskbar clicks onto the registry and [`persistence`] saves and restores the
//! layout. [`runner`] and [`cli`] are terminal front ends built on top.

pub mod cli;
pub mod command;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod persistence;
pub mod runner;
pub mod surface;
pub mod tracing_sub;
pub mod window;

pub use command::{CommandSurface, Intent};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use geometry::{Point, Rect, Size};
pub use layout::{Arrangement, LayoutPlan, SnapZone};
pub use persistence::{FileStore, LayoutStore, MemoryStore};
pub use window::{WindowConfig, WindowId, WindowRecord, WindowRegistry, WindowState};
