//! Pure placement algorithms over window records.
//!
//! Every algorithm takes the windows ordered (or orderable) by ascending
//! z-index and returns a [`LayoutPlan`] of deltas; nothing here mutates the
//! registry. Callers feed plans to `WindowRegistry::apply_layout`, which runs
//! them through the regular mutators so clamping and capability checks still
//! apply.

pub mod cascade;
pub mod snap;
pub mod tiling;

pub use cascade::cascade;
pub use snap::{SnapZone, edge_snap, half_snap, snap_half};
pub use tiling::{tile_grid, tile_horizontal, tile_vertical};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{CASCADE_STEP, EDGE_THRESHOLD, TILE_GUTTER, TILE_PADDING};
use crate::geometry::{Point, Size};
use crate::window::{WindowId, WindowRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutDelta {
    pub position: Option<Point>,
    pub size: Option<Size>,
}

impl LayoutDelta {
    pub fn moved(position: Point) -> Self {
        Self {
            position: Some(position),
            size: None,
        }
    }

    pub fn placed(position: Point, size: Size) -> Self {
        Self {
            position: Some(position),
            size: Some(size),
        }
    }
}

pub type LayoutPlan = BTreeMap<WindowId, LayoutDelta>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Free space kept around the whole tiled area.
    pub padding: i32,
    /// Space subtracted from every tiled cell.
    pub gutter: i32,
    pub cascade_step: i32,
    pub edge_threshold: i32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            padding: TILE_PADDING,
            gutter: TILE_GUTTER,
            cascade_step: CASCADE_STEP,
            edge_threshold: EDGE_THRESHOLD,
        }
    }
}

/// Bulk arrangement selectable from the command surface and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrangement {
    Cascade,
    Grid,
    Horizontal,
    Vertical,
}

impl Arrangement {
    pub fn plan(self, windows: &[WindowRecord], viewport: Size, opts: &LayoutOptions) -> LayoutPlan {
        match self {
            Arrangement::Cascade => cascade(windows, opts),
            Arrangement::Grid => tile_grid(windows, viewport, opts),
            Arrangement::Horizontal => tile_horizontal(windows, viewport, opts),
            Arrangement::Vertical => tile_vertical(windows, viewport, opts),
        }
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Arrangement::Cascade => "cascade",
            Arrangement::Grid => "grid",
            Arrangement::Horizontal => "horizontal",
            Arrangement::Vertical => "vertical",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Arrangement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cascade" => Ok(Arrangement::Cascade),
            "grid" | "tile" => Ok(Arrangement::Grid),
            "horizontal" | "columns" => Ok(Arrangement::Horizontal),
            "vertical" | "rows" => Ok(Arrangement::Vertical),
            other => Err(format!("unknown arrangement '{other}'")),
        }
    }
}

/// Windows that take part in bulk layouts: normal state only, ordered by
/// ascending z-index with the id as a tie-break so ordering is total.
pub(crate) fn participants(windows: &[WindowRecord]) -> Vec<&WindowRecord> {
    let mut list: Vec<&WindowRecord> = windows.iter().filter(|w| w.is_normal()).collect();
    list.sort_by_key(|w| (w.z_index, w.id));
    list
}
