use super::{LayoutDelta, LayoutOptions, LayoutPlan, participants};
use crate::geometry::cascade_offset;
use crate::window::WindowRecord;

/// Stack normal windows diagonally in z-order. Sizes are left alone.
pub fn cascade(windows: &[WindowRecord], opts: &LayoutOptions) -> LayoutPlan {
    participants(windows)
        .into_iter()
        .enumerate()
        .map(|(index, window)| {
            (
                window.id,
                LayoutDelta::moved(cascade_offset(index, opts.cascade_step)),
            )
        })
        .collect()
}
