use std::fmt;
use std::str::FromStr;

use crate::geometry::{Rect, Size};

/// Half of the viewport a window can be snapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapZone {
    Left,
    Right,
    Top,
    Bottom,
}

impl SnapZone {
    /// Evaluation order when a rectangle is near more than one edge.
    pub const ORDER: [SnapZone; 4] = [
        SnapZone::Left,
        SnapZone::Right,
        SnapZone::Top,
        SnapZone::Bottom,
    ];

    fn is_near(self, rect: &Rect, viewport: Size, threshold: i32) -> bool {
        match self {
            SnapZone::Left => rect.x < threshold,
            SnapZone::Right => rect.right() > viewport.width - threshold,
            SnapZone::Top => rect.y < threshold,
            SnapZone::Bottom => rect.bottom() > viewport.height - threshold,
        }
    }
}

impl fmt::Display for SnapZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SnapZone::Left => "left",
            SnapZone::Right => "right",
            SnapZone::Top => "top",
            SnapZone::Bottom => "bottom",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SnapZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(SnapZone::Left),
            "right" => Ok(SnapZone::Right),
            "top" => Ok(SnapZone::Top),
            "bottom" => Ok(SnapZone::Bottom),
            other => Err(format!("unknown snap zone '{other}'")),
        }
    }
}

/// Pull each axis flush against a viewport edge when the rectangle comes
/// within `threshold` pixels of it (or crosses it). Size never changes; on
/// each axis the left/top edge wins over the right/bottom one.
pub fn edge_snap(rect: Rect, viewport: Size, threshold: i32) -> Rect {
    let mut out = rect;
    if SnapZone::Left.is_near(&rect, viewport, threshold) {
        out.x = 0;
    } else if SnapZone::Right.is_near(&rect, viewport, threshold) {
        out.x = viewport.width - rect.width;
    }
    if SnapZone::Top.is_near(&rect, viewport, threshold) {
        out.y = 0;
    } else if SnapZone::Bottom.is_near(&rect, viewport, threshold) {
        out.y = viewport.height - rect.height;
    }
    out
}

/// The rectangle covering `zone`. Odd viewport extents give the extra pixel
/// to the right/bottom half.
pub fn snap_half(zone: SnapZone, viewport: Size) -> Rect {
    let half_w = viewport.width / 2;
    let half_h = viewport.height / 2;
    match zone {
        SnapZone::Left => Rect::new(0, 0, half_w, viewport.height),
        SnapZone::Right => Rect::new(half_w, 0, viewport.width - half_w, viewport.height),
        SnapZone::Top => Rect::new(0, 0, viewport.width, half_h),
        SnapZone::Bottom => Rect::new(0, half_h, viewport.width, viewport.height - half_h),
    }
}

/// First zone in [`SnapZone::ORDER`] whose edge `rect` is near, with the
/// half-viewport rectangle it maps to.
pub fn half_snap(rect: Rect, viewport: Size, threshold: i32) -> Option<(SnapZone, Rect)> {
    SnapZone::ORDER
        .into_iter()
        .find(|zone| zone.is_near(&rect, viewport, threshold))
        .map(|zone| (zone, snap_half(zone, viewport)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Size = Size::new(1920, 1080);

    #[test]
    fn edge_snap_pulls_to_left() {
        let r = edge_snap(Rect::new(15, 200, 800, 600), VIEW, 20);
        assert_eq!(r, Rect::new(0, 200, 800, 600));
    }

    #[test]
    fn edge_snap_pulls_to_right_and_bottom() {
        let r = edge_snap(Rect::new(1110, 470, 800, 600), VIEW, 20);
        assert_eq!(r, Rect::new(1120, 480, 800, 600));
    }

    #[test]
    fn edge_snap_ignores_distant_rects() {
        let r = Rect::new(20, 300, 800, 600);
        assert_eq!(edge_snap(r, VIEW, 20), r);
    }

    #[test]
    fn edge_snap_pulls_back_crossed_edges() {
        let r = edge_snap(Rect::new(-40, -5, 800, 600), VIEW, 20);
        assert_eq!(r.position(), crate::geometry::Point::new(0, 0));
    }

    #[test]
    fn half_rects_cover_viewport() {
        assert_eq!(snap_half(SnapZone::Left, VIEW), Rect::new(0, 0, 960, 1080));
        assert_eq!(snap_half(SnapZone::Right, VIEW), Rect::new(960, 0, 960, 1080));
        assert_eq!(snap_half(SnapZone::Top, VIEW), Rect::new(0, 0, 1920, 540));
        assert_eq!(
            snap_half(SnapZone::Bottom, Size::new(101, 101)),
            Rect::new(0, 50, 101, 51)
        );
    }

    #[test]
    fn half_snap_prefers_left_over_top() {
        let (zone, rect) = half_snap(Rect::new(5, 5, 400, 300), VIEW, 20).unwrap();
        assert_eq!(zone, SnapZone::Left);
        assert_eq!(rect, Rect::new(0, 0, 960, 1080));
    }

    #[test]
    fn half_snap_right_before_bottom() {
        let (zone, _) = half_snap(Rect::new(1600, 800, 400, 300), VIEW, 20).unwrap();
        assert_eq!(zone, SnapZone::Right);
        let (zone, _) = half_snap(Rect::new(500, 800, 400, 300), VIEW, 20).unwrap();
        assert_eq!(zone, SnapZone::Bottom);
    }

    #[test]
    fn half_snap_none_in_the_middle() {
        assert!(half_snap(Rect::new(500, 200, 400, 300), VIEW, 20).is_none());
    }

    #[test]
    fn zone_parses() {
        assert_eq!("Left".parse::<SnapZone>(), Ok(SnapZone::Left));
        assert!("middle".parse::<SnapZone>().is_err());
        assert_eq!(SnapZone::Bottom.to_string(), "bottom");
    }
}
