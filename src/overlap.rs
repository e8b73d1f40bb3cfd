//! Gradual overlap resolution between panels
//!
//! Panels that sit closer than [`PANEL_GAP`] horizontally while also
//! overlapping vertically are pushed apart one pixel per tick. Only one pair
//! is corrected per call, so piles of panels separate smoothly over many
//! frames instead of jumping.
//!
//! Separation happens only along X. Panels stacked vertically on top of each
//! other are left alone.

use crate::geometry::{PANEL_HEADER_HEIGHT, PANEL_PADDING_X, PANEL_PADDING_Y};
use crate::model::panel::Panel;

/// Minimum horizontal spacing kept between panels
pub const PANEL_GAP: i32 = PANEL_PADDING_X;

/// A single correction made by [`resolve_one_overlap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nudge {
    /// Index of the panel that moved
    pub moved: usize,
    /// Index of the panel it was pushed away from
    pub from: usize,
    /// Applied X delta (always +1 or -1)
    pub dx: i32,
}

/// Horizontal and vertical extents used for separation checks
#[derive(Debug, Clone, Copy)]
struct Extents {
    left: i32,
    width: i32,
    top: i32,
    height: i32,
}

impl Extents {
    fn of(panel: &Panel) -> Self {
        Self {
            left: panel.x - PANEL_PADDING_X,
            width: panel.content_width() + PANEL_PADDING_X * 2,
            top: panel.y - PANEL_HEADER_HEIGHT,
            height: panel.content_height() + PANEL_HEADER_HEIGHT + PANEL_PADDING_Y * 2,
        }
    }

    #[inline]
    fn right(&self) -> i32 {
        self.left + self.width
    }

    #[inline]
    fn bottom(&self) -> i32 {
        self.top + self.height
    }

    #[inline]
    fn center_x(&self) -> i32 {
        self.left + self.width / 2
    }
}

/// How far `a` and `b` are from satisfying the horizontal gap, or 0 if they
/// already do.
fn horizontal_violation(a: &Extents, b: &Extents) -> i32 {
    let overlap = a.right().min(b.right()) - a.left.max(b.left);

    let gap = if a.right() < b.left {
        b.left - a.right()
    } else if b.right() < a.left {
        a.left - b.right()
    } else {
        -overlap
    };

    if overlap > 0 {
        overlap + PANEL_GAP
    } else if gap < PANEL_GAP {
        PANEL_GAP - gap
    } else {
        0
    }
}

fn overlaps_vertically(a: &Extents, b: &Extents) -> bool {
    a.bottom().min(b.bottom()) - a.top.max(b.top) > 0
}

/// Remaining horizontal violation between two panels (0 = satisfied).
///
/// Returns 0 for pairs that do not overlap vertically, since those are never
/// corrected.
pub fn pair_violation(a: &Panel, b: &Panel) -> i32 {
    let (ea, eb) = (Extents::of(a), Extents::of(b));
    if !overlaps_vertically(&ea, &eb) {
        return 0;
    }
    horizontal_violation(&ea, &eb)
}

/// Find the first crowded pair (in collection order) whose members are both
/// unlocked, and move the later panel one pixel away from the earlier one.
///
/// `locked` holds indices under direct user manipulation; pairs involving
/// them are skipped.
pub fn resolve_one_overlap(panels: &mut [Panel], locked: &[usize]) -> Option<Nudge> {
    let count = panels.len();
    for i in 0..count {
        if locked.contains(&i) {
            continue;
        }
        let a = Extents::of(&panels[i]);

        for j in (i + 1)..count {
            if locked.contains(&j) {
                continue;
            }
            let b = Extents::of(&panels[j]);

            if horizontal_violation(&a, &b) <= 0 {
                continue;
            }
            if !overlaps_vertically(&a, &b) {
                continue;
            }

            let dx = if a.center_x() < b.center_x() { 1 } else { -1 };
            panels[j].x += dx;

            tracing::trace!(moved = j, from = i, dx, "overlap nudge");
            return Some(Nudge {
                moved: j,
                from: i,
                dx,
            });
        }
    }
    None
}
