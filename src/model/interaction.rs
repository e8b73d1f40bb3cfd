//! Pointer interaction state - drags, selection and click tracking

use std::time::{Duration, Instant};

use crate::geometry::PanelHitTarget;

/// Right-button movement (in pixels, per axis) below which a release counts
/// as a click and opens the context menu
pub const RIGHT_CLICK_SLOP: f64 = 6.0;
/// Smallest content size a resize drag can produce
pub const MIN_RESIZE_WIDTH: i32 = 64;
pub const MIN_RESIZE_HEIGHT: i32 = 32;

/// What the pointer is currently dragging
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Right-button drag moving the camera
    Panning {
        start_x: f64,
        start_y: f64,
        last_x: f64,
        last_y: f64,
    },
    /// Header drag; `grab` is the cursor offset from the panel origin in
    /// world space
    Moving {
        index: usize,
        grab_x: i32,
        grab_y: i32,
    },
    /// Resize-handle drag; `grab` is the cursor offset from the content's
    /// bottom-right corner
    Resizing {
        index: usize,
        grab_x: i32,
        grab_y: i32,
    },
}

impl DragState {
    /// Panel directly manipulated by this drag
    pub fn panel(&self) -> Option<usize> {
        match *self {
            DragState::Moving { index, .. } | DragState::Resizing { index, .. } => Some(index),
            DragState::Idle | DragState::Panning { .. } => None,
        }
    }
}

/// The active cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub panel: usize,
    pub col: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Copy)]
struct ClickRecord {
    at: Instant,
    panel: usize,
    target: PanelHitTarget,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    pub drag: DragState,
    pub selection: Option<Selection>,
    /// Last known cursor position in screen space
    pub mouse_x: f64,
    pub mouse_y: f64,
    last_click: Option<ClickRecord>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panels the overlap resolver must not move this tick
    pub fn locked_panels(&self) -> Vec<usize> {
        self.drag.panel().into_iter().collect()
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, DragState::Idle)
    }

    /// Record a left click and report whether it completes a double click
    /// on the same panel part.
    pub fn register_click(
        &mut self,
        panel: usize,
        target: PanelHitTarget,
        now: Instant,
        window: Duration,
    ) -> bool {
        let is_double = self.last_click.is_some_and(|prev| {
            prev.panel == panel
                && prev.target == target
                && now.saturating_duration_since(prev.at) <= window
        });

        self.last_click = if is_double {
            // A third click starts a new sequence
            None
        } else {
            Some(ClickRecord {
                at: now,
                panel,
                target,
            })
        };
        is_double
    }

    /// Fix up stored indices after the panel at `removed` is deleted
    pub fn panel_removed(&mut self, removed: usize) {
        self.selection = match self.selection {
            Some(sel) if sel.panel == removed => None,
            Some(sel) if sel.panel > removed => Some(Selection {
                panel: sel.panel - 1,
                ..sel
            }),
            other => other,
        };

        if let Some(index) = self.drag.panel() {
            if index == removed {
                self.drag = DragState::Idle;
            } else if index > removed {
                self.drag = match self.drag {
                    DragState::Moving { grab_x, grab_y, .. } => DragState::Moving {
                        index: index - 1,
                        grab_x,
                        grab_y,
                    },
                    DragState::Resizing { grab_x, grab_y, .. } => DragState::Resizing {
                        index: index - 1,
                        grab_x,
                        grab_y,
                    },
                    other => other,
                };
            }
        }

        self.last_click = None;
    }
}

/// Grid size produced by a resize drag ending at content size `(w, h)`
pub fn resize_grid(w: i32, h: i32, cell_width: i32, cell_height: i32) -> (usize, usize) {
    let w = w.max(MIN_RESIZE_WIDTH);
    let h = h.max(MIN_RESIZE_HEIGHT);
    let cols = (w / cell_width.max(1)).max(1) as usize;
    let rows = (h / cell_height.max(1)).max(1) as usize;
    (cols, rows)
}
