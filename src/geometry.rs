//! Panel geometry and hit testing
//!
//! All screen placement of a panel goes through [`bounds`], a pure function
//! of the panel's logical position/size and the camera offset. Nothing here
//! caches, so results can never go stale.

use crate::model::panel::Panel;

/// Horizontal padding between content and the panel border
pub const PANEL_PADDING_X: i32 = 4;
/// Vertical padding between content and the panel border
pub const PANEL_PADDING_Y: i32 = 4;
/// Height of the title bar above the content area
pub const PANEL_HEADER_HEIGHT: i32 = 20;
pub const PANEL_BORDER_WIDTH: i32 = 2;
/// Side of the square resize handle in the content's bottom-right corner
pub const RESIZE_HANDLE_SIZE: i32 = 12;
/// Inset of text inside cells and headers
pub const PANEL_INNER_PADDING: i32 = 6;
pub const NAME_BUTTON_WIDTH: i32 = 96;
pub const NAME_BUTTON_HEIGHT: i32 = 14;

/// Camera offset applied uniformly to every panel at render/hit-test time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
}

impl Camera {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a screen-space delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Convert a screen point to world coordinates
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (i32, i32) {
        ((sx - self.x) as i32, (sy - self.y) as i32)
    }
}

/// On-screen rectangles of a panel
///
/// `content_*` is the cell grid; `total_*` adds the header above and the
/// padding/border around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelBounds {
    pub content_x: i32,
    pub content_y: i32,
    pub content_w: i32,
    pub content_h: i32,
    pub total_x: i32,
    pub total_y: i32,
    pub total_w: i32,
    pub total_h: i32,
}

impl PanelBounds {
    /// Rectangle of the header name button, centered in the title bar
    pub fn name_button(&self) -> (i32, i32, i32, i32) {
        let x = self.content_x + self.content_w / 2 - NAME_BUTTON_WIDTH / 2;
        let y = self.content_y - PANEL_HEADER_HEIGHT + (PANEL_HEADER_HEIGHT - NAME_BUTTON_HEIGHT) / 2;
        (x, y, NAME_BUTTON_WIDTH, NAME_BUTTON_HEIGHT)
    }

    /// Top-left corner of the resize handle
    pub fn resize_handle(&self) -> (i32, i32) {
        (
            self.content_x + self.content_w - RESIZE_HANDLE_SIZE,
            self.content_y + self.content_h - RESIZE_HANDLE_SIZE,
        )
    }
}

/// Compute the screen rectangles for `panel` under `camera`
pub fn bounds(panel: &Panel, camera: Camera) -> PanelBounds {
    let content_x = (panel.x as f64 + camera.x) as i32;
    let content_y = (panel.y as f64 + camera.y) as i32;
    let content_w = panel.content_width();
    let content_h = panel.content_height();

    PanelBounds {
        content_x,
        content_y,
        content_w,
        content_h,
        total_x: content_x - PANEL_PADDING_X,
        total_y: content_y - PANEL_HEADER_HEIGHT,
        total_w: content_w + PANEL_PADDING_X * 2,
        total_h: content_h + PANEL_HEADER_HEIGHT + PANEL_PADDING_Y * 2,
    }
}

/// What part of a panel a screen point landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelHitTarget {
    /// Name button in the middle of the title bar
    NameButton,
    /// Rest of the title bar (drag to move)
    Header,
    /// Bottom-right resize handle
    ResizeHandle,
    /// A cell of a loaded panel
    Cell { col: usize, row: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelHit {
    pub index: usize,
    pub target: PanelHitTarget,
}

#[inline]
fn contains(x: i32, y: i32, rx: i32, ry: i32, rw: i32, rh: i32) -> bool {
    x >= rx && x <= rx + rw && y >= ry && y <= ry + rh
}

/// Find the topmost panel part under the screen point `(x, y)`.
///
/// Panels are checked last-to-first. Content clicks on unloaded placeholder
/// panels fall through to panels underneath.
pub fn hit_test(panels: &[Panel], camera: Camera, x: i32, y: i32) -> Option<PanelHit> {
    for (index, panel) in panels.iter().enumerate().rev() {
        let b = bounds(panel, camera);

        let header_y = b.content_y - PANEL_HEADER_HEIGHT;
        if contains(x, y, b.content_x, header_y, b.content_w, PANEL_HEADER_HEIGHT) {
            let (bx, by, bw, bh) = b.name_button();
            let target = if contains(x, y, bx, by, bw, bh) {
                PanelHitTarget::NameButton
            } else {
                PanelHitTarget::Header
            };
            return Some(PanelHit { index, target });
        }

        let (hx, hy) = b.resize_handle();
        if contains(x, y, hx, hy, RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE) {
            return Some(PanelHit {
                index,
                target: PanelHitTarget::ResizeHandle,
            });
        }

        if contains(x, y, b.content_x, b.content_y, b.content_w, b.content_h) {
            if !panel.loaded {
                continue;
            }
            let col = ((x - b.content_x) / panel.cell_width) as usize;
            let row = ((y - b.content_y) / panel.cell_height) as usize;
            if col < panel.cols() && row < panel.rows() {
                return Some(PanelHit {
                    index,
                    target: PanelHitTarget::Cell { col, row },
                });
            }
            // On the far edge of the grid: the panel still swallows the click
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_without_camera() {
        let panel = Panel::new_blank(100, 50, 8, 8);
        let b = bounds(&panel, Camera::default());
        assert_eq!((b.content_x, b.content_y), (100, 50));
        assert_eq!((b.content_w, b.content_h), (640, 192));
        assert_eq!((b.total_x, b.total_y), (96, 30));
        assert_eq!(b.total_w, 640 + 2 * PANEL_PADDING_X);
        assert_eq!(b.total_h, 192 + PANEL_HEADER_HEIGHT + 2 * PANEL_PADDING_Y);
    }

    #[test]
    fn test_bounds_truncates_camera_offset() {
        let panel = Panel::new_blank(10, 10, 1, 1);
        let b = bounds(&panel, Camera::new(2.9, -3.7));
        assert_eq!((b.content_x, b.content_y), (12, 6));
    }

    #[test]
    fn test_bounds_is_deterministic() {
        let panel = Panel::new_blank(-40, 7, 3, 9);
        let camera = Camera::new(13.5, 200.25);
        assert_eq!(bounds(&panel, camera), bounds(&panel, camera));
    }

    #[test]
    fn test_screen_to_world() {
        let camera = Camera::new(100.0, -20.0);
        assert_eq!(camera.screen_to_world(150.0, 30.0), (50, 50));
    }

    #[test]
    fn test_hit_test_cell() {
        let panels = vec![Panel::new_blank(0, 0, 5, 5)];
        let hit = hit_test(&panels, Camera::default(), 85, 30);
        assert_eq!(
            hit,
            Some(PanelHit {
                index: 0,
                target: PanelHitTarget::Cell { col: 1, row: 1 }
            })
        );
    }

    #[test]
    fn test_hit_test_header_and_name_button() {
        let panels = vec![Panel::new_blank(0, 0, 5, 5)];
        let camera = Camera::default();
        // 400px wide content: name button spans x 152..248
        assert_eq!(
            hit_test(&panels, camera, 10, -10).map(|h| h.target),
            Some(PanelHitTarget::Header)
        );
        assert_eq!(
            hit_test(&panels, camera, 200, -10).map(|h| h.target),
            Some(PanelHitTarget::NameButton)
        );
    }

    #[test]
    fn test_hit_test_resize_handle() {
        let panels = vec![Panel::new_blank(0, 0, 5, 5)];
        assert_eq!(
            hit_test(&panels, Camera::default(), 395, 115).map(|h| h.target),
            Some(PanelHitTarget::ResizeHandle)
        );
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let panels = vec![Panel::new_blank(0, 0, 5, 5), Panel::new_blank(40, 0, 5, 5)];
        let hit = hit_test(&panels, Camera::default(), 60, 30).map(|h| h.index);
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn test_hit_test_placeholder_content_falls_through() {
        let mut top = Panel::new_blank(40, 0, 5, 5);
        top.loaded = false;
        let panels = vec![Panel::new_blank(0, 0, 5, 5), top];
        let hit = hit_test(&panels, Camera::default(), 60, 30).map(|h| h.index);
        assert_eq!(hit, Some(0));
    }

    #[test]
    fn test_hit_test_respects_camera() {
        let panels = vec![Panel::new_blank(0, 0, 5, 5)];
        let camera = Camera::new(1000.0, 1000.0);
        assert_eq!(hit_test(&panels, camera, 10, 10), None);
        assert!(hit_test(&panels, camera, 1010, 1010).is_some());
    }
}
