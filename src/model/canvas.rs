//! Canvas - the ordered panel collection, camera and background loader
//!
//! Panels are identified by their index. The last panel is drawn on top and
//! is picked first by hit testing.

use std::path::{Path, PathBuf};

use crate::csv_io::{file_name_of, read_panel_csv, PanelIoError};
use crate::geometry::Camera;
use crate::loader::{ApplyReport, PanelLoader};
use crate::overlap::{resolve_one_overlap, Nudge};

use super::panel::{Panel, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH};

#[derive(Debug)]
pub struct Canvas {
    pub panels: Vec<Panel>,
    pub camera: Camera,
    loader: PanelLoader,
    /// Cell size applied to newly created panels
    cell_width: i32,
    cell_height: i32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_cell_size(DEFAULT_CELL_WIDTH, DEFAULT_CELL_HEIGHT)
    }

    pub fn with_cell_size(cell_width: i32, cell_height: i32) -> Self {
        Self {
            panels: Vec::new(),
            camera: Camera::default(),
            loader: PanelLoader::new(),
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn panel(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    pub fn panel_mut(&mut self, index: usize) -> Option<&mut Panel> {
        self.panels.get_mut(index)
    }

    /// Panel with this canvas's default cell size
    pub fn make_blank(&self, x: i32, y: i32, cols: usize, rows: usize) -> Panel {
        Panel::new_blank(x, y, cols, rows).with_cell_size(self.cell_width, self.cell_height)
    }

    /// Make a placeholder with this canvas's default cell size
    pub fn make_placeholder(&self, x: i32, y: i32) -> Panel {
        Panel::placeholder(x, y).with_cell_size(self.cell_width, self.cell_height)
    }

    /// Append an empty, loaded panel and return its index
    pub fn add_blank(&mut self, x: i32, y: i32, cols: usize, rows: usize) -> usize {
        let panel = self.make_blank(x, y, cols, rows);
        self.panels.push(panel);
        tracing::debug!(index = self.panels.len() - 1, x, y, cols, rows, "added blank panel");
        self.panels.len() - 1
    }

    /// Synchronously parse `path` and append it as a loaded panel.
    ///
    /// On error nothing is added.
    pub fn add_from_file(&mut self, path: &Path, x: i32, y: i32) -> Result<usize, PanelIoError> {
        let content = read_panel_csv(path)?;

        let mut panel = self.make_blank(x, y, 1, 1);
        panel.replace_content(content);
        panel.filename = Some(file_name_of(path));
        self.panels.push(panel);

        let index = self.panels.len() - 1;
        tracing::info!(index, path = %path.display(), "added panel from file");
        Ok(index)
    }

    /// Remove the panel at `index`. Out-of-range indices are ignored and the
    /// backing file is never touched.
    pub fn remove_at(&mut self, index: usize) -> Option<Panel> {
        if index >= self.panels.len() {
            return None;
        }
        tracing::debug!(index, "removed panel");
        self.loader.panel_removed(index);
        Some(self.panels.remove(index))
    }

    /// Resize the grid of the panel at `index` (clamped to at least 1x1)
    pub fn resize(&mut self, index: usize, cols: usize, rows: usize) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.resize(cols, rows);
        }
    }

    /// Cell text, or `""` when the panel or cell does not exist
    pub fn get_cell(&self, index: usize, col: usize, row: usize) -> &str {
        self.panels
            .get(index)
            .map(|panel| panel.get_cell(col, row))
            .unwrap_or("")
    }

    pub fn set_cell(&mut self, index: usize, col: usize, row: usize, value: impl Into<String>) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.set_cell(col, row, value);
        }
    }

    /// Start a background load of `path` into the panel at `index`
    pub fn schedule_load(&mut self, index: usize, path: PathBuf) {
        self.loader.schedule_load(index, path);
    }

    /// Merge every finished background load
    pub fn apply_pending_loads(&mut self) -> ApplyReport {
        self.loader.apply_pending(&mut self.panels)
    }

    pub fn pending_loads(&self) -> usize {
        self.loader.in_flight()
    }

    /// Run one overlap-resolution step, leaving `locked` panels alone
    pub fn resolve_overlap(&mut self, locked: &[usize]) -> Option<Nudge> {
        resolve_one_overlap(&mut self.panels, locked)
    }

    /// Move the camera by a screen-space delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.camera.pan(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_blank_returns_index() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.add_blank(0, 0, 5, 5), 0);
        assert_eq!(canvas.add_blank(100, 0, 2, 3), 1);
        assert_eq!(canvas.len(), 2);
        let panel = canvas.panel(1).unwrap();
        assert!(panel.loaded);
        assert_eq!((panel.cols(), panel.rows()), (2, 3));
    }

    #[test]
    fn test_custom_cell_size_applies_to_new_panels() {
        let mut canvas = Canvas::with_cell_size(100, 30);
        let idx = canvas.add_blank(0, 0, 2, 2);
        let panel = canvas.panel(idx).unwrap();
        assert_eq!(panel.content_width(), 200);
        assert_eq!(panel.content_height(), 60);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut canvas = Canvas::new();
        canvas.add_blank(0, 0, 1, 1);
        canvas.add_blank(200, 0, 1, 1);

        assert!(canvas.remove_at(5).is_none());
        assert!(canvas.remove_at(usize::MAX).is_none());
        assert!(canvas.remove_at(2).is_none());
        assert_eq!(canvas.len(), 2);

        let removed = canvas.remove_at(0).unwrap();
        assert_eq!(removed.x, 0);
        assert_eq!(canvas.panel(0).map(|p| p.x), Some(200));
    }

    #[test]
    fn test_cell_access_on_missing_panel() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.get_cell(3, 0, 0), "");
        canvas.set_cell(3, 0, 0, "ignored");
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_set_cell_is_idempotent() {
        let mut canvas = Canvas::new();
        let idx = canvas.add_blank(0, 0, 3, 3);
        canvas.set_cell(idx, 1, 1, "v");
        canvas.set_cell(idx, 1, 1, "v");
        assert_eq!(canvas.get_cell(idx, 1, 1), "v");
        assert_eq!(canvas.panel(idx).unwrap().cell_count(), 1);
    }

    #[test]
    fn test_add_from_missing_file_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = Canvas::new();
        let result = canvas.add_from_file(&dir.path().join("nope.csv"), 0, 0);
        assert!(result.is_err());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_add_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.csv");
        std::fs::write(&path, "1,2\n3,4\n5,6\n").unwrap();

        let mut canvas = Canvas::new();
        let idx = canvas.add_from_file(&path, 40, 60).unwrap();
        let panel = canvas.panel(idx).unwrap();
        assert_eq!((panel.x, panel.y), (40, 60));
        assert_eq!((panel.cols(), panel.rows()), (2, 3));
        assert_eq!(panel.get_cell(1, 2), "6");
        assert_eq!(panel.filename.as_deref(), Some("numbers.csv"));
        assert!(panel.loaded);
    }

    #[test]
    fn test_pan_moves_camera_only() {
        let mut canvas = Canvas::new();
        canvas.add_blank(10, 10, 1, 1);
        canvas.pan(5.0, -2.5);
        assert_eq!(canvas.camera, Camera::new(5.0, -2.5));
        assert_eq!(canvas.panel(0).map(|p| (p.x, p.y)), Some((10, 10)));
    }
}
