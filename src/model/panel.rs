//! Panel - a movable, resizable grid of sparse text cells

use std::collections::HashMap;

use crate::cell_ref::CellPosition;

/// Default cell width in pixels
pub const DEFAULT_CELL_WIDTH: i32 = 80;
/// Default cell height in pixels
pub const DEFAULT_CELL_HEIGHT: i32 = 24;
/// Grid size used for new blank panels and load placeholders
pub const DEFAULT_PANEL_COLS: usize = 5;
pub const DEFAULT_PANEL_ROWS: usize = 5;

/// Grid content detached from any panel
///
/// Produced by CSV parsing (possibly on a worker thread) and merged into a
/// live [`Panel`] on the interactive thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelContent {
    pub cols: usize,
    pub rows: usize,
    pub cells: HashMap<CellPosition, String>,
}

impl PanelContent {
    /// Build content from parsed rows. Ragged rows are padded and the grid is
    /// never smaller than 1x1.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let row_count = rows.len().max(1);

        let mut cells = HashMap::new();
        for (r, record) in rows.into_iter().enumerate() {
            for (c, value) in record.into_iter().enumerate() {
                if !value.is_empty() {
                    cells.insert(CellPosition::new(c, r), value);
                }
            }
        }

        Self {
            cols,
            rows: row_count,
            cells,
        }
    }
}

/// A rectangular grid region on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Content top-left in world coordinates
    pub x: i32,
    pub y: i32,
    cols: usize,
    rows: usize,
    pub cell_width: i32,
    pub cell_height: i32,
    cells: HashMap<CellPosition, String>,
    /// Optional display name shown in the header
    pub name: Option<String>,
    /// Backing CSV file, relative to the state manifest unless absolute
    pub filename: Option<String>,
    /// False while the panel is a placeholder awaiting (or having failed) a load
    pub loaded: bool,
}

impl Panel {
    /// Create an empty, loaded panel with default cell dimensions
    pub fn new_blank(x: i32, y: i32, cols: usize, rows: usize) -> Self {
        Self {
            x,
            y,
            cols: cols.max(1),
            rows: rows.max(1),
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            cells: HashMap::new(),
            name: None,
            filename: None,
            loaded: true,
        }
    }

    /// Create an unloaded placeholder at the default grid size
    pub fn placeholder(x: i32, y: i32) -> Self {
        Self {
            loaded: false,
            ..Self::new_blank(x, y, DEFAULT_PANEL_COLS, DEFAULT_PANEL_ROWS)
        }
    }

    /// Override cell dimensions (builder style)
    pub fn with_cell_size(mut self, cell_width: i32, cell_height: i32) -> Self {
        self.cell_width = cell_width.max(1);
        self.cell_height = cell_height.max(1);
        self
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Content width in pixels
    #[inline]
    pub fn content_width(&self) -> i32 {
        self.cols as i32 * self.cell_width
    }

    /// Content height in pixels
    #[inline]
    pub fn content_height(&self) -> i32 {
        self.rows as i32 * self.cell_height
    }

    /// Text at `(col, row)`; empty when unset
    pub fn get_cell(&self, col: usize, row: usize) -> &str {
        self.cells
            .get(&CellPosition::new(col, row))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Write text at `(col, row)`. An empty value removes the entry, and
    /// positions outside the grid are ignored.
    pub fn set_cell(&mut self, col: usize, row: usize, value: impl Into<String>) {
        let pos = CellPosition::new(col, row);
        if !pos.is_within(self.cols, self.rows) {
            return;
        }
        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, value);
        }
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over non-empty cells
    pub fn cells(&self) -> impl Iterator<Item = (CellPosition, &str)> {
        self.cells.iter().map(|(pos, v)| (*pos, v.as_str()))
    }

    /// Change the grid size, clamped to at least 1x1.
    ///
    /// Cells outside the new bounds are dropped; growing the grid again does
    /// not bring them back.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        let cols = cols.max(1);
        let rows = rows.max(1);
        self.cells.retain(|pos, _| pos.is_within(cols, rows));
        self.cols = cols;
        self.rows = rows;
    }

    /// Replace grid size and cells with loaded content. Position, name and
    /// cell dimensions are kept.
    pub fn replace_content(&mut self, content: PanelContent) {
        self.cols = content.cols.max(1);
        self.rows = content.rows.max(1);
        let (cols, rows) = (self.cols, self.rows);
        self.cells = content
            .cells
            .into_iter()
            .filter(|(pos, value)| pos.is_within(cols, rows) && !value.is_empty())
            .collect();
    }

    /// Reset to an empty unloaded placeholder of the default size
    pub fn reset_to_placeholder(&mut self) {
        self.cols = DEFAULT_PANEL_COLS;
        self.rows = DEFAULT_PANEL_ROWS;
        self.cells.clear();
        self.loaded = false;
    }

    /// Index of the last row holding any non-empty cell
    pub fn last_used_row(&self) -> Option<usize> {
        self.cells.keys().map(|pos| pos.row).max()
    }

    /// Header label: the name if set, otherwise `"Panel N"` (1-based)
    pub fn display_name(&self, index: usize) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Panel {}", index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blank_panel() {
        let panel = Panel::new_blank(10, 20, 5, 5);
        assert_eq!((panel.x, panel.y), (10, 20));
        assert_eq!((panel.cols(), panel.rows()), (5, 5));
        assert_eq!(panel.cell_count(), 0);
        assert!(panel.loaded);
        assert!(panel.filename.is_none());
    }

    #[test]
    fn test_new_blank_clamps_to_one() {
        let panel = Panel::new_blank(0, 0, 0, 0);
        assert_eq!((panel.cols(), panel.rows()), (1, 1));
    }

    #[test]
    fn test_set_then_get_cell() {
        let mut panel = Panel::new_blank(0, 0, 3, 3);
        panel.set_cell(1, 2, "hello, world");
        assert_eq!(panel.get_cell(1, 2), "hello, world");
        assert_eq!(panel.get_cell(0, 0), "");
    }

    #[test]
    fn test_set_empty_removes_entry() {
        let mut panel = Panel::new_blank(0, 0, 3, 3);
        panel.set_cell(0, 0, "v");
        assert_eq!(panel.cell_count(), 1);
        panel.set_cell(0, 0, "");
        assert_eq!(panel.cell_count(), 0);
        assert_eq!(panel.get_cell(0, 0), "");
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut panel = Panel::new_blank(0, 0, 2, 2);
        panel.set_cell(5, 0, "nope");
        assert_eq!(panel.cell_count(), 0);
    }

    #[test]
    fn test_shrink_drops_and_grow_does_not_restore() {
        let mut panel = Panel::new_blank(0, 0, 5, 5);
        panel.set_cell(2, 2, "x");
        panel.set_cell(1, 1, "kept");

        panel.resize(2, 2);
        assert_eq!(panel.get_cell(2, 2), "");
        assert_eq!(panel.get_cell(1, 1), "kept");

        panel.resize(5, 5);
        assert_eq!(panel.get_cell(2, 2), "");
        assert_eq!(panel.cell_count(), 1);
    }

    #[test]
    fn test_resize_clamps_to_one() {
        let mut panel = Panel::new_blank(0, 0, 4, 4);
        panel.set_cell(0, 0, "a");
        panel.resize(0, 0);
        assert_eq!((panel.cols(), panel.rows()), (1, 1));
        assert_eq!(panel.get_cell(0, 0), "a");
    }

    #[test]
    fn test_content_from_ragged_rows() {
        let content = PanelContent::from_rows(vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["1".into()],
        ]);
        assert_eq!((content.cols, content.rows), (3, 2));
        assert_eq!(content.cells.len(), 4);
    }

    #[test]
    fn test_content_from_no_rows_is_one_by_one() {
        let content = PanelContent::from_rows(vec![]);
        assert_eq!((content.cols, content.rows), (1, 1));
        assert!(content.cells.is_empty());
    }

    #[test]
    fn test_replace_content_keeps_position_and_name() {
        let mut panel = Panel::new_blank(150, 250, 5, 5);
        panel.name = Some("Budget".to_string());
        panel.set_cell(4, 4, "old");

        let content = PanelContent::from_rows(vec![vec!["new".into(), "row".into()]]);
        panel.replace_content(content);

        assert_eq!((panel.x, panel.y), (150, 250));
        assert_eq!(panel.name.as_deref(), Some("Budget"));
        assert_eq!((panel.cols(), panel.rows()), (2, 1));
        assert_eq!(panel.get_cell(0, 0), "new");
        assert_eq!(panel.get_cell(4, 4), "");
    }

    #[test]
    fn test_last_used_row() {
        let mut panel = Panel::new_blank(0, 0, 3, 6);
        assert_eq!(panel.last_used_row(), None);
        panel.set_cell(0, 1, "a");
        panel.set_cell(2, 4, "b");
        assert_eq!(panel.last_used_row(), Some(4));
    }

    #[test]
    fn test_display_name() {
        let mut panel = Panel::new_blank(0, 0, 1, 1);
        assert_eq!(panel.display_name(0), "Panel 1");
        panel.name = Some(String::new());
        assert_eq!(panel.display_name(2), "Panel 3");
        panel.name = Some("Totals".to_string());
        assert_eq!(panel.display_name(2), "Totals");
    }
}
