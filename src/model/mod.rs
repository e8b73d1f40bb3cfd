//! Application model - the complete state of the canvas app
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod canvas;
pub mod edit;
pub mod interaction;
pub mod menu;
pub mod panel;
pub mod ui;

pub use canvas::Canvas;
pub use edit::{EditState, EditTarget};
pub use interaction::{DragState, InteractionState, Selection};
pub use menu::{ContextMenuState, MenuItem};
pub use panel::{Panel, PanelContent};
pub use ui::UiState;

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::theme::Theme;

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    /// Panels, camera and background loader
    pub canvas: Canvas,
    pub interaction: InteractionState,
    pub edit: EditState,
    pub menu: ContextMenuState,
    /// Activity log and caret blink
    pub ui: UiState,
    pub theme: Theme,
    pub config: AppConfig,
    /// Window dimensions
    pub window_size: (u32, u32),
    /// Manifest used by save/load
    pub state_path: PathBuf,
}

impl AppModel {
    pub fn new(window_width: u32, window_height: u32, config: AppConfig) -> Self {
        let state_path = config.state_file.clone();
        Self {
            canvas: Canvas::with_cell_size(config.cell_width, config.cell_height),
            interaction: InteractionState::new(),
            edit: EditState::new(),
            menu: ContextMenuState::new(),
            ui: UiState::new(),
            theme: Theme::default(),
            config,
            window_size: (window_width, window_height),
            state_path,
        }
    }

    /// Panel index of the current selection, if any
    pub fn selected_panel(&self) -> Option<usize> {
        self.interaction
            .selection
            .map(|sel| sel.panel)
            .filter(|&idx| idx < self.canvas.len())
    }

    /// Keep the selection inside its panel after the grid shrank
    pub fn clamp_selection(&mut self) {
        let Some(sel) = self.interaction.selection else {
            return;
        };
        if let Some(panel) = self.canvas.panel(sel.panel) {
            self.interaction.selection = Some(Selection {
                col: sel.col.min(panel.cols() - 1),
                row: sel.row.min(panel.rows() - 1),
                ..sel
            });
        }
    }

    /// Remove a panel and fix up every stored index that referred past it
    pub fn remove_panel(&mut self, index: usize) -> Option<Panel> {
        let removed = self.canvas.remove_at(index)?;
        self.interaction.panel_removed(index);
        self.edit.panel_removed(index);
        self.menu.panel_removed(index);
        Some(removed)
    }
}
