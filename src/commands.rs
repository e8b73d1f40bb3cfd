//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw
    Redraw,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
    /// Show a native open dialog; the chosen file becomes a panel at the
    /// given world position
    ShowOpenPanelDialog {
        world_x: i32,
        world_y: i32,
        start_dir: Option<PathBuf>,
    },
    /// Show a native save dialog for a panel's CSV
    ShowSavePanelDialog {
        panel: usize,
        suggested_path: Option<PathBuf>,
    },
    /// Request application exit
    Quit,
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            Cmd::ShowOpenPanelDialog { .. } | Cmd::ShowSavePanelDialog { .. } => true,
            Cmd::Quit => false,
        }
    }
}
