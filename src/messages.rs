//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Pointer positions are
//! in screen pixels; the update functions convert to world space.

use std::path::PathBuf;

use crate::cell_ref::CellPosition;
use crate::model::menu::MenuItem;

/// Direction for selection movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Pointer and navigation messages on the canvas
#[derive(Debug, Clone)]
pub enum CanvasMsg {
    /// Left button pressed
    LeftPress { x: f64, y: f64 },
    /// Left button released
    LeftRelease { x: f64, y: f64 },
    /// Right button pressed (starts a pan)
    RightPress { x: f64, y: f64 },
    /// Right button released (opens the menu if the pointer barely moved)
    RightRelease { x: f64, y: f64 },
    /// Pointer moved
    PointerMoved { x: f64, y: f64 },
    /// Move the selected cell (arrow keys)
    MoveSelection(Direction),
    /// Select the next panel (Tab)
    CyclePanel,
    /// Select a cell by position; ignored with a warning if it is off the grid
    SelectCell { panel: usize, cell: CellPosition },
    /// Open CSV files as panels, staggered from the view's top-left
    OpenFiles(Vec<PathBuf>),
}

/// Caret editing of a cell or panel name
#[derive(Debug, Clone)]
pub enum EditMsg {
    /// Start editing the selected cell (Enter)
    BeginSelected,
    /// Start editing the selected cell, replacing its text with `char`
    BeginWithChar(char),
    InsertChar(char),
    DeleteBackward,
    DeleteForward,
    CaretLeft,
    CaretRight,
    CaretHome,
    CaretEnd,
    /// Write the edit back (Enter)
    Commit,
    /// Drop the edit (Escape)
    Cancel,
}

/// Context menu messages
#[derive(Debug, Clone)]
pub enum MenuMsg {
    /// Pointer moved over the open menu
    Hover { x: f64, y: f64 },
    /// Run a menu item against the menu's target
    Activate(MenuItem),
    Close,
    /// Open dialog returned a path (or None if cancelled)
    LoadDialogResult {
        path: Option<PathBuf>,
        world_x: i32,
        world_y: i32,
    },
    /// Save dialog returned a path (or None if cancelled)
    SaveDialogResult { panel: usize, path: Option<PathBuf> },
}

/// Application-level messages
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Frame tick: merge finished loads and resolve one overlap
    Tick,
    /// Toggle the edit caret
    BlinkCaret,
    /// Window resized
    Resize(u32, u32),
    /// Save the canvas manifest (Ctrl+S)
    SaveState,
    /// Load the canvas manifest (Ctrl+O)
    LoadState,
    Quit,
}

/// Top-level message
#[derive(Debug, Clone)]
pub enum Msg {
    Canvas(CanvasMsg),
    Edit(EditMsg),
    Menu(MenuMsg),
    App(AppMsg),
}

impl Msg {
    pub fn tick() -> Self {
        Msg::App(AppMsg::Tick)
    }

    pub fn resize(width: u32, height: u32) -> Self {
        Msg::App(AppMsg::Resize(width, height))
    }
}
