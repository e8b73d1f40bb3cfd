//! Cellchain - an infinite canvas of spreadsheet panels
//!
//! This crate provides the core types and logic for the canvas, laid out
//! in the Elm Architecture pattern: messages in, model updates, commands out.
//! Windowing and rendering live in the binary.

pub mod cell_ref;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod csv_io;
pub mod geometry;
pub mod loader;
pub mod messages;
pub mod model;
pub mod overlap;
pub mod state;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::AppConfig;
pub use messages::Msg;
pub use model::AppModel;
pub use theme::Theme;
