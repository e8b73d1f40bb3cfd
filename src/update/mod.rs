//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod canvas;
mod edit;
mod menu;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use canvas::update_canvas;
pub use edit::update_edit;
pub use menu::update_menu;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Canvas(m) => canvas::update_canvas(model, m),
        Msg::Edit(m) => edit::update_edit(model, m),
        Msg::Menu(m) => menu::update_menu(model, m),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Skips the per-frame and per-motion messages so the log stays readable.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    use crate::messages::{AppMsg, CanvasMsg, MenuMsg};

    let is_noisy = matches!(
        &msg,
        Msg::App(AppMsg::Tick)
            | Msg::App(AppMsg::BlinkCaret)
            | Msg::Canvas(CanvasMsg::PointerMoved { .. })
            | Msg::Menu(MenuMsg::Hover { .. })
    );
    if is_noisy {
        return update_inner(model, msg);
    }

    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let panels_before = model.canvas.len();
    let result = update_inner(model, msg);
    if model.canvas.len() != panels_before {
        debug!(
            target: "message",
            before = panels_before,
            after = model.canvas.len(),
            "panel count changed"
        );
    }

    result
}

/// Get a display name for a message type
///
/// Example outputs:
/// - `Canvas::LeftPress { x: 10.0, y: 4.0 }`
/// - `Edit::InsertChar('x')`
/// - `App::Resize(1920, 1080)`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Canvas(m) => format!("Canvas::{:?}", m),
        Msg::Edit(m) => format!("Edit::{:?}", m),
        Msg::Menu(m) => format!("Menu::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}
