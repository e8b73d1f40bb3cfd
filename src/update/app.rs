//! Application-level updates: frame tick, persistence, window

use crate::commands::Cmd;
use crate::csv_io::file_name_of;
use crate::messages::AppMsg;
use crate::model::interaction::DragState;
use crate::model::ui::CARET_BLINK_INTERVAL;
use crate::model::AppModel;
use crate::state::{load_state, save_state};

pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::Tick => tick(model),
        AppMsg::BlinkCaret => {
            if model.edit.is_active() && model.ui.update_caret_blink(CARET_BLINK_INTERVAL) {
                Some(Cmd::Redraw)
            } else {
                None
            }
        }
        AppMsg::Resize(width, height) => {
            model.window_size = (width, height);
            Some(Cmd::Redraw)
        }
        AppMsg::SaveState => {
            let path = model.state_path.clone();
            match save_state(&mut model.canvas, &path) {
                Ok(summary) => model.ui.log(format!(
                    "Saved {} panels to {}",
                    summary.panels,
                    path.display()
                )),
                Err(e) => model.ui.log_error(format!("Save failed: {:#}", e)),
            }
            Some(Cmd::Redraw)
        }
        AppMsg::LoadState => {
            // Indices are about to be repurposed
            model.edit.cancel();
            model.menu.close();
            model.interaction.selection = None;
            model.interaction.drag = DragState::Idle;

            let path = model.state_path.clone();
            match load_state(&mut model.canvas, &path) {
                Ok(summary) => model.ui.log(format!(
                    "Loading {} panels from {}",
                    summary.panels,
                    path.display()
                )),
                Err(e) => model.ui.log_error(format!("Load failed: {:#}", e)),
            }
            Some(Cmd::Redraw)
        }
        AppMsg::Quit => Some(Cmd::Quit),
    }
}

/// Merge finished background loads, then take one overlap-resolution step.
///
/// A merge can shrink a grid under the selection, so the selection is
/// clamped afterwards.
fn tick(model: &mut AppModel) -> Option<Cmd> {
    let report = model.canvas.apply_pending_loads();
    for failure in &report.failures {
        model.ui.log_warning(format!(
            "Failed to load {}: {}",
            file_name_of(&failure.path),
            failure.message
        ));
    }
    if !report.applied.is_empty() {
        model.clamp_selection();
    }

    let locked = model.interaction.locked_panels();
    let nudged = model.canvas.resolve_overlap(&locked).is_some();

    (nudged || !report.is_empty()).then_some(Cmd::Redraw)
}
