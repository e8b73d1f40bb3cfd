//! Cell and panel-name editing

use crate::cell_ref::cell_ref;
use crate::commands::Cmd;
use crate::messages::EditMsg;
use crate::model::edit::EditTarget;
use crate::model::AppModel;

pub fn update_edit(model: &mut AppModel, msg: EditMsg) -> Option<Cmd> {
    match msg {
        EditMsg::BeginSelected => begin_selected(model, None),
        EditMsg::BeginWithChar(ch) => begin_selected(model, Some(ch)),
        EditMsg::Commit => commit(model),
        EditMsg::Cancel => {
            if !model.edit.is_active() {
                return None;
            }
            model.edit.cancel();
            Some(Cmd::Redraw)
        }
        other => {
            if !model.edit.is_active() {
                return None;
            }
            match other {
                EditMsg::InsertChar(ch) => model.edit.insert_char(ch),
                EditMsg::DeleteBackward => model.edit.backspace(),
                EditMsg::DeleteForward => model.edit.delete_forward(),
                EditMsg::CaretLeft => model.edit.move_left(),
                EditMsg::CaretRight => model.edit.move_right(),
                EditMsg::CaretHome => model.edit.move_home(),
                EditMsg::CaretEnd => model.edit.move_end(),
                EditMsg::BeginSelected
                | EditMsg::BeginWithChar(_)
                | EditMsg::Commit
                | EditMsg::Cancel => {}
            }
            model.ui.reset_caret_blink();
            Some(Cmd::Redraw)
        }
    }
}

/// Start editing the selected cell. With `first`, the cell text is replaced
/// by that character (typing over a cell); otherwise the current text is kept.
fn begin_selected(model: &mut AppModel, first: Option<char>) -> Option<Cmd> {
    let sel = model.interaction.selection?;
    let panel = model.canvas.panel(sel.panel)?;
    if !panel.loaded {
        return None;
    }

    let target = EditTarget::Cell {
        panel: sel.panel,
        col: sel.col,
        row: sel.row,
    };
    match first {
        Some(ch) => {
            model.edit.begin(target, String::new());
            model.edit.insert_char(ch);
        }
        None => {
            let text = panel.get_cell(sel.col, sel.row).to_string();
            model.edit.begin(target, text);
        }
    }
    model.ui.reset_caret_blink();
    Some(Cmd::Redraw)
}

fn commit(model: &mut AppModel) -> Option<Cmd> {
    let (target, text) = model.edit.finish()?;

    match target {
        EditTarget::Cell { panel, col, row } => {
            if model.canvas.get_cell(panel, col, row) != text {
                model.canvas.set_cell(panel, col, row, text);
                if let Some(p) = model.canvas.panel(panel) {
                    let label = format!("Edited {} {}", p.display_name(panel), cell_ref(col, row));
                    model.ui.log(label);
                }
            }
        }
        EditTarget::PanelName { panel } => {
            let Some(p) = model.canvas.panel_mut(panel) else {
                return Some(Cmd::Redraw);
            };
            let trimmed = text.trim();
            p.name = (!trimmed.is_empty()).then(|| trimmed.to_string());
            let label = format!("Renamed panel to {}", p.display_name(panel));
            model.ui.log(label);
        }
    }

    Some(Cmd::Redraw)
}
