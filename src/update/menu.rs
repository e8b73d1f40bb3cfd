//! Context menu actions

use std::path::PathBuf;

use crate::commands::Cmd;
use crate::csv_io::{file_name_of, write_panel_csv};
use crate::messages::MenuMsg;
use crate::model::menu::MenuItem;
use crate::model::AppModel;
use crate::state::resolve_panel_path;

pub fn update_menu(model: &mut AppModel, msg: MenuMsg) -> Option<Cmd> {
    match msg {
        MenuMsg::Hover { x, y } => {
            let hovered = model.menu.item_index_at(x as i32, y as i32);
            if hovered == model.menu.hovered {
                return None;
            }
            model.menu.hovered = hovered;
            Some(Cmd::Redraw)
        }
        MenuMsg::Close => {
            model.menu.close();
            Some(Cmd::Redraw)
        }
        MenuMsg::Activate(item) => activate(model, item),
        MenuMsg::LoadDialogResult {
            path,
            world_x,
            world_y,
        } => {
            let path = path?;
            match model.canvas.add_from_file(&path, world_x, world_y) {
                Ok(_) => model.ui.log(format!("Loaded {}", file_name_of(&path))),
                Err(e) => model.ui.log_warning(format!("Load failed: {}", e)),
            }
            Some(Cmd::Redraw)
        }
        MenuMsg::SaveDialogResult { panel, path } => {
            let path = path?;
            let Some(p) = model.canvas.panel_mut(panel) else {
                model.ui.log_warning("Save failed: panel no longer exists");
                return Some(Cmd::Redraw);
            };
            match write_panel_csv(&path, p) {
                Ok(()) => {
                    p.filename = Some(file_name_of(&path));
                    model.ui.log(format!("Saved panel to {}", path.display()));
                }
                Err(e) => model.ui.log_warning(format!("Save failed: {}", e)),
            }
            Some(Cmd::Redraw)
        }
    }
}

fn activate(model: &mut AppModel, item: MenuItem) -> Option<Cmd> {
    let (world_x, world_y) = (model.menu.world_x, model.menu.world_y);
    let target = model.menu.target;
    model.menu.close();

    match item {
        MenuItem::NewBlankPanel => {
            let (cols, rows) = (model.config.default_cols, model.config.default_rows);
            let index = model.canvas.add_blank(world_x, world_y, cols, rows);
            model.ui.log(format!("Created Panel {}", index + 1));
            Some(Cmd::Redraw)
        }
        MenuItem::LoadPanelFromFile => Some(Cmd::batch(vec![
            Cmd::Redraw,
            Cmd::ShowOpenPanelDialog {
                world_x,
                world_y,
                start_dir: manifest_dir(model),
            },
        ])),
        MenuItem::SavePanelTo => {
            let panel = target?;
            let p = model.canvas.panel(panel)?;
            let file = p
                .filename
                .clone()
                .unwrap_or_else(|| format!("panel_{}.csv", panel + 1));
            Some(Cmd::batch(vec![
                Cmd::Redraw,
                Cmd::ShowSavePanelDialog {
                    panel,
                    suggested_path: Some(resolve_panel_path(&model.state_path, &file)),
                },
            ]))
        }
        MenuItem::DeletePanel => {
            let index = target?;
            let removed = model.remove_panel(index)?;
            model
                .ui
                .log(format!("Deleted {}", removed.display_name(index)));
            Some(Cmd::Redraw)
        }
    }
}

/// Directory holding the manifest, used as the dialogs' starting point
fn manifest_dir(model: &AppModel) -> Option<PathBuf> {
    model
        .state_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.to_path_buf())
}
