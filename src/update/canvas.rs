//! Pointer and navigation handling on the canvas

use std::path::PathBuf;
use std::time::Instant;

use crate::cell_ref::{cell_ref, CellPosition};
use crate::commands::Cmd;
use crate::geometry::{bounds, hit_test, PanelHitTarget};
use crate::messages::{CanvasMsg, Direction, EditMsg, MenuMsg};
use crate::model::edit::EditTarget;
use crate::model::interaction::{resize_grid, DragState, Selection, RIGHT_CLICK_SLOP};
use crate::model::AppModel;

use super::{edit::update_edit, menu::update_menu};

/// Screen offset of the first panel opened from the command line
const OPEN_ORIGIN: (f64, f64) = (40.0, 60.0);
/// Diagonal step between panels opened together
const OPEN_STAGGER: f64 = 32.0;

pub fn update_canvas(model: &mut AppModel, msg: CanvasMsg) -> Option<Cmd> {
    match msg {
        CanvasMsg::LeftPress { x, y } => left_press(model, x, y),
        CanvasMsg::LeftRelease { .. } => {
            if model.interaction.drag.panel().is_some() {
                model.interaction.drag = DragState::Idle;
                Some(Cmd::Redraw)
            } else {
                None
            }
        }
        CanvasMsg::RightPress { x, y } => {
            let was_open = model.menu.visible;
            model.menu.close();
            model.interaction.drag = DragState::Panning {
                start_x: x,
                start_y: y,
                last_x: x,
                last_y: y,
            };
            was_open.then_some(Cmd::Redraw)
        }
        CanvasMsg::RightRelease { x, y } => right_release(model, x, y),
        CanvasMsg::PointerMoved { x, y } => pointer_moved(model, x, y),
        CanvasMsg::MoveSelection(direction) => move_selection(model, direction),
        CanvasMsg::CyclePanel => {
            let len = model.canvas.len();
            if len == 0 {
                return None;
            }
            let next = model.selected_panel().map_or(0, |idx| (idx + 1) % len);
            model.interaction.selection = Some(Selection {
                panel: next,
                col: 0,
                row: 0,
            });
            Some(Cmd::Redraw)
        }
        CanvasMsg::SelectCell { panel, cell } => select_cell(model, panel, cell),
        CanvasMsg::OpenFiles(paths) => open_files(model, paths),
    }
}

fn left_press(model: &mut AppModel, x: f64, y: f64) -> Option<Cmd> {
    if model.menu.visible {
        return match model.menu.item_at(x as i32, y as i32) {
            Some(item) => update_menu(model, MenuMsg::Activate(item)),
            None => update_menu(model, MenuMsg::Close),
        };
    }

    // Clicking anywhere else finishes the current edit
    if model.edit.is_active() {
        update_edit(model, EditMsg::Commit);
    }

    let camera = model.canvas.camera;
    let Some(hit) = hit_test(&model.canvas.panels, camera, x as i32, y as i32) else {
        model.interaction.selection = None;
        return Some(Cmd::Redraw);
    };

    let window = model.config.double_click_window();
    let is_double = model
        .interaction
        .register_click(hit.index, hit.target, Instant::now(), window);

    let panel = &model.canvas.panels[hit.index];
    match hit.target {
        PanelHitTarget::Header | PanelHitTarget::NameButton => {
            if is_double && hit.target == PanelHitTarget::NameButton {
                let name = panel.name.clone().unwrap_or_default();
                model
                    .edit
                    .begin(EditTarget::PanelName { panel: hit.index }, name);
                model.ui.reset_caret_blink();
                return Some(Cmd::Redraw);
            }
            let (wx, wy) = camera.screen_to_world(x, y);
            model.interaction.drag = DragState::Moving {
                index: hit.index,
                grab_x: wx - panel.x,
                grab_y: wy - panel.y,
            };
        }
        PanelHitTarget::ResizeHandle => {
            let b = bounds(panel, camera);
            model.interaction.drag = DragState::Resizing {
                index: hit.index,
                grab_x: x as i32 - (b.content_x + b.content_w),
                grab_y: y as i32 - (b.content_y + b.content_h),
            };
        }
        PanelHitTarget::Cell { col, row } => {
            let label = format!("{} {}", panel.display_name(hit.index), cell_ref(col, row));
            model.interaction.selection = Some(Selection {
                panel: hit.index,
                col,
                row,
            });
            model.ui.log(format!("Clicked {}", label));
            if is_double {
                return update_edit(model, EditMsg::BeginSelected);
            }
        }
    }

    Some(Cmd::Redraw)
}

fn right_release(model: &mut AppModel, x: f64, y: f64) -> Option<Cmd> {
    let DragState::Panning {
        start_x, start_y, ..
    } = model.interaction.drag
    else {
        return None;
    };
    model.interaction.drag = DragState::Idle;

    if (x - start_x).abs() >= RIGHT_CLICK_SLOP || (y - start_y).abs() >= RIGHT_CLICK_SLOP {
        return None;
    }

    let camera = model.canvas.camera;
    let target = hit_test(&model.canvas.panels, camera, x as i32, y as i32).map(|hit| hit.index);
    model.menu.open(
        (x as i32, y as i32),
        camera.screen_to_world(x, y),
        target,
    );
    Some(Cmd::Redraw)
}

fn pointer_moved(model: &mut AppModel, x: f64, y: f64) -> Option<Cmd> {
    model.interaction.mouse_x = x;
    model.interaction.mouse_y = y;

    match model.interaction.drag {
        DragState::Idle => {
            if model.menu.visible {
                update_menu(model, MenuMsg::Hover { x, y })
            } else {
                None
            }
        }
        DragState::Panning {
            start_x,
            start_y,
            last_x,
            last_y,
        } => {
            model.canvas.pan(x - last_x, y - last_y);
            model.interaction.drag = DragState::Panning {
                start_x,
                start_y,
                last_x: x,
                last_y: y,
            };
            Some(Cmd::Redraw)
        }
        DragState::Moving {
            index,
            grab_x,
            grab_y,
        } => {
            let (wx, wy) = model.canvas.camera.screen_to_world(x, y);
            let panel = model.canvas.panel_mut(index)?;
            panel.x = wx - grab_x;
            panel.y = wy - grab_y;
            Some(Cmd::Redraw)
        }
        DragState::Resizing {
            index,
            grab_x,
            grab_y,
        } => {
            let camera = model.canvas.camera;
            let panel = model.canvas.panel(index)?;
            let b = bounds(panel, camera);
            let w = x as i32 - b.content_x - grab_x;
            let h = y as i32 - b.content_y - grab_y;
            let (cols, rows) = resize_grid(w, h, panel.cell_width, panel.cell_height);
            if (cols, rows) == (panel.cols(), panel.rows()) {
                return None;
            }
            model.canvas.resize(index, cols, rows);
            model.clamp_selection();
            Some(Cmd::Redraw)
        }
    }
}

fn select_cell(model: &mut AppModel, index: usize, cell: CellPosition) -> Option<Cmd> {
    let Some(panel) = model.canvas.panel(index) else {
        model
            .ui
            .log_warning(format!("Cannot select {}: no panel {}", cell, index + 1));
        return Some(Cmd::Redraw);
    };
    let label = panel.display_name(index);
    if !cell.is_within(panel.cols(), panel.rows()) {
        model
            .ui
            .log_warning(format!("Cannot select {}: outside {}", cell, label));
        return Some(Cmd::Redraw);
    }

    model.interaction.selection = Some(Selection {
        panel: index,
        col: cell.col,
        row: cell.row,
    });
    model.ui.log(format!("Selected {} {}", label, cell));
    Some(Cmd::Redraw)
}

fn move_selection(model: &mut AppModel, direction: Direction) -> Option<Cmd> {
    let sel = model.interaction.selection?;
    let panel = model.canvas.panel(sel.panel)?;

    let (col, row) = match direction {
        Direction::Up => (sel.col, sel.row.saturating_sub(1)),
        Direction::Down => (sel.col, (sel.row + 1).min(panel.rows() - 1)),
        Direction::Left => (sel.col.saturating_sub(1), sel.row),
        Direction::Right => ((sel.col + 1).min(panel.cols() - 1), sel.row),
    };
    if (col, row) == (sel.col, sel.row) {
        return None;
    }

    model.interaction.selection = Some(Selection { col, row, ..sel });
    Some(Cmd::Redraw)
}

fn open_files(model: &mut AppModel, paths: Vec<PathBuf>) -> Option<Cmd> {
    let camera = model.canvas.camera;
    for (k, path) in paths.iter().enumerate() {
        let step = OPEN_STAGGER * k as f64;
        let (wx, wy) = camera.screen_to_world(OPEN_ORIGIN.0 + step, OPEN_ORIGIN.1 + step);
        match model.canvas.add_from_file(path, wx, wy) {
            Ok(_) => model.ui.log(format!("Opened {}", path.display())),
            Err(e) => model.ui.log_warning(format!("Failed to open {}", e)),
        }
    }
    Some(Cmd::Redraw)
}
