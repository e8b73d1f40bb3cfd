//! Keyboard input handling
//!
//! Maps winit key events to messages. While a cell or panel name is being
//! edited every key goes to the edit; otherwise keys drive selection,
//! persistence and the menu.

use winit::keyboard::{Key, NamedKey};

use cellchain::commands::Cmd;
use cellchain::messages::{AppMsg, CanvasMsg, Direction, EditMsg, MenuMsg, Msg};
use cellchain::model::AppModel;
use cellchain::update::update;

/// Handle a pressed key with the current modifier state
pub fn handle_key(model: &mut AppModel, key: Key, ctrl: bool, logo: bool) -> Option<Cmd> {
    let command = ctrl || logo;

    // Shortcuts that apply regardless of focus
    if command {
        if let Key::Character(ref s) = key {
            match s.to_lowercase().as_str() {
                "s" => return update(model, Msg::App(AppMsg::SaveState)),
                "o" => return update(model, Msg::App(AppMsg::LoadState)),
                "q" => return update(model, Msg::App(AppMsg::Quit)),
                _ => {}
            }
        }
        return None;
    }

    if model.edit.is_active() {
        return handle_edit_key(model, key);
    }

    match key {
        Key::Named(NamedKey::ArrowUp) => move_selection(model, Direction::Up),
        Key::Named(NamedKey::ArrowDown) => move_selection(model, Direction::Down),
        Key::Named(NamedKey::ArrowLeft) => move_selection(model, Direction::Left),
        Key::Named(NamedKey::ArrowRight) => move_selection(model, Direction::Right),
        Key::Named(NamedKey::Tab) => update(model, Msg::Canvas(CanvasMsg::CyclePanel)),
        Key::Named(NamedKey::Enter) | Key::Named(NamedKey::F2) => {
            update(model, Msg::Edit(EditMsg::BeginSelected))
        }
        Key::Named(NamedKey::Escape) if model.menu.visible => {
            update(model, Msg::Menu(MenuMsg::Close))
        }
        Key::Named(NamedKey::Space) => update(model, Msg::Edit(EditMsg::BeginWithChar(' '))),
        Key::Character(ref s) => {
            let ch = s.chars().next()?;
            update(model, Msg::Edit(EditMsg::BeginWithChar(ch)))
        }
        _ => None,
    }
}

fn move_selection(model: &mut AppModel, direction: Direction) -> Option<Cmd> {
    update(model, Msg::Canvas(CanvasMsg::MoveSelection(direction)))
}

fn handle_edit_key(model: &mut AppModel, key: Key) -> Option<Cmd> {
    let msg = match key {
        Key::Named(NamedKey::Enter) | Key::Named(NamedKey::Tab) => EditMsg::Commit,
        Key::Named(NamedKey::Escape) => EditMsg::Cancel,
        Key::Named(NamedKey::Backspace) => EditMsg::DeleteBackward,
        Key::Named(NamedKey::Delete) => EditMsg::DeleteForward,
        Key::Named(NamedKey::ArrowLeft) => EditMsg::CaretLeft,
        Key::Named(NamedKey::ArrowRight) => EditMsg::CaretRight,
        Key::Named(NamedKey::Home) => EditMsg::CaretHome,
        Key::Named(NamedKey::End) => EditMsg::CaretEnd,
        Key::Named(NamedKey::Space) => EditMsg::InsertChar(' '),
        Key::Character(ref s) => {
            // Multi-char input (IME, dead keys) arrives as one string
            let mut result = None;
            for ch in s.chars() {
                result = update(model, Msg::Edit(EditMsg::InsertChar(ch))).or(result);
            }
            return result;
        }
        _ => return None,
    };
    update(model, Msg::Edit(msg))
}
