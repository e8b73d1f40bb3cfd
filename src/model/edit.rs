//! In-place text editing for cells and panel names
//!
//! The caret is a char index into `text`, never a byte offset.

/// What the current edit will write to when committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Cell { panel: usize, col: usize, row: usize },
    PanelName { panel: usize },
}

impl EditTarget {
    pub fn panel(&self) -> usize {
        match *self {
            EditTarget::Cell { panel, .. } | EditTarget::PanelName { panel } => panel,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditState {
    pub target: Option<EditTarget>,
    pub text: String,
    /// Caret position in chars
    pub caret: usize,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    /// Start editing `target`, seeded with `text` and the caret at the end
    pub fn begin(&mut self, target: EditTarget, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.text.chars().count();
        self.target = Some(target);
    }

    pub fn cancel(&mut self) {
        self.target = None;
        self.text.clear();
        self.caret = 0;
    }

    /// End the edit and hand back the target and final text
    pub fn finish(&mut self) -> Option<(EditTarget, String)> {
        let target = self.target.take()?;
        let text = std::mem::take(&mut self.text);
        self.caret = 0;
        Some((target, text))
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        if !self.is_active() || ch.is_control() {
            return;
        }
        let at = self.byte_offset(self.caret);
        self.text.insert(at, ch);
        self.caret += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.insert_char(ch);
        }
    }

    pub fn backspace(&mut self) {
        if !self.is_active() || self.caret == 0 {
            return;
        }
        self.caret -= 1;
        let at = self.byte_offset(self.caret);
        self.text.remove(at);
    }

    pub fn delete_forward(&mut self) {
        if !self.is_active() || self.caret >= self.char_len() {
            return;
        }
        let at = self.byte_offset(self.caret);
        self.text.remove(at);
    }

    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.caret = (self.caret + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.caret = 0;
    }

    pub fn move_end(&mut self) {
        self.caret = self.char_len();
    }

    /// Text before the caret, used to position the caret when drawing
    pub fn text_before_caret(&self) -> &str {
        &self.text[..self.byte_offset(self.caret)]
    }

    /// Drop the edit if it targets `removed`, or shift its index down
    pub fn panel_removed(&mut self, removed: usize) {
        let Some(target) = self.target else {
            return;
        };
        if target.panel() == removed {
            self.cancel();
        } else if target.panel() > removed {
            self.target = Some(match target {
                EditTarget::Cell { panel, col, row } => EditTarget::Cell {
                    panel: panel - 1,
                    col,
                    row,
                },
                EditTarget::PanelName { panel } => EditTarget::PanelName { panel: panel - 1 },
            });
        }
    }
}
