//! Right-click context menu

pub const MENU_WIDTH: i32 = 180;
pub const MENU_ITEM_HEIGHT: i32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    NewBlankPanel,
    LoadPanelFromFile,
    SavePanelTo,
    DeletePanel,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::NewBlankPanel => "New Blank Panel",
            MenuItem::LoadPanelFromFile => "Load Panel from File…",
            MenuItem::SavePanelTo => "Save Panel To…",
            MenuItem::DeletePanel => "Delete Panel",
        }
    }
}

/// Menu opened at a screen point, remembering the world point and the panel
/// under it when it was opened
#[derive(Debug, Clone, Default)]
pub struct ContextMenuState {
    pub visible: bool,
    pub screen_x: i32,
    pub screen_y: i32,
    pub world_x: i32,
    pub world_y: i32,
    /// Panel the menu was opened over
    pub target: Option<usize>,
    pub hovered: Option<usize>,
}

impl ContextMenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, screen: (i32, i32), world: (i32, i32), target: Option<usize>) {
        self.visible = true;
        (self.screen_x, self.screen_y) = screen;
        (self.world_x, self.world_y) = world;
        self.target = target;
        self.hovered = None;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.hovered = None;
        self.target = None;
    }

    /// Items shown for the current target. Panel actions need a panel.
    pub fn items(&self) -> Vec<MenuItem> {
        let mut items = vec![MenuItem::NewBlankPanel, MenuItem::LoadPanelFromFile];
        if self.target.is_some() {
            items.push(MenuItem::SavePanelTo);
            items.push(MenuItem::DeletePanel);
        }
        items
    }

    /// Screen rectangle `(x, y, w, h)` of the whole menu
    pub fn rect(&self) -> (i32, i32, i32, i32) {
        let h = self.items().len() as i32 * MENU_ITEM_HEIGHT;
        (self.screen_x, self.screen_y, MENU_WIDTH, h)
    }

    /// Index of the item under a screen point
    pub fn item_index_at(&self, x: i32, y: i32) -> Option<usize> {
        if !self.visible {
            return None;
        }
        let (mx, my, mw, mh) = self.rect();
        if x < mx || x >= mx + mw || y < my || y >= my + mh {
            return None;
        }
        Some(((y - my) / MENU_ITEM_HEIGHT) as usize)
    }

    pub fn item_at(&self, x: i32, y: i32) -> Option<MenuItem> {
        let idx = self.item_index_at(x, y)?;
        self.items().get(idx).copied()
    }

    /// Fix up the target after the panel at `removed` is deleted
    pub fn panel_removed(&mut self, removed: usize) {
        match self.target {
            Some(t) if t == removed => self.close(),
            Some(t) if t > removed => self.target = Some(t - 1),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_depend_on_target() {
        let mut menu = ContextMenuState::new();
        menu.open((10, 10), (10, 10), None);
        assert_eq!(
            menu.items(),
            vec![MenuItem::NewBlankPanel, MenuItem::LoadPanelFromFile]
        );
        menu.open((10, 10), (10, 10), Some(0));
        assert_eq!(menu.items().len(), 4);
    }

    #[test]
    fn test_item_at() {
        let mut menu = ContextMenuState::new();
        menu.open((100, 100), (0, 0), Some(1));
        assert_eq!(menu.item_at(110, 105), Some(MenuItem::NewBlankPanel));
        assert_eq!(
            menu.item_at(110, 100 + MENU_ITEM_HEIGHT * 3 + 1),
            Some(MenuItem::DeletePanel)
        );
        assert_eq!(menu.item_at(99, 105), None);
        assert_eq!(menu.item_at(110, 100 + MENU_ITEM_HEIGHT * 4), None);
    }

    #[test]
    fn test_hidden_menu_has_no_items_under_cursor() {
        let menu = ContextMenuState::new();
        assert_eq!(menu.item_at(0, 0), None);
    }

    #[test]
    fn test_panel_removed_closes_or_shifts() {
        let mut menu = ContextMenuState::new();
        menu.open((0, 0), (0, 0), Some(2));
        menu.panel_removed(0);
        assert_eq!(menu.target, Some(1));
        menu.panel_removed(1);
        assert!(!menu.visible);
        assert_eq!(menu.target, None);
    }
}
