//! Color palette

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to ARGB u32 for softbuffer
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub panel_background: Color,
    pub panel_border: Color,
    pub name_button: Color,
    /// Body of a panel still waiting for (or having failed) its load
    pub placeholder: Color,
    pub cell_background: Color,
    pub cell_grid: Color,
    /// Translucent overlay over the selected cell
    pub selection: Color,
    pub resize_handle: Color,
    pub text: Color,
    pub text_dim: Color,
    pub overlay_background: Color,
    pub log_background: Color,
    pub menu_background: Color,
    pub menu_border: Color,
    pub menu_highlight: Color,
    pub caret: Color,
}

impl Theme {
    pub const fn dark() -> Self {
        Self {
            background: Color::rgb(0x12, 0x12, 0x14),
            panel_background: Color::rgb(0x22, 0x22, 0x2a),
            panel_border: Color::rgb(0x44, 0x44, 0x50),
            name_button: Color::rgb(0x11, 0x11, 0x16),
            placeholder: Color::rgb(0x0f, 0x0f, 0x12),
            cell_background: Color::rgb(0x18, 0x18, 0x1c),
            cell_grid: Color::rgb(0x2c, 0x2c, 0x34),
            selection: Color::rgba(0x66, 0x88, 0xff, 0x66),
            resize_handle: Color::rgb(0x55, 0x55, 0x66),
            text: Color::rgb(0xff, 0xff, 0xff),
            text_dim: Color::rgb(0xdd, 0xdd, 0xdd),
            overlay_background: Color::rgb(0x11, 0x11, 0x16),
            log_background: Color::rgba(0x0c, 0x0c, 0x0e, 0xee),
            menu_background: Color::rgb(0x10, 0x10, 0x12),
            menu_border: Color::rgb(0x44, 0x44, 0x50),
            menu_highlight: Color::rgb(0x33, 0x55, 0xff),
            caret: Color::rgb(0xff, 0xff, 0xff),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_packing() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_argb_u32(), 0xFF123456);
        assert_eq!(Color::rgba(1, 2, 3, 0x66).to_argb_u32(), 0x66010203);
    }
}
