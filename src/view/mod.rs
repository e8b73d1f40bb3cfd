//! Rendering of the canvas into a softbuffer surface
//!
//! Reads the model only. Every panel rectangle comes from
//! [`cellchain::geometry::bounds`], recomputed each frame.

pub mod frame;

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings, Metrics};
use softbuffer::Surface;
use winit::window::Window;

use cellchain::geometry::{
    bounds, PanelBounds, PANEL_BORDER_WIDTH, PANEL_INNER_PADDING, RESIZE_HANDLE_SIZE,
};
use cellchain::model::edit::EditTarget;
use cellchain::model::menu::MENU_ITEM_HEIGHT;
use cellchain::model::{AppModel, Panel};
use cellchain::theme::Theme;

use frame::{Frame, TextPainter};

// Glyph cache key: (character, font_size as bits)
type GlyphCacheKey = (char, u32);
pub type GlyphCache = HashMap<GlyphCacheKey, (Metrics, Vec<u8>)>;

/// Fonts tried, in order, when no `font_path` is configured
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const TOP_BAR_HEIGHT: i32 = 22;
const LOG_WIDTH: i32 = 320;
const LOG_MARGIN: i32 = 8;
const HELP_TEXT: &str =
    "Right-drag: pan   Right-click: menu   Ctrl+S: save   Ctrl+O: load   Enter: edit";

fn read_font(path: &Path) -> Result<Font> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
    Font::from_bytes(bytes, FontSettings::default())
        .map_err(|e| anyhow::anyhow!("Failed to parse font {}: {}", path.display(), e))
}

/// Load the configured font, falling back to well-known system fonts
fn load_font(configured: Option<&Path>) -> Option<Font> {
    if let Some(path) = configured {
        match read_font(path) {
            Ok(font) => return Some(font),
            Err(e) => tracing::warn!("{:#}", e),
        }
    }

    for candidate in SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from) {
        if !candidate.exists() {
            continue;
        }
        match read_font(&candidate) {
            Ok(font) => {
                tracing::info!("Using font {}", candidate.display());
                return Some(font);
            }
            Err(e) => tracing::debug!("{:#}", e),
        }
    }

    tracing::warn!("No usable font found; text will not be drawn (set font_path in config.yaml)");
    None
}

pub struct Renderer {
    surface: Surface<Rc<Window>, Rc<Window>>,
    font: Option<Font>,
    glyph_cache: GlyphCache,
    font_size: f32,
    ascent: f32,
    line_height: i32,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(
        window: Rc<Window>,
        context: &softbuffer::Context<Rc<Window>>,
        font_path: Option<&Path>,
        font_size: f32,
    ) -> Result<Self> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let mut surface = Surface::new(context, Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create surface: {}", e))?;
        surface
            .resize(non_zero(width), non_zero(height))
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))?;

        let font = load_font(font_path);
        let (ascent, line_height) = font
            .as_ref()
            .and_then(|f| f.horizontal_line_metrics(font_size))
            .map(|m| (m.ascent, m.new_line_size.ceil() as i32))
            .unwrap_or((font_size, font_size.ceil() as i32));

        Ok(Self {
            surface,
            font,
            glyph_cache: HashMap::new(),
            font_size,
            ascent,
            line_height,
            width,
            height,
        })
    }

    pub fn render(&mut self, model: &AppModel) -> Result<()> {
        let (want_w, want_h) = (model.window_size.0.max(1), model.window_size.1.max(1));
        if (self.width, self.height) != (want_w, want_h) {
            self.width = want_w;
            self.height = want_h;
            self.surface
                .resize(non_zero(want_w), non_zero(want_h))
                .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))?;
        }

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("Failed to get surface buffer: {}", e))?;
        let mut frame = Frame::new(&mut buffer, self.width as usize, self.height as usize);

        let mut painter = self.font.as_ref().map(|font| {
            TextPainter::new(font, &mut self.glyph_cache, self.font_size, self.ascent)
        });
        let mut ctx = DrawContext {
            model,
            theme: &model.theme,
            painter: painter.as_mut(),
            line_height: self.line_height,
        };

        frame.clear(ctx.theme.background.to_argb_u32());
        for (index, panel) in model.canvas.panels.iter().enumerate() {
            ctx.draw_panel(&mut frame, index, panel);
        }
        ctx.draw_top_bar(&mut frame);
        ctx.draw_activity_log(&mut frame);
        if model.menu.visible {
            ctx.draw_menu(&mut frame);
        }

        buffer
            .present()
            .map_err(|e| anyhow::anyhow!("Failed to present buffer: {}", e))?;
        Ok(())
    }
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

struct DrawContext<'a, 'p> {
    model: &'a AppModel,
    theme: &'a Theme,
    painter: Option<&'p mut TextPainter<'a>>,
    line_height: i32,
}

impl DrawContext<'_, '_> {
    fn text(&mut self, frame: &mut Frame, x: i32, y: i32, text: &str, color: u32) {
        if let Some(painter) = self.painter.as_deref_mut() {
            painter.draw(frame, x, y, text, color);
        }
    }

    fn text_width(&mut self, text: &str) -> i32 {
        self.painter
            .as_deref_mut()
            .map(|p| p.measure_width(text).ceil() as i32)
            .unwrap_or(0)
    }

    /// Draw `text` vertically centered in a box of height `h`, clipped to it
    #[allow(clippy::too_many_arguments)]
    fn text_in_box(
        &mut self,
        frame: &mut Frame,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        text: &str,
        color: u32,
    ) {
        frame.set_clip(x, y, w, h);
        let ty = y + (h - self.line_height) / 2;
        self.text(frame, x + PANEL_INNER_PADDING, ty, text, color);
        frame.clear_clip();
    }

    fn caret(&mut self, frame: &mut Frame, x: i32, y: i32, h: i32, before: &str) {
        if !self.model.ui.caret_visible {
            return;
        }
        let cx = x + PANEL_INNER_PADDING + self.text_width(before);
        let inset = (h - self.line_height).max(0) / 2;
        frame.fill_rect(cx, y + inset, 1, h - inset * 2, self.theme.caret.to_argb_u32());
    }

    fn draw_panel(&mut self, frame: &mut Frame, index: usize, panel: &Panel) {
        let b = bounds(panel, self.model.canvas.camera);
        let (fw, fh) = (frame.width() as i32, frame.height() as i32);
        if b.total_x > fw
            || b.total_y > fh
            || b.total_x + b.total_w < 0
            || b.total_y + b.total_h < 0
        {
            return;
        }

        let theme = self.theme;
        frame.draw_bordered_rect(
            b.total_x,
            b.total_y,
            b.total_w,
            b.total_h,
            theme.panel_background.to_argb_u32(),
            theme.panel_border.to_argb_u32(),
            PANEL_BORDER_WIDTH,
        );

        self.draw_name_button(frame, index, panel, &b);

        if panel.loaded {
            self.draw_cells(frame, index, panel, &b);
        } else {
            frame.fill_rect(
                b.content_x,
                b.content_y,
                b.content_w,
                b.content_h,
                theme.placeholder.to_argb_u32(),
            );
            let file = panel.filename.as_deref().unwrap_or("");
            let label = if self.model.canvas.pending_loads() > 0 {
                format!("Loading {}…", file)
            } else {
                format!("Not loaded: {}", file)
            };
            self.text_in_box(
                frame,
                b.content_x,
                b.content_y,
                b.content_w,
                self.line_height + PANEL_INNER_PADDING * 2,
                &label,
                theme.text_dim.to_argb_u32(),
            );
        }

        let (hx, hy) = b.resize_handle();
        frame.fill_rect(
            hx,
            hy,
            RESIZE_HANDLE_SIZE,
            RESIZE_HANDLE_SIZE,
            theme.resize_handle.to_argb_u32(),
        );
    }

    fn draw_name_button(&mut self, frame: &mut Frame, index: usize, panel: &Panel, b: &PanelBounds) {
        let theme = self.theme;
        let (x, y, w, h) = b.name_button();
        frame.fill_rect(x, y, w, h, theme.name_button.to_argb_u32());

        let editing = matches!(
            self.model.edit.target,
            Some(EditTarget::PanelName { panel: p }) if p == index
        );
        let label = if editing {
            self.model.edit.text.clone()
        } else {
            panel.display_name(index)
        };

        frame.set_clip(x, y, w, h);
        let text_w = self.text_width(&label);
        let tx = if editing { x + 2 } else { x + (w - text_w) / 2 };
        let ty = y + (h - self.line_height) / 2;
        self.text(frame, tx, ty, &label, theme.text.to_argb_u32());
        if editing {
            let before = self.model.edit.text_before_caret().to_string();
            self.caret(frame, tx - PANEL_INNER_PADDING, y, h, &before);
        }
        frame.clear_clip();
    }

    fn draw_cells(&mut self, frame: &mut Frame, index: usize, panel: &Panel, b: &PanelBounds) {
        let theme = self.theme;
        let (cw, ch) = (panel.cell_width, panel.cell_height);
        let (fw, fh) = (frame.width() as i32, frame.height() as i32);

        frame.fill_rect(
            b.content_x,
            b.content_y,
            b.content_w,
            b.content_h,
            theme.cell_grid.to_argb_u32(),
        );

        // Only walk cells that intersect the window
        let first_col = ((-b.content_x).max(0) / cw) as usize;
        let first_row = ((-b.content_y).max(0) / ch) as usize;
        let last_col = (((fw - b.content_x) / cw + 1).max(0) as usize).min(panel.cols());
        let last_row = (((fh - b.content_y) / ch + 1).max(0) as usize).min(panel.rows());

        let selection = self
            .model
            .interaction
            .selection
            .filter(|sel| sel.panel == index);
        let editing = match self.model.edit.target {
            Some(EditTarget::Cell { panel: p, col, row }) if p == index => Some((col, row)),
            _ => None,
        };

        for row in first_row..last_row {
            for col in first_col..last_col {
                let x = b.content_x + col as i32 * cw;
                let y = b.content_y + row as i32 * ch;
                frame.fill_rect(x + 1, y + 1, cw - 1, ch - 1, theme.cell_background.to_argb_u32());

                if editing == Some((col, row)) {
                    let text = self.model.edit.text.clone();
                    self.text_in_box(frame, x, y, cw, ch, &text, theme.text.to_argb_u32());
                    let before = self.model.edit.text_before_caret().to_string();
                    frame.set_clip(x, y, cw, ch);
                    self.caret(frame, x, y, ch, &before);
                    frame.clear_clip();
                } else {
                    let value = panel.get_cell(col, row);
                    if !value.is_empty() {
                        self.text_in_box(frame, x, y, cw, ch, value, theme.text.to_argb_u32());
                    }
                }

                if selection.is_some_and(|sel| sel.col == col && sel.row == row) {
                    frame.blend_rect(x, y, cw, ch, theme.selection.to_argb_u32());
                }
            }
        }
    }

    fn draw_top_bar(&mut self, frame: &mut Frame) {
        let theme = self.theme;
        let w = frame.width() as i32;
        frame.fill_rect(0, 0, w, TOP_BAR_HEIGHT, theme.overlay_background.to_argb_u32());

        let pending = self.model.canvas.pending_loads();
        let status = if pending > 0 {
            format!("{}   ({} loading)", HELP_TEXT, pending)
        } else {
            HELP_TEXT.to_string()
        };
        self.text_in_box(frame, 0, 0, w, TOP_BAR_HEIGHT, &status, theme.text_dim.to_argb_u32());
    }

    fn draw_activity_log(&mut self, frame: &mut Frame) {
        let model = self.model;
        let lines: Vec<&str> = model.ui.activity().collect();
        if lines.is_empty() {
            return;
        }

        let theme = self.theme;
        let line_h = self.line_height + 2;
        let h = lines.len() as i32 * line_h + LOG_MARGIN;
        let x = frame.width() as i32 - LOG_WIDTH - LOG_MARGIN;
        let y = frame.height() as i32 - h - LOG_MARGIN;
        frame.blend_rect(x, y, LOG_WIDTH, h, theme.log_background.to_argb_u32());

        // Oldest at the top, newest at the bottom
        for (i, line) in lines.iter().rev().enumerate() {
            let ly = y + LOG_MARGIN / 2 + i as i32 * line_h;
            self.text_in_box(frame, x, ly, LOG_WIDTH, line_h, line, theme.text_dim.to_argb_u32());
        }
    }

    fn draw_menu(&mut self, frame: &mut Frame) {
        let theme = self.theme;
        let model = self.model;
        let menu = &model.menu;
        let (x, y, w, h) = menu.rect();
        frame.draw_bordered_rect(
            x,
            y,
            w,
            h,
            theme.menu_background.to_argb_u32(),
            theme.menu_border.to_argb_u32(),
            1,
        );

        for (i, item) in menu.items().into_iter().enumerate() {
            let iy = y + i as i32 * MENU_ITEM_HEIGHT;
            if menu.hovered == Some(i) {
                frame.fill_rect(
                    x + 1,
                    iy,
                    w - 2,
                    MENU_ITEM_HEIGHT,
                    theme.menu_highlight.to_argb_u32(),
                );
            }
            self.text_in_box(
                frame,
                x,
                iy,
                w,
                MENU_ITEM_HEIGHT,
                item.label(),
                theme.text.to_argb_u32(),
            );
        }
    }
}
