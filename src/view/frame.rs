//! Frame abstraction for drawing primitives
//!
//! Provides a simple, safe API for pixel buffer operations. Coordinates are
//! signed because panels routinely hang off the edges of the window; anything
//! outside the frame (or the clip rect) is dropped.

use fontdue::Font;

use super::GlyphCache;

/// Blend a foreground color onto a background color using alpha compositing.
///
/// Both colors are in ARGB format (0xAARRGGBB). Returns the blended color
/// with full opacity.
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let bg_r = ((bg >> 16) & 0xFF) as f32;
    let bg_g = ((bg >> 8) & 0xFF) as f32;
    let bg_b = (bg & 0xFF) as f32;

    let fg_r = ((fg >> 16) & 0xFF) as f32;
    let fg_g = ((fg >> 8) & 0xFF) as f32;
    let fg_b = (fg & 0xFF) as f32;

    let final_r = (bg_r * (1.0 - alpha) + fg_r * alpha) as u32;
    let final_g = (bg_g * (1.0 - alpha) + fg_g * alpha) as u32;
    let final_b = (bg_b * (1.0 - alpha) + fg_b * alpha) as u32;

    0xFF000000 | (final_r << 16) | (final_g << 8) | final_b
}

/// Clipping rectangle in pixel coordinates (inclusive start, exclusive end)
#[derive(Clone, Copy, Debug)]
struct ClipRect {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    clip: Option<ClipRect>,
}

impl<'a> Frame<'a> {
    /// Create a new frame from a mutable pixel buffer
    ///
    /// If the buffer is smaller than width*height, the height is reduced to
    /// fit.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let height = if width > 0 {
            height.min(buffer.len() / width)
        } else {
            0
        };
        Self {
            buffer,
            width,
            height,
            clip: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Constrain subsequent drawing to the given rectangle
    pub fn set_clip(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.clip = Some(ClipRect {
            x0: x,
            y0: y,
            x1: x + w,
            y1: y + h,
        });
    }

    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    /// Intersect a rectangle with the frame and clip rect, returning
    /// `(x0, y0, x1, y1)` as buffer indices
    fn visible(&self, x: i32, y: i32, w: i32, h: i32) -> Option<(usize, usize, usize, usize)> {
        let (mut x0, mut y0) = (x.max(0), y.max(0));
        let (mut x1, mut y1) = (
            (x + w).min(self.width as i32),
            (y + h).min(self.height as i32),
        );
        if let Some(c) = self.clip {
            x0 = x0.max(c.x0);
            y0 = y0.max(c.y0);
            x1 = x1.min(c.x1);
            y1 = y1.min(c.y1);
        }
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Fill a rectangle with a solid color (no alpha blending)
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let Some((x0, y0, x1, y1)) = self.visible(x, y, w, h) else {
            return;
        };
        for py in y0..y1 {
            let row_start = py * self.width;
            self.buffer[row_start + x0..row_start + x1].fill(color);
        }
    }

    /// Fill a rectangle with alpha blending (color is ARGB format)
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        if alpha >= 1.0 {
            return self.fill_rect(x, y, w, h, color);
        }

        let Some((x0, y0, x1, y1)) = self.visible(x, y, w, h) else {
            return;
        };
        for py in y0..y1 {
            let row_start = py * self.width;
            for px in x0..x1 {
                let idx = row_start + px;
                self.buffer[idx] = blend_colors(self.buffer[idx], color, alpha);
            }
        }
    }

    /// Blend a single pixel with a coverage value in `0.0..=1.0`
    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: u32, coverage: f32) {
        if self.visible(x, y, 1, 1).is_none() {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.buffer[idx] = blend_colors(self.buffer[idx], color, coverage);
    }

    /// Draw a rectangle with a border of the given thickness
    #[allow(clippy::too_many_arguments)]
    pub fn draw_bordered_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        fill_color: u32,
        border_color: u32,
        border: i32,
    ) {
        self.blend_rect(x, y, w, h, fill_color);

        let border_color = border_color | 0xFF000000;
        self.fill_rect(x, y, w, border, border_color);
        self.fill_rect(x, y + h - border, w, border, border_color);
        self.fill_rect(x, y, border, h, border_color);
        self.fill_rect(x + w - border, y, border, h, border_color);
    }
}

/// Text rendering context wrapping font and glyph cache
pub struct TextPainter<'a> {
    font: &'a Font,
    glyph_cache: &'a mut GlyphCache,
    font_size: f32,
    ascent: f32,
}

impl<'a> TextPainter<'a> {
    pub fn new(font: &'a Font, glyph_cache: &'a mut GlyphCache, font_size: f32, ascent: f32) -> Self {
        Self {
            font,
            glyph_cache,
            font_size,
            ascent,
        }
    }

    /// Draw text with its top-left at `(x, y)`
    pub fn draw(&mut self, frame: &mut Frame, x: i32, y: i32, text: &str, color: u32) {
        let mut current_x = x as f32;
        let baseline = y as f32 + self.ascent;

        for ch in text.chars() {
            let key = (ch, self.font_size.to_bits());
            let (metrics, bitmap) = self
                .glyph_cache
                .entry(key)
                .or_insert_with(|| self.font.rasterize(ch, self.font_size));

            let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;

            for bitmap_y in 0..metrics.height {
                for bitmap_x in 0..metrics.width {
                    let alpha = bitmap[bitmap_y * metrics.width + bitmap_x];
                    if alpha == 0 {
                        continue;
                    }
                    let px = current_x as i32 + bitmap_x as i32 + metrics.xmin;
                    let py = (glyph_top + bitmap_y as f32) as i32;
                    frame.blend_pixel(px, py, color, alpha as f32 / 255.0);
                }
            }

            current_x += metrics.advance_width;
        }
    }

    /// Measure text width in pixels
    pub fn measure_width(&mut self, text: &str) -> f32 {
        let mut width = 0.0;
        for ch in text.chars() {
            let key = (ch, self.font_size.to_bits());
            let (metrics, _) = self
                .glyph_cache
                .entry(key)
                .or_insert_with(|| self.font.rasterize(ch, self.font_size));
            width += metrics.advance_width;
        }
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips_negative_origin() {
        let mut buffer = vec![0u32; 4 * 4];
        let mut frame = Frame::new(&mut buffer, 4, 4);
        frame.fill_rect(-2, -2, 4, 4, 0xFFFFFFFF);
        assert_eq!(&buffer[0..4], &[0xFFFFFFFF, 0xFFFFFFFF, 0, 0]);
        assert_eq!(&buffer[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_clip_rect_limits_drawing() {
        let mut buffer = vec![0u32; 4 * 4];
        let mut frame = Frame::new(&mut buffer, 4, 4);
        frame.set_clip(1, 1, 2, 2);
        frame.fill_rect(0, 0, 4, 4, 0xFF00FF00);
        frame.clear_clip();
        let filled = buffer.iter().filter(|&&p| p == 0xFF00FF00).count();
        assert_eq!(filled, 4);
        assert_eq!(buffer[5], 0xFF00FF00);
        assert_eq!(buffer[0], 0);
    }

    #[test]
    fn test_blend_half_alpha() {
        let blended = blend_colors(0xFF000000, 0xFFFFFFFF, 0.5);
        assert_eq!(blended & 0xFF, 127);
    }

    #[test]
    fn test_short_buffer_reduces_height() {
        let mut buffer = vec![0u32; 10];
        let frame = Frame::new(&mut buffer, 4, 4);
        assert_eq!(frame.height(), 2);
    }
}
