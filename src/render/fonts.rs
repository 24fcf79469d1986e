/*
 *  render/fonts.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Font set for text commands - TrueType with a built-in fallback
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::path::Path;
use std::sync::Arc;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};
use fontdue::{Font, FontSettings};
use log::{info, warn};

use crate::constants::{FONT_PX_LARGE, FONT_PX_MEDIUM, FONT_PX_SMALL};
use crate::display::framebuffer::PixelBuffer;

/// Text size class named in requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Large,
    Medium,
    Small,
}

impl FontSize {
    /// Anything other than the three known names is medium
    pub fn from_name(name: &str) -> Self {
        match name {
            "large" => FontSize::Large,
            "small" => FontSize::Small,
            _ => FontSize::Medium,
        }
    }
}

/// One face at one pixel size
#[derive(Clone)]
pub enum SizedFace {
    /// Anti-aliased TrueType rasterized by fontdue
    TrueType { font: Arc<Font>, px: f32 },

    /// embedded-graphics bitmap font
    Builtin(&'static MonoFont<'static>),
}

impl SizedFace {
    /// Pixel extent of `text` as it will be drawn
    pub fn measure(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::zero();
        }
        match self {
            SizedFace::TrueType { font, px } => {
                let width: f32 = text
                    .chars()
                    .filter(|c| !c.is_control())
                    .map(|c| font.metrics(c, *px).advance_width)
                    .sum();
                let (ascent, descent) = line_extent(font, *px);
                Size::new(width.ceil() as u32, (ascent - descent).ceil() as u32)
            }
            SizedFace::Builtin(mono) => {
                MonoTextStyle::new(*mono, Rgb888::WHITE)
                    .measure_string(text, Point::zero(), Baseline::Top)
                    .bounding_box
                    .size
            }
        }
    }

    /// Draw `text` with its measured box starting at `origin`
    pub fn draw(&self, text: &str, origin: Point, color: Rgb888, fb: &mut PixelBuffer) {
        match self {
            SizedFace::TrueType { font, px } => {
                let (ascent, _) = line_extent(font, *px);
                let baseline = origin.y + ascent.round() as i32;
                let mut cursor = origin.x as f32;

                for c in text.chars().filter(|c| !c.is_control()) {
                    let (metrics, coverage) = font.rasterize(c, *px);
                    let gx = cursor.round() as i32 + metrics.xmin;
                    let gy = baseline - metrics.height as i32 - metrics.ymin;

                    for row in 0..metrics.height {
                        for col in 0..metrics.width {
                            let alpha = coverage[row * metrics.width + col];
                            if alpha > 0 {
                                fb.blend_pixel(Point::new(gx + col as i32, gy + row as i32), color, alpha);
                            }
                        }
                    }
                    cursor += metrics.advance_width;
                }
            }
            SizedFace::Builtin(mono) => {
                let style = MonoTextStyle::new(*mono, color);
                Text::with_baseline(text, origin, style, Baseline::Top)
                    .draw(fb)
                    .unwrap_or_else(|never| match never {});
            }
        }
    }
}

/// (ascent, descent) in pixels; descent is negative
fn line_extent(font: &Font, px: f32) -> (f32, f32) {
    font.horizontal_line_metrics(px)
        .map_or((px, 0.0), |m| (m.ascent, m.descent))
}

/// The three faces used by text commands, loaded once at startup
#[derive(Clone)]
pub struct FontSet {
    large: SizedFace,
    medium: SizedFace,
    small: SizedFace,
}

impl FontSet {
    /// Load a TrueType face for all size classes
    ///
    /// A missing or unreadable font is not fatal: the built-in bitmap
    /// fonts are used instead.
    pub fn load(path: &Path) -> Self {
        let loaded = std::fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| Font::from_bytes(bytes, FontSettings::default()).map_err(str::to_string));

        match loaded {
            Ok(font) => {
                info!("Loaded font {}", path.display());
                let font = Arc::new(font);
                Self {
                    large: SizedFace::TrueType { font: Arc::clone(&font), px: FONT_PX_LARGE },
                    medium: SizedFace::TrueType { font: Arc::clone(&font), px: FONT_PX_MEDIUM },
                    small: SizedFace::TrueType { font, px: FONT_PX_SMALL },
                }
            }
            Err(e) => {
                warn!("Font {} unavailable ({}), using built-in fonts", path.display(), e);
                Self::builtin()
            }
        }
    }

    /// Bitmap fonts compiled into embedded-graphics
    pub fn builtin() -> Self {
        Self {
            large: SizedFace::Builtin(&FONT_10X20),
            medium: SizedFace::Builtin(&FONT_9X15),
            small: SizedFace::Builtin(&FONT_6X10),
        }
    }

    pub fn face(&self, size: FontSize) -> &SizedFace {
        match size {
            FontSize::Large => &self.large,
            FontSize::Medium => &self.medium,
            FontSize::Small => &self.small,
        }
    }

    pub fn is_truetype(&self) -> bool {
        matches!(self.medium, SizedFace::TrueType { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_names() {
        assert_eq!(FontSize::from_name("large"), FontSize::Large);
        assert_eq!(FontSize::from_name("small"), FontSize::Small);
        assert_eq!(FontSize::from_name("medium"), FontSize::Medium);
        assert_eq!(FontSize::from_name("huge"), FontSize::Medium);
    }

    #[test]
    fn test_missing_font_falls_back() {
        let fonts = FontSet::load(Path::new("/nonexistent/font.ttf"));
        assert!(!fonts.is_truetype());
    }

    #[test]
    fn test_garbage_font_falls_back() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not a font").unwrap();
        assert!(!FontSet::load(file.path()).is_truetype());
    }

    #[test]
    fn test_builtin_measure() {
        let fonts = FontSet::builtin();
        assert_eq!(fonts.face(FontSize::Large).measure("42"), Size::new(20, 20));
        assert_eq!(fonts.face(FontSize::Small).measure("abc"), Size::new(18, 10));
        assert_eq!(fonts.face(FontSize::Medium).measure(""), Size::zero());
    }

    #[test]
    fn test_builtin_draw_stays_in_box() {
        let fonts = FontSet::builtin();
        let mut fb = PixelBuffer::filled(40, 40, Rgb888::BLACK);
        fonts.face(FontSize::Small).draw("Hi", Point::new(10, 10), Rgb888::RED, &mut fb);

        assert!(fb.count_not(Rgb888::BLACK) > 0);
        for y in 0..40 {
            for x in 0..40 {
                let inside = (10..22).contains(&x) && (10..20).contains(&y);
                if !inside {
                    assert_eq!(fb.pixel(x, y), Some(Rgb888::BLACK), "stray pixel at {},{}", x, y);
                }
            }
        }
    }
}
