/*
 *  render/mod.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Render engine - composes one full-panel frame per command
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

pub mod fonts;

use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use image::imageops::FilterType;
use thiserror::Error;

use crate::display::color::NamedColor;
use crate::display::error::DisplayError;
use crate::display::framebuffer::PixelBuffer;
use crate::display::traits::PanelDriver;

pub use fonts::{FontSet, FontSize, SizedFace};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Error loading image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Top-left corner that centers a `text` box on a `panel`
///
/// Floor division of the leftover space, so text larger than the panel
/// gets a negative origin and overflows evenly-ish on both sides.
pub fn text_origin(panel: Size, text: Size) -> Point {
    let x = (panel.width as i32 - text.width as i32).div_euclid(2);
    let y = (panel.height as i32 - text.height as i32).div_euclid(2);
    Point::new(x, y)
}

/// Plain decimal form of a request number
pub fn number_text(number: &serde_json::Number) -> String {
    number.to_string()
}

/// Frame composer for a fixed panel size
pub struct Renderer {
    fonts: FontSet,
    panel: Size,
}

impl Renderer {
    pub fn new(fonts: FontSet, width: u32, height: u32) -> Self {
        Self { fonts, panel: Size::new(width, height) }
    }

    pub fn panel_size(&self) -> Size {
        self.panel
    }

    /// All black
    pub fn clear_frame(&self) -> PixelBuffer {
        self.color_frame(0, 0, 0)
    }

    /// Single flat color, nothing drawn on top
    pub fn color_frame(&self, r: u8, g: u8, b: u8) -> PixelBuffer {
        PixelBuffer::filled(self.panel.width, self.panel.height, Rgb888::new(r, g, b))
    }

    /// Where `text` lands at `size`: (origin, measured box)
    pub fn text_layout(&self, text: &str, size: FontSize) -> (Point, Size) {
        let measured = self.fonts.face(size).measure(text);
        (text_origin(self.panel, measured), measured)
    }

    /// `text` centered on black
    pub fn text_frame(&self, text: &str, size: FontSize, color: NamedColor) -> PixelBuffer {
        let mut frame = self.clear_frame();
        let (origin, _) = self.text_layout(text, size);
        self.fonts.face(size).draw(text, origin, color.into(), &mut frame);
        frame
    }

    /// Image file stretched to exactly the panel size
    pub fn image_frame(&self, path: &Path) -> Result<PixelBuffer, RenderError> {
        let img = image::open(path).map_err(|source| RenderError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let scaled = img
            .resize_exact(self.panel.width, self.panel.height, FilterType::CatmullRom)
            .to_rgb8();
        Ok(PixelBuffer::from_rgb_image(&scaled))
    }

    /// Push a finished frame to the panel
    pub fn show(&self, driver: &mut dyn PanelDriver, frame: &PixelBuffer) -> Result<(), RenderError> {
        driver.render(frame)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> Renderer {
        Renderer::new(FontSet::builtin(), 128, 128)
    }

    #[test]
    fn test_text_origin_floor_division() {
        let panel = Size::new(128, 128);
        assert_eq!(text_origin(panel, Size::new(20, 20)), Point::new(54, 54));
        assert_eq!(text_origin(panel, Size::new(21, 15)), Point::new(53, 56));
        // wider than the panel: floor, not truncation toward zero
        assert_eq!(text_origin(panel, Size::new(131, 128)), Point::new(-2, 0));
    }

    #[test]
    fn test_origin_shifts_with_width() {
        let r = renderer();
        let (short, short_box) = r.text_layout("7", FontSize::Large);
        let (long, long_box) = r.text_layout("777", FontSize::Large);

        assert_eq!(long_box.width, short_box.width * 3);
        assert_eq!(short.x - long.x, (long_box.width - short_box.width) as i32 / 2);
        assert_eq!(short.y, long.y);
    }

    #[test]
    fn test_clear_and_color_frames() {
        let r = renderer();
        assert!(r.clear_frame().is_uniform(Rgb888::BLACK));
        assert!(r.color_frame(255, 0, 0).is_uniform(Rgb888::new(255, 0, 0)));
        assert_eq!(r.clear_frame().size(), Size::new(128, 128));
    }

    #[test]
    fn test_text_frame_uses_color() {
        let r = renderer();
        let frame = r.text_frame("Hello", FontSize::Medium, NamedColor::Green);
        let lit = frame.as_slice().iter().filter(|&&c| c != Rgb888::BLACK);
        assert!(lit.clone().count() > 0);
        assert!(lit.into_iter().all(|&c| c == Rgb888::GREEN));
    }

    #[test]
    fn test_empty_text_is_black() {
        assert!(renderer().text_frame("", FontSize::Small, NamedColor::White).is_uniform(Rgb888::BLACK));
    }

    #[test]
    fn test_number_text() {
        let n: serde_json::Number = serde_json::from_str("42").unwrap();
        assert_eq!(number_text(&n), "42");
        let n: serde_json::Number = serde_json::from_str("-3.5").unwrap();
        assert_eq!(number_text(&n), "-3.5");
    }

    #[test]
    fn test_image_frame_scales_to_panel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::from_pixel(64, 16, image::Rgb([0, 0, 255])).save(&path).unwrap();

        let frame = renderer().image_frame(&path).unwrap();
        assert_eq!(frame.size(), Size::new(128, 128));
        // stretched, not letterboxed: no black bars anywhere
        assert!(frame.as_slice().iter().all(|c| c.r() < 4 && c.g() < 4 && c.b() > 250));
    }

    #[test]
    fn test_image_frame_missing_file() {
        let err = renderer().image_frame(Path::new("/nonexistent/img.png")).unwrap_err();
        assert!(matches!(err, RenderError::ImageLoad { .. }));
    }

    #[test]
    fn test_truetype_text_stays_in_layout_box() {
        let font = Path::new(crate::constants::DEFAULT_FONT_PATH);
        if !font.exists() {
            // no system font on this host; the builtin path is covered above
            return;
        }
        let fonts = FontSet::load(font);
        assert!(fonts.is_truetype());
        let r = Renderer::new(fonts, 128, 128);

        let (origin, bbox) = r.text_layout("42", FontSize::Large);
        assert!(bbox.width > 0 && bbox.width <= 128 && bbox.height > 0 && bbox.height <= 128);
        assert_eq!(origin, text_origin(Size::new(128, 128), bbox));

        let frame = r.text_frame("42", FontSize::Large, NamedColor::White);
        assert!(frame.count_not(Rgb888::BLACK) > 0);
        let xs = origin.x..origin.x + bbox.width as i32;
        let ys = origin.y..origin.y + bbox.height as i32;
        for y in 0..128u32 {
            for x in 0..128u32 {
                if frame.pixel(x, y) != Some(Rgb888::BLACK) {
                    assert!(
                        xs.contains(&(x as i32)) && ys.contains(&(y as i32)),
                        "pixel {},{} outside {:?}+{:?}", x, y, origin, bbox
                    );
                }
            }
        }

        let (small, _) = r.text_layout("42", FontSize::Small);
        assert!(small.y > origin.y);
    }
}
