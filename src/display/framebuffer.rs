/*
 *  display/framebuffer.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Full-panel RGB frame handed to the driver once per command
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

use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

/// A runtime-sized RGB framebuffer for embedded-graphics.
///
/// One buffer is composed per command, rendered, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    buf: Vec<Rgb888>,
    w: usize,
    h: usize,
}

impl PixelBuffer {
    /// New buffer with every pixel set to `fill`
    pub fn filled(width: u32, height: u32, fill: Rgb888) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    /// Build a buffer from a decoded RGB image, pixel for pixel
    pub fn from_rgb_image(img: &image::RgbImage) -> Self {
        let buf = img
            .pixels()
            .map(|p| Rgb888::new(p[0], p[1], p[2]))
            .collect();
        Self { buf, w: img.width() as usize, h: img.height() as usize }
    }

    pub fn width(&self) -> u32 { self.w as u32 }
    pub fn height(&self) -> u32 { self.h as u32 }

    /// Immutable raw access, row-major
    pub fn as_slice(&self) -> &[Rgb888] { &self.buf }

    /// Pixel at (x, y), None when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    /// True when every pixel equals `color`
    pub fn is_uniform(&self, color: Rgb888) -> bool {
        self.buf.iter().all(|&c| c == color)
    }

    /// Number of pixels that differ from `color`
    pub fn count_not(&self, color: Rgb888) -> usize {
        self.buf.iter().filter(|&&c| c != color).count()
    }

    /// Alpha-blend `color` over the existing pixel; out-of-bounds is ignored
    pub fn blend_pixel(&mut self, p: Point, color: Rgb888, alpha: u8) {
        let Some(i) = self.idx(p) else { return };
        if alpha == 255 {
            self.buf[i] = color;
            return;
        }
        let bg = self.buf[i];
        let a = alpha as u16;
        let mix = |fg: u8, bg: u8| ((fg as u16 * a + bg as u16 * (255 - a)) / 255) as u8;
        self.buf[i] = Rgb888::new(
            mix(color.r(), bg.r()),
            mix(color.g(), bg.g()),
            mix(color.b(), bg.b()),
        );
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }
}
