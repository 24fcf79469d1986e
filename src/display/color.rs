/*
 *  display/color.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Named color table used by text commands
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

use embedded_graphics::pixelcolor::Rgb888;

/// The eight colors a client may name in a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamedColor {
    #[default]
    White,
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
}

impl NamedColor {
    /// Look up a color by name; anything unrecognized is white
    pub fn from_name(name: &str) -> Self {
        match name {
            "white" => NamedColor::White,
            "black" => NamedColor::Black,
            "red" => NamedColor::Red,
            "green" => NamedColor::Green,
            "blue" => NamedColor::Blue,
            "yellow" => NamedColor::Yellow,
            "cyan" => NamedColor::Cyan,
            "magenta" => NamedColor::Magenta,
            _ => NamedColor::White,
        }
    }

    /// RGB triple for this color
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            NamedColor::White => (255, 255, 255),
            NamedColor::Black => (0, 0, 0),
            NamedColor::Red => (255, 0, 0),
            NamedColor::Green => (0, 255, 0),
            NamedColor::Blue => (0, 0, 255),
            NamedColor::Yellow => (255, 255, 0),
            NamedColor::Cyan => (0, 255, 255),
            NamedColor::Magenta => (255, 0, 255),
        }
    }
}

impl From<NamedColor> for Rgb888 {
    fn from(color: NamedColor) -> Self {
        let (r, g, b) = color.rgb();
        Rgb888::new(r, g, b)
    }
}
