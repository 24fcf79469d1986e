/*
 *  constants.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Compiled-in panel wiring, geometry and font sizing
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

use crate::display::traits::ColorOrder;

/// Panel width in pixels.
pub const PANEL_WIDTH: u32 = 128;
/// Panel height in pixels.
pub const PANEL_HEIGHT: u32 = 128;

// Waveshare 1.44" LCD HAT wiring (BCM numbering)
/// Data/Command select line.
pub const DC_PIN: u32 = 25;
/// Reset line.
pub const RST_PIN: u32 = 27;
/// Backlight enable line.
pub const BL_PIN: u32 = 24;

/// Controller RAM offset of the visible area (columns).
pub const OFFSET_LEFT: u16 = 2;
/// Controller RAM offset of the visible area (rows).
pub const OFFSET_TOP: u16 = 3;

pub const SPI_BUS: &str = "/dev/spidev0.0";
pub const GPIO_CHIP: &str = "/dev/gpiochip0";
pub const SPI_SPEED_HZ: u32 = 2_000_000;

pub const COLOR_ORDER: ColorOrder = ColorOrder::Bgr;
pub const INVERT: bool = false;
pub const ROTATION_DEG: u16 = 0;

/// Line written once on stdout when the server starts accepting commands.
pub const READY_MARKER: &str = "Display server ready";

/// TrueType face used for every size class.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

// pixel sizes for the three text size classes
pub const FONT_PX_LARGE: f32 = 50.0;
pub const FONT_PX_MEDIUM: f32 = 30.0;
pub const FONT_PX_SMALL: f32 = 20.0;
