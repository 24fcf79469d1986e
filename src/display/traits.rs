/*
 *  display/traits.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for the panel driver abstraction
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

use crate::display::error::DisplayError;
use crate::display::framebuffer::PixelBuffer;

/// Sub-pixel ordering expected by the panel controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb,
    Bgr,
}

/// Display capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    /// Sub-pixel ordering of the controller
    pub color_order: ColorOrder,

    /// Rotation applied at init (0, 90, 180 or 270)
    pub rotation_deg: u16,

    /// Whether the panel colors are inverted
    pub inverted: bool,
}

/// Minimal hardware abstraction - every panel driver implements this trait
///
/// The server owns exactly one boxed driver for its lifetime and calls
/// `render` once per command with a complete frame.
pub trait PanelDriver: Send {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Initialize the display hardware
    ///
    /// Called once at startup. Errors here are fatal to the server.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Push one full frame to the panel
    ///
    /// Blocks until the frame has been written to controller memory.
    /// The frame must match `dimensions()`.
    fn render(&mut self, frame: &PixelBuffer) -> Result<(), DisplayError>;

    /// Release the hardware on orderly shutdown
    fn shutdown(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// Reject frames that do not cover the panel exactly
pub(crate) fn check_frame(caps: &DisplayCapabilities, frame: &PixelBuffer) -> Result<(), DisplayError> {
    let actual = (frame.width(), frame.height());
    if actual != (caps.width, caps.height) {
        return Err(DisplayError::BufferSizeMismatch {
            expected: (caps.width, caps.height),
            actual,
        });
    }
    Ok(())
}
