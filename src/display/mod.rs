/*
 *  display/mod.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - panel adapter, frames and colors
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod framebuffer;
pub mod factory;
pub mod color;

pub mod drivers;

// Re-exports for convenience
pub use traits::{PanelDriver, DisplayCapabilities, ColorOrder};
pub use error::DisplayError;
pub use framebuffer::PixelBuffer;
pub use factory::{DisplayDriverFactory, BoxedDriver};
pub use color::NamedColor;
pub use drivers::mock::{MockDriver, MockDriverState};

#[cfg(feature = "driver-st7735")]
pub use drivers::st7735::St7735Driver;
