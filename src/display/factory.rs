/*
 *  display/factory.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Builds and initializes the single panel driver
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

use crate::config::DriverKind;
use crate::constants::{PANEL_HEIGHT, PANEL_WIDTH};
use crate::display::drivers::mock::MockDriver;
use crate::display::error::DisplayError;
use crate::display::traits::PanelDriver;
use log::info;

#[cfg(feature = "driver-st7735")]
use crate::display::drivers::st7735::St7735Driver;

/// Type alias for boxed display driver trait objects
pub type BoxedDriver = Box<dyn PanelDriver>;

/// Factory for creating display drivers from configuration
pub struct DisplayDriverFactory;

impl DisplayDriverFactory {
    /// Create and initialize the driver for `kind`
    ///
    /// Initialization runs exactly once here; the returned driver is ready
    /// to render. Failures are the fatal startup errors.
    pub fn create(kind: &DriverKind) -> Result<BoxedDriver, DisplayError> {
        let mut driver = Self::open(kind).map_err(startup_error)?;
        driver.init().map_err(startup_error)?;
        let (w, h) = driver.dimensions();
        info!("Display driver {:?} ready at {}x{}", kind, w, h);
        Ok(driver)
    }

    fn open(kind: &DriverKind) -> Result<BoxedDriver, DisplayError> {
        match kind {
            DriverKind::Mock => Ok(Box::new(MockDriver::new_with_size(PANEL_WIDTH, PANEL_HEIGHT))),

            #[cfg(feature = "driver-st7735")]
            DriverKind::St7735 => Ok(Box::new(St7735Driver::open()?)),

            #[cfg(not(feature = "driver-st7735"))]
            DriverKind::St7735 => Err(DisplayError::DriverUnavailable(
                "built without the 'driver-st7735' feature".to_string(),
            )),
        }
    }
}

/// Anything that stops a driver coming up is fatal; once the driver is
/// found, that means the panel is unreachable.
fn startup_error(err: DisplayError) -> DisplayError {
    if err.is_fatal() {
        err
    } else {
        DisplayError::DeviceUnreachable(err.to_string())
    }
}
