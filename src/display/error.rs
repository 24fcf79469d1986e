/*
 *  display/error.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for the panel adapter
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

use std::fmt;
use std::error::Error;

/// Unified error type for all display operations
#[derive(Debug)]
pub enum DisplayError {
    /// The kernel/user-space driver the panel depends on is not present
    /// (missing device node, or the binary was built without the driver)
    DriverUnavailable(String),

    /// Driver present but the panel could not be opened or initialized
    DeviceUnreachable(String),

    /// SPI communication error
    SpiError(String),

    /// Frame size does not match the panel
    BufferSizeMismatch { expected: (u32, u32), actual: (u32, u32) },
}

impl DisplayError {
    /// True for the two startup failures that keep the server from serving.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DisplayError::DriverUnavailable(_) | DisplayError::DeviceUnreachable(_)
        )
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::DriverUnavailable(msg) =>
                write!(f, "Display driver unavailable: {}", msg),
            DisplayError::DeviceUnreachable(msg) =>
                write!(f, "Display device unreachable: {}", msg),
            DisplayError::SpiError(msg) =>
                write!(f, "SPI communication error: {}", msg),
            DisplayError::BufferSizeMismatch { expected, actual } =>
                write!(f, "Frame size mismatch: expected {}x{}, got {}x{}",
                       expected.0, expected.1, actual.0, actual.1),
        }
    }
}

impl Error for DisplayError {}
