/*
 *  display/drivers/mock.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock panel driver for headless runs and tests
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
use crate::display::traits::{check_frame, ColorOrder, DisplayCapabilities, PanelDriver};

use std::sync::{Arc, Mutex, MutexGuard};

/// Mock display driver
///
/// This driver simulates the panel without requiring hardware. It's useful for:
/// - Unit and integration tests
/// - Running the server headless (`--driver mock`)
///
/// Every rendered frame is retained as `last_frame` so tests can inspect
/// what the panel would show.
#[derive(Debug, Clone)]
pub struct MockDriver {
    /// Display capabilities
    capabilities: DisplayCapabilities,

    /// Shared state for testing
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of successful render() calls
    pub render_count: usize,

    /// Number of times shutdown() was called
    pub shutdown_count: usize,

    /// Whether the driver is initialized
    pub is_initialized: bool,

    /// Frame from the most recent successful render
    pub last_frame: Option<PixelBuffer>,

    /// Simulate failures (for error testing)
    pub simulate_init_failure: bool,
    pub simulate_render_failure: bool,
}

impl MockDriver {
    /// Create a mock driver with specific dimensions
    pub fn new_with_size(width: u32, height: u32) -> Self {
        let capabilities = DisplayCapabilities {
            width,
            height,
            color_order: ColorOrder::Rgb,
            rotation_deg: 0,
            inverted: false,
        };

        Self {
            capabilities,
            state: Arc::new(Mutex::new(MockDriverState::default())),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    /// Copy of the last rendered frame
    pub fn last_frame(&self) -> Option<PixelBuffer> {
        self.lock().last_frame.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockDriverState> {
        // a poisoned lock only means a test panicked mid-update
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PanelDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();

        if state.simulate_init_failure {
            return Err(DisplayError::DeviceUnreachable("Simulated init failure".to_string()));
        }

        state.init_count += 1;
        state.is_initialized = true;
        Ok(())
    }

    fn render(&mut self, frame: &PixelBuffer) -> Result<(), DisplayError> {
        check_frame(&self.capabilities, frame)?;

        let mut state = self.lock();
        if state.simulate_render_failure {
            return Err(DisplayError::SpiError("Simulated render failure".to_string()));
        }

        state.render_count += 1;
        state.last_frame = Some(frame.clone());
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();
        state.shutdown_count += 1;
        state.is_initialized = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::*;

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new_with_size(128, 128);
        assert_eq!(driver.dimensions(), (128, 128));
        assert!(driver.last_frame().is_none());
    }

    #[test]
    fn test_mock_driver_init() {
        let mut driver = MockDriver::new_with_size(128, 128);

        let state = driver.state();
        assert_eq!(state.lock().unwrap().init_count, 0);
        assert!(!state.lock().unwrap().is_initialized);

        driver.init().unwrap();

        assert_eq!(state.lock().unwrap().init_count, 1);
        assert!(state.lock().unwrap().is_initialized);
    }

    #[test]
    fn test_mock_driver_render_keeps_frame() {
        let mut driver = MockDriver::new_with_size(4, 4);
        let frame = PixelBuffer::filled(4, 4, Rgb888::RED);

        driver.render(&frame).unwrap();

        assert_eq!(driver.state().lock().unwrap().render_count, 1);
        assert_eq!(driver.last_frame(), Some(frame));
    }

    #[test]
    fn test_mock_driver_simulated_failure() {
        let mut driver = MockDriver::new_with_size(4, 4);
        let frame = PixelBuffer::filled(4, 4, Rgb888::BLACK);

        driver.state().lock().unwrap().simulate_render_failure = true;
        assert!(driver.render(&frame).is_err());
        assert!(driver.last_frame().is_none());

        driver.state().lock().unwrap().simulate_render_failure = false;
        assert!(driver.render(&frame).is_ok());
    }

    #[test]
    fn test_mock_driver_frame_size_mismatch() {
        let mut driver = MockDriver::new_with_size(128, 128);
        let frame = PixelBuffer::filled(64, 64, Rgb888::BLACK);

        let err = driver.render(&frame).unwrap_err();
        assert!(matches!(err, DisplayError::BufferSizeMismatch { .. }));
    }

    #[test]
    fn test_mock_driver_init_failure_is_fatal() {
        let mut driver = MockDriver::new_with_size(128, 128);
        driver.state().lock().unwrap().simulate_init_failure = true;
        assert!(driver.init().unwrap_err().is_fatal());
    }
}
