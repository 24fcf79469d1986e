/*
 *  dispatch.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Command dispatch with an explicit per-action failure policy
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

use log::{debug, error, warn};

use crate::display::error::DisplayError;
use crate::display::factory::BoxedDriver;
use crate::display::traits::PanelDriver;
use crate::protocol::{parse_line, Command, Response};
use crate::render::{number_text, RenderError, Renderer};

/// What a failed command turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Reply with an error response
    Surface,
    /// Log it and reply ok
    LogAndIgnore,
}

/// Decide how a render failure for `command` is reported
///
/// Only an image that cannot be loaded is forgiven; the panel keeps
/// whatever it showed before. A failed write of a loaded image is still
/// an error, like every other action.
pub fn failure_policy(command: &Command, err: &RenderError) -> FailurePolicy {
    match (command, err) {
        (Command::Image { .. }, RenderError::ImageLoad { .. }) => FailurePolicy::LogAndIgnore,
        _ => FailurePolicy::Surface,
    }
}

/// The single panel handle plus everything needed to draw on it
///
/// Built once at startup and owned by the server loop.
pub struct DisplayContext {
    driver: BoxedDriver,
    renderer: Renderer,
}

impl DisplayContext {
    pub fn new(driver: BoxedDriver, renderer: Renderer) -> Self {
        Self { driver, renderer }
    }

    pub fn driver(&self) -> &dyn PanelDriver {
        self.driver.as_ref()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Render one command and push it to the panel
    pub fn execute(&mut self, command: &Command) -> Result<(), RenderError> {
        let frame = match command {
            Command::Clear => self.renderer.clear_frame(),
            Command::Text { text, size, color } => self.renderer.text_frame(text, *size, *color),
            Command::Number { number, size, color } => {
                self.renderer.text_frame(&number_text(number), *size, *color)
            }
            Command::Color { r, g, b } => self.renderer.color_frame(*r, *g, *b),
            Command::Image { path } => self.renderer.image_frame(path)?,
            Command::Ignored { .. } => return Ok(()),
        };
        self.renderer.show(self.driver.as_mut(), &frame)
    }

    /// Parse, render and acknowledge one request line
    pub fn dispatch(&mut self, line: &[u8]) -> Response {
        let command = match parse_line(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("rejected request: {}", e);
                return Response::error(e.to_string());
            }
        };

        debug!("dispatching {}", command.name());
        if let Command::Ignored { action } = &command {
            debug!("no-op for action {:?}", action);
        }

        match self.execute(&command) {
            Ok(()) => Response::Ok,
            Err(e) => match failure_policy(&command, &e) {
                FailurePolicy::LogAndIgnore => {
                    warn!("{}", e);
                    Response::Ok
                }
                FailurePolicy::Surface => {
                    error!("{} failed: {}", command.name(), e);
                    Response::error(e.to_string())
                }
            },
        }
    }

    /// Release the panel; only called on orderly shutdown
    pub fn shutdown(&mut self) -> Result<(), DisplayError> {
        self.driver.shutdown()
    }
}
