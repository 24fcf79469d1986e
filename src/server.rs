/*
 *  server.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Server loop - one request line in, one response line out
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

use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, info};
use thiserror::Error;

use crate::constants::READY_MARKER;
use crate::dispatch::DisplayContext;
use crate::protocol::Response;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The control stream itself failed; there is nobody left to answer
    #[error("control stream error: {0}")]
    Stream(#[from] std::io::Error),
}

/// Serves requests from `input` until end-of-stream
pub struct Server<R, W> {
    ctx: DisplayContext,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Server<R, W> {
    pub fn new(ctx: DisplayContext, input: R, output: W) -> Self {
        Self { ctx, input, output }
    }

    /// Announce readiness, then answer every line in order
    ///
    /// Returns the number of requests answered. The panel is released
    /// on the way out whether the stream ended cleanly or broke.
    pub fn run(mut self) -> Result<usize, ServerError> {
        let served = self.serve();

        if let Err(e) = self.ctx.shutdown() {
            error!("panel shutdown: {}", e);
        }
        match &served {
            Ok(n) => info!("end of input after {} requests", n),
            Err(e) => error!("{}", e),
        }
        served
    }

    fn serve(&mut self) -> Result<usize, ServerError> {
        writeln!(self.output, "{}", READY_MARKER)?;
        self.output.flush()?;

        let mut served = 0;
        let mut line = Vec::new();
        loop {
            line.clear();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                return Ok(served);
            }

            let response = self.handle(&line);
            serde_json::to_writer(&mut self.output, &response).map_err(std::io::Error::from)?;
            self.output.write_all(b"\n")?;
            self.output.flush()?;
            served += 1;
        }
    }

    /// Dispatch one line; a panic inside becomes an error response
    fn handle(&mut self, line: &[u8]) -> Response {
        let ctx = &mut self.ctx;
        match panic::catch_unwind(AssertUnwindSafe(|| ctx.dispatch(line))) {
            Ok(response) => {
                debug!("-> {:?}", response);
                response
            }
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("command panicked: {}", msg);
                Response::error(format!("internal error: {}", msg))
            }
        }
    }
}
