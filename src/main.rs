/*
 *  main.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Startup, diagnostics and exit codes for the panel server
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

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use panel_server::config::{self, Cli, Config};
use panel_server::display::{DisplayDriverFactory, DisplayError};
use panel_server::dispatch::DisplayContext;
use panel_server::render::{FontSet, Renderer};
use panel_server::server::Server;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let cfg = config::load(cli).context("loading configuration")?;
    Ok(cfg)
}

/// Startup failures go to stderr only; stdout never sees the ready line.
fn report_startup_failure(err: &DisplayError) {
    match err {
        DisplayError::DriverUnavailable(_) => {
            eprintln!("ST7735 driver not available: {}", err);
            eprintln!("Enable SPI (dtparam=spi=on) and check /dev/spidev0.0 and /dev/gpiochip0");
        }
        _ => eprintln!("Display server error: {}", err),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.dump_config {
        return match serde_yaml::to_string(&cfg) {
            Ok(s) => {
                println!("{s}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let driver = match DisplayDriverFactory::create(&cfg.driver()) {
        Ok(driver) => driver,
        Err(e) => {
            error!("startup failed: {}", e);
            report_startup_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    let (width, height) = driver.dimensions();
    let renderer = Renderer::new(FontSet::load(&cfg.font_path()), width, height);
    let ctx = DisplayContext::new(driver, renderer);

    // a broken control stream is handled like end-of-input; run() logs it
    let _ = Server::new(ctx, io::stdin().lock(), io::stdout().lock()).run();
    ExitCode::SUCCESS
}
