/*
 *  config.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runtime configuration - YAML file layered under CLI overrides
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

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::DEFAULT_FONT_PATH;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Which panel driver backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// ST7735 on /dev/spidev0.0
    St7735,
    /// No hardware; frames are accepted and discarded
    Mock,
}

/// Top-level app configuration.
///
/// Panel geometry and wiring are compiled in (see `constants`) and are
/// deliberately absent here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub font_path: Option<PathBuf>,    // TrueType face for text commands
    pub driver: Option<DriverKind>,
}

impl Config {
    pub fn driver(&self) -> DriverKind {
        self.driver.unwrap_or(DriverKind::St7735)
    }

    pub fn font_path(&self) -> PathBuf {
        self.font_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "panel-server", version, about = "Persistent display server for an SPI TFT panel")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long, value_enum)]
    pub driver: Option<DriverKind>,
    /// TrueType font used for text and number commands
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub font_path: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: read YAML, merge CLI overrides, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    if let Some(home) = home_dir() {
        let p = home.join(".config/panel-server/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/panel-server.yaml");
        if p.exists() { return Some(p) }
    }
    for candidate in &["panel-server.yaml", "config/panel-server.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()  { dst.log_level = src.log_level; }
    if src.font_path.is_some()  { dst.font_path = src.font_path; }
    if src.driver.is_some()     { dst.driver = src.driver; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()  { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                { cfg.log_level = Some("debug".to_string()); }
    if cli.font_path.is_some()  { cfg.font_path = cli.font_path.clone(); }
    if cli.driver.is_some()     { cfg.driver = cli.driver; }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join("|"),
                level
            )));
        }
    }
    if let Some(p) = cfg.font_path.as_ref() {
        if p.as_os_str().is_empty() {
            return Err(ConfigError::Validation("font_path must not be empty".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.driver(), DriverKind::St7735);
        assert_eq!(cfg.font_path(), PathBuf::from(DEFAULT_FONT_PATH));
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_yaml_then_cli_precedence() {
        let file = write_config("log_level: warn\ndriver: mock\nfont_path: /tmp/a.ttf\n");
        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            font_path: Some(PathBuf::from("/tmp/b.ttf")),
            ..Default::default()
        };

        let cfg = load(&cli).unwrap();
        assert_eq!(cfg.driver(), DriverKind::Mock);
        assert_eq!(cfg.log_level(), "warn");
        assert_eq!(cfg.font_path(), PathBuf::from("/tmp/b.ttf"));
    }

    #[test]
    fn test_debug_flag_wins() {
        let file = write_config("log_level: error\n");
        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            debug: true,
            ..Default::default()
        };
        assert_eq!(load(&cli).unwrap().log_level(), "debug");
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/panel-server.yaml")),
            ..Default::default()
        };
        assert!(matches!(load(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let cfg = Config { log_level: Some("loud".into()), ..Default::default() };
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_unknown_driver_is_yaml_error() {
        let file = write_config("driver: ssd1306\n");
        let cli = Cli { config: Some(file.path().to_path_buf()), ..Default::default() };
        assert!(matches!(load(&cli), Err(ConfigError::Yaml(_))));
    }
}
