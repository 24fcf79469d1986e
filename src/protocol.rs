/*
 *  protocol.rs
 *
 *  panel-server - one panel, many frames
 *  (c) 2020-26 Stuart Hunter
 *
 *  Line protocol - request parsing and response encoding
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

use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::display::color::NamedColor;
use crate::render::FontSize;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Line is not JSON at all
    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    /// Valid JSON, but not an object, or a field the action reads has the wrong type
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// A request resolved to one concrete action with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Clear,
    Text { text: String, size: FontSize, color: NamedColor },
    Number { number: serde_json::Number, size: FontSize, color: NamedColor },
    Color { r: u8, g: u8, b: u8 },
    Image { path: PathBuf },
    /// Missing, non-string or unknown action; acknowledged without drawing
    Ignored { action: Option<String> },
}

impl Command {
    /// Action name for logging
    pub fn name(&self) -> &str {
        match self {
            Command::Clear => "clear",
            Command::Text { .. } => "text",
            Command::Number { .. } => "number",
            Command::Color { .. } => "color",
            Command::Image { .. } => "image",
            Command::Ignored { action } => action.as_deref().unwrap_or("<none>"),
        }
    }

    /// Resolve a request object. Only the fields the action reads are looked at.
    pub fn from_request(req: &Map<String, Value>) -> Result<Self, ProtocolError> {
        let action = match field(req, "action") {
            None => return Ok(Command::Ignored { action: None }),
            Some(Value::String(s)) => s.as_str(),
            Some(other) => return Ok(Command::Ignored { action: Some(other.to_string()) }),
        };

        let cmd = match action {
            "clear" => Command::Clear,
            "text" => Command::Text {
                text: text_field(req, "text")?.unwrap_or_default(),
                size: size_field(req, FontSize::Medium),
                color: color_field(req),
            },
            "number" => Command::Number {
                number: number_field(req, "number")?.unwrap_or_else(|| serde_json::Number::from(0)),
                size: size_field(req, FontSize::Large),
                color: color_field(req),
            },
            "color" => Command::Color {
                r: component(req, "r")?,
                g: component(req, "g")?,
                b: component(req, "b")?,
            },
            "image" => Command::Image { path: image_path(req) },
            other => Command::Ignored { action: Some(other.to_string()) },
        };
        Ok(cmd)
    }
}

/// Present and not null
fn field<'a>(req: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    req.get(name).filter(|v| !v.is_null())
}

fn wrong_type(name: &str, expected: &str, got: &Value) -> ProtocolError {
    ProtocolError::InvalidRequest(format!("field '{}' must be {}, got {}", name, expected, got))
}

fn text_field(req: &Map<String, Value>, name: &str) -> Result<Option<String>, ProtocolError> {
    match field(req, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(name, "a string", other)),
    }
}

fn number_field(req: &Map<String, Value>, name: &str) -> Result<Option<serde_json::Number>, ProtocolError> {
    match field(req, name) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(other) => Err(wrong_type(name, "a number", other)),
    }
}

// size and color are lookups: anything that is not a known name takes the fallback
fn size_field(req: &Map<String, Value>, default: FontSize) -> FontSize {
    field(req, "size").map_or(default, |v| FontSize::from_name(v.as_str().unwrap_or_default()))
}

fn color_field(req: &Map<String, Value>) -> NamedColor {
    field(req, "color").map_or(NamedColor::White, |v| NamedColor::from_name(v.as_str().unwrap_or_default()))
}

/// A non-string path cannot be opened; it goes the way of any unreadable image
fn image_path(req: &Map<String, Value>) -> PathBuf {
    match field(req, "imagePath") {
        Some(Value::String(s)) => PathBuf::from(s),
        Some(other) => {
            debug!("imagePath {} is not a string", other);
            PathBuf::new()
        }
        None => PathBuf::new(),
    }
}

/// Color channel with default 0, clamped into 0..=255
fn component(req: &Map<String, Value>, name: &str) -> Result<u8, ProtocolError> {
    let v = match field(req, name) {
        None => 0,
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64()) {
            (Some(v), _) => v,
            (None, Some(_)) => i64::MAX,
            _ => return Err(wrong_type(name, "an integer", &Value::Number(n.clone()))),
        },
        Some(other) => return Err(wrong_type(name, "an integer", other)),
    };
    let clamped = v.clamp(0, 255);
    if clamped != v {
        warn!("color component {}={} clamped to {}", name, v, clamped);
    }
    Ok(clamped as u8)
}

/// Parse one request line (without its newline)
pub fn parse_line(line: &[u8]) -> Result<Command, ProtocolError> {
    let value: Value = serde_json::from_slice(line.trim_ascii()).map_err(ProtocolError::InvalidJson)?;
    match value {
        Value::Object(req) => Command::from_request(&req),
        other => Err(ProtocolError::InvalidRequest(format!("expected a JSON object, got {}", other))),
    }
}

/// One response line per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok,
    Error { message: String },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error { message: message.into() }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let cmd = parse_line(br#"{"action":"text"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Text { text: String::new(), size: FontSize::Medium, color: NamedColor::White }
        );
    }

    #[test]
    fn test_number_defaults_large_and_zero() {
        match parse_line(br#"{"action":"number"}"#).unwrap() {
            Command::Number { number, size, color } => {
                assert_eq!(number.to_string(), "0");
                assert_eq!(size, FontSize::Large);
                assert_eq!(color, NamedColor::White);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_size_and_color() {
        let cmd = parse_line(br#"{"action":"text","text":"hi","size":"huge","color":"purple"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Text { text: "hi".into(), size: FontSize::Medium, color: NamedColor::White }
        );
    }

    #[test]
    fn test_color_components() {
        assert_eq!(parse_line(br#"{"action":"color"}"#).unwrap(), Command::Color { r: 0, g: 0, b: 0 });
        assert_eq!(
            parse_line(br#"{"action":"color","r":255,"g":-4,"b":300}"#).unwrap(),
            Command::Color { r: 255, g: 0, b: 255 }
        );
    }

    #[test]
    fn test_image_path_camel_case() {
        assert_eq!(
            parse_line(br#"{"action":"image","imagePath":"/tmp/x.png"}"#).unwrap(),
            Command::Image { path: PathBuf::from("/tmp/x.png") }
        );
    }

    #[test]
    fn test_missing_and_unknown_action() {
        assert_eq!(parse_line(br#"{"text":"x"}"#).unwrap(), Command::Ignored { action: None });
        let cmd = parse_line(br#"{"action":"blink"}"#).unwrap();
        assert_eq!(cmd.name(), "blink");
    }

    #[test]
    fn test_invalid_json_message() {
        let err = parse_line(b"{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
        assert_eq!(err.to_string(), "Invalid JSON");
        assert!(matches!(parse_line(b"").unwrap_err(), ProtocolError::InvalidJson(_)));
        assert!(matches!(parse_line(b"\xff\xfe").unwrap_err(), ProtocolError::InvalidJson(_)));
    }

    #[test]
    fn test_non_object_is_invalid_request() {
        let err = parse_line(b"[1,2]").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidRequest(_)));
        assert!(err.to_string().starts_with("Invalid request: "));
        assert!(matches!(parse_line(b"42").unwrap_err(), ProtocolError::InvalidRequest(_)));
    }

    #[test]
    fn test_non_string_action_is_ignored() {
        assert_eq!(parse_line(br#"{"action":5}"#).unwrap(), Command::Ignored { action: Some("5".into()) });
        assert_eq!(parse_line(br#"{"action":null}"#).unwrap(), Command::Ignored { action: None });
    }

    #[test]
    fn test_unread_fields_are_not_checked() {
        assert_eq!(parse_line(br#"{"action":"clear","text":5}"#).unwrap(), Command::Clear);
        assert_eq!(
            parse_line(br#"{"action":"color","r":255,"size":3}"#).unwrap(),
            Command::Color { r: 255, g: 0, b: 0 }
        );
        assert_eq!(
            parse_line(br#"{"action":"text","text":"hi","number":"x"}"#).unwrap(),
            Command::Text { text: "hi".into(), size: FontSize::Medium, color: NamedColor::White }
        );
    }

    #[test]
    fn test_non_string_size_and_color_fall_back() {
        assert_eq!(
            parse_line(br#"{"action":"number","number":7,"size":3,"color":[1]}"#).unwrap(),
            Command::Number { number: serde_json::Number::from(7), size: FontSize::Medium, color: NamedColor::White }
        );
    }

    #[test]
    fn test_read_fields_are_type_checked() {
        let err = parse_line(br#"{"action":"number","number":"ten"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidRequest(_)));
        assert!(err.to_string().contains("'number'"));
        assert!(matches!(
            parse_line(br#"{"action":"text","text":5}"#).unwrap_err(),
            ProtocolError::InvalidRequest(_)
        ));
        assert!(matches!(
            parse_line(br#"{"action":"color","g":"high"}"#).unwrap_err(),
            ProtocolError::InvalidRequest(_)
        ));
        assert!(matches!(
            parse_line(br#"{"action":"color","b":1.5}"#).unwrap_err(),
            ProtocolError::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_non_string_image_path_is_unloadable() {
        assert_eq!(
            parse_line(br#"{"action":"image","imagePath":5}"#).unwrap(),
            Command::Image { path: PathBuf::new() }
        );
    }

    #[test]
    fn test_oversized_component_clamps() {
        assert_eq!(
            parse_line(br#"{"action":"color","r":18446744073709551615}"#).unwrap(),
            Command::Color { r: 255, g: 0, b: 0 }
        );
    }

    #[test]
    fn test_trailing_whitespace_tolerated() {
        assert_eq!(parse_line(b"{\"action\":\"clear\"}\r\n").unwrap(), Command::Clear);
    }

    #[test]
    fn test_response_encoding() {
        assert_eq!(serde_json::to_string(&Response::Ok).unwrap(), r#"{"status":"ok"}"#);
        assert_eq!(
            serde_json::to_string(&Response::error("boom")).unwrap(),
            r#"{"status":"error","message":"boom"}"#
        );
    }
}
