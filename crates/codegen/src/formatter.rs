//! Rendering of config sections into file text.
//!
//! Sections are held as [`serde_json::Value`] and rendered according to the
//! [`Format`] of the file they become.

use crate::{CodegenError, Result};
use serde::Serialize;
use serde_json::Value;

/// Output format of one config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON, 2-space indent
    Json,
    /// EditorConfig INI: optional `root` flag followed by `[pattern]` sections
    EditorConfig,
    /// One pattern per line
    IgnoreLines,
    /// `module.exports = <json>;`
    ModuleExports,
    /// A string value written verbatim
    Text,
}

/// Renders section values.
#[derive(Debug, Default)]
pub struct Formatter;

impl Formatter {
    /// Create a new formatter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render `value` as `format`. Output always ends with a newline.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Json`] if serialization fails, or
    /// [`CodegenError::Validation`] if the value has the wrong shape for
    /// the format.
    pub fn format(&self, value: &Value, format: Format) -> Result<String> {
        let rendered = match format {
            Format::Json => self.format_json(value)?,
            Format::EditorConfig => self.format_editorconfig(value)?,
            Format::IgnoreLines => self.format_ignore(value)?,
            Format::ModuleExports => format!("module.exports = {};", self.format_json(value)?),
            Format::Text => value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| shape_error("text", "expected a string"))?,
        };

        if rendered.is_empty() || rendered.ends_with('\n') {
            Ok(rendered)
        } else {
            Ok(format!("{rendered}\n"))
        }
    }

    /// Format JSON content
    #[allow(clippy::unused_self)]
    fn format_json(&self, value: &Value) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// `{"root": bool, "sections": {"<pattern>": {"key": value}}}`
    #[allow(clippy::unused_self)]
    fn format_editorconfig(&self, value: &Value) -> Result<String> {
        let mut lines = Vec::new();

        if value.get("root").and_then(Value::as_bool).unwrap_or(false) {
            lines.push("root = true".to_string());
            lines.push(String::new());
        }

        let sections = value
            .get("sections")
            .and_then(Value::as_object)
            .ok_or_else(|| shape_error("editorconfig", "expected a `sections` object"))?;

        for (pattern, section) in sections {
            let Some(properties) = section.as_object() else {
                return Err(shape_error("editorconfig", "each section must be an object"));
            };
            if properties.is_empty() {
                continue;
            }

            lines.push(format!("[{pattern}]"));
            for (key, value) in properties {
                lines.push(format!("{key} = {}", scalar(value)));
            }
            lines.push(String::new());
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }

        Ok(lines.join("\n"))
    }

    /// `{"header": "...", "patterns": ["..."]}` or a bare array of patterns
    #[allow(clippy::unused_self)]
    fn format_ignore(&self, value: &Value) -> Result<String> {
        let (header, patterns) = match value {
            Value::Array(patterns) => (None, patterns),
            Value::Object(map) => (
                map.get("header").and_then(Value::as_str),
                map.get("patterns")
                    .and_then(Value::as_array)
                    .ok_or_else(|| shape_error("ignore", "expected a `patterns` array"))?,
            ),
            _ => return Err(shape_error("ignore", "expected an array or object")),
        };

        let mut lines = Vec::new();
        if let Some(header) = header {
            lines.extend(header.lines().map(|line| format!("# {line}")));
            lines.push(String::new());
        }
        for pattern in patterns {
            let pattern = pattern
                .as_str()
                .ok_or_else(|| shape_error("ignore", "patterns must be strings"))?;
            lines.push(pattern.to_string());
        }

        Ok(lines.join("\n"))
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn shape_error(format: &str, message: &str) -> CodegenError {
    CodegenError::validation("config-section", format!("{format}: {message}"))
}
