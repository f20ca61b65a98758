//! Output modes for data results.
//!
//! Every command that produces data hands it to [`emit`] together with a
//! text renderer. Structured modes ignore the renderer and serialize the
//! data; CSV flattens nested objects into dotted column names, with columns
//! in the order keys are first seen.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use console::style;
use serde::Serialize;
use serde_json::Value;
use umbra_render::{color, to_ansi256};

/// How data results are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Aligned, human-readable text with color swatches.
    #[default]
    Text,
    Json,
    Yaml,
    Csv,
}

/// Writes `data` in `mode`, using `text` for [`OutputMode::Text`].
pub fn emit<T, W, F>(out: &mut W, mode: OutputMode, data: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
    F: FnOnce(&mut W) -> std::io::Result<()>,
{
    match mode {
        OutputMode::Text => text(out)?,
        OutputMode::Json => writeln!(out, "{}", serde_json::to_string_pretty(data)?)?,
        OutputMode::Yaml => write!(out, "{}", serde_yaml::to_string(data)?)?,
        OutputMode::Csv => write_csv(out, &serde_json::to_value(data)?)?,
    }
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, value: &Value) -> Result<()> {
    let records: Vec<Vec<(String, String)>> = match value {
        Value::Array(items) => items.iter().map(flatten).collect(),
        other => vec![flatten(other)],
    };

    let mut headers: Vec<String> = Vec::new();
    for (key, _) in records.iter().flatten() {
        if !headers.contains(key) {
            headers.push(key.clone());
        }
    }

    let mut writer = csv::Writer::from_writer(out);
    if headers.is_empty() {
        return Ok(());
    }
    writer.write_record(&headers)?;
    for record in &records {
        let row = headers.iter().map(|header| {
            record
                .iter()
                .find(|(key, _)| key == header)
                .map(|(_, value)| value.as_str())
                .unwrap_or("")
        });
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Flattens one record into `(column, cell)` pairs.
fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut cells = Vec::new();
    flatten_into(value, "", &mut cells);
    cells
}

fn flatten_into(value: &Value, prefix: &str, cells: &mut Vec<(String, String)>) {
    let column = || {
        if prefix.is_empty() {
            "value".to_string()
        } else {
            prefix.to_string()
        }
    };
    match value {
        Value::Null => {}
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(nested, &name, cells);
            }
        }
        Value::String(s) => cells.push((column(), s.clone())),
        other => cells.push((column(), other.to_string())),
    }
}

/// A two-cell color swatch for `expression`, blank when it does not parse.
pub fn swatch(expression: &str) -> String {
    match color::parse(expression) {
        Some(rgba) => style("  ")
            .on_color256(to_ansi256((rgba.r, rgba.g, rgba.b)))
            .to_string(),
        None => "  ".to_string(),
    }
}
