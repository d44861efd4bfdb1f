//! Output rendering
//!
//! Resources are printed as aligned text tables built from per-type column
//! metadata, or dumped as JSON/YAML.

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output format selected with `--output`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Display column: header plus dotted path into the serialized resource
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub json_path: &'static str,
}

impl Column {
    pub const fn new(header: &'static str, json_path: &'static str) -> Self {
        Self { header, json_path }
    }
}

/// Display metadata for a resource type
pub trait Columns {
    const COLUMNS: &'static [Column];
}

/// Render a list of resources
pub fn render_list<T: Serialize + Columns>(items: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(items)?),
        OutputFormat::Text => {
            let rows = items
                .iter()
                .map(|item| {
                    let value = serde_json::to_value(item)?;
                    Ok(T::COLUMNS
                        .iter()
                        .map(|c| extract_json_value(&value, c.json_path))
                        .collect())
                })
                .collect::<Result<Vec<Vec<String>>>>()?;
            Ok(render_table(T::COLUMNS, &rows))
        }
    }
}

/// Render a single resource
pub fn render_item<T: Serialize + Columns>(item: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(item)?),
        OutputFormat::Text => {
            let value = serde_json::to_value(item)?;
            let width = T::COLUMNS.iter().map(|c| c.header.len()).max().unwrap_or(0) + 1;
            Ok(T::COLUMNS
                .iter()
                .map(|c| {
                    format!(
                        "{:<width$} {}",
                        format!("{}:", c.header),
                        extract_json_value(&value, c.json_path),
                        width = width
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(columns.iter().map(|c| c.header).collect())];
    lines.extend(
        rows.iter()
            .map(|row| format_row(row.iter().map(String::as_str).collect())),
    );
    lines.join("\n")
}

/// Extract a value from JSON using a dot-notation path
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let mut current = item;

    for part in path.split('.') {
        let next = match part.parse::<usize>() {
            Ok(idx) => current.get(idx),
            Err(_) => current.get(part),
        };
        current = match next {
            Some(v) => v,
            None => return "-".to_string(),
        };
    }

    scalar(current)
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) if s.is_empty() => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) if arr.is_empty() => "-".to_string(),
        Value::Array(arr) if arr.iter().all(|v| !v.is_object() && !v.is_array()) => {
            arr.iter().map(scalar).collect::<Vec<_>>().join(",")
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}
