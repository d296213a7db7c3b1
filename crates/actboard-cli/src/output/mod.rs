//! Output formatting module for actboard
//!
//! Provides text and JSON output for command results and activity tables.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use actboard_core::TableSnapshot;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON format - machine-readable output
    Json,
    /// Plain text format - aligned columns, one row per line
    #[default]
    Text,
}

/// Formatter that can output data in text or JSON format
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Create a new formatter with the specified output format
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format data according to the configured output format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
            OutputFormat::Text => {
                let json_value = serde_json::to_value(data)?;
                Ok(render_text(&json_value))
            }
        }
    }

    /// Format data and write it to `out`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn write<T: Serialize>(&self, out: &mut impl Write, data: &T) -> Result<()> {
        let output = self.format(data)?;
        writeln!(out, "{output}")?;
        Ok(())
    }

    /// Render a table snapshot.
    ///
    /// JSON wraps the rows as objects keyed by role name, with a count.
    /// Text prints a header line and padded columns.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn format_table(&self, view: &str, table: &TableSnapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = table
                    .rows
                    .iter()
                    .map(|row| {
                        let obj: serde_json::Map<String, serde_json::Value> = table
                            .columns
                            .iter()
                            .zip(row)
                            .map(|(col, cell)| ((*col).to_string(), serde_json::json!(cell)))
                            .collect();
                        serde_json::Value::Object(obj)
                    })
                    .collect();
                let envelope = serde_json::json!({
                    "view": view,
                    "count": rows.len(),
                    "rows": rows,
                });
                Ok(serde_json::to_string_pretty(&envelope)?)
            }
            OutputFormat::Text => Ok(render_table(view, table)),
        }
    }

    /// Write a table snapshot to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn write_table(
        &self,
        out: &mut impl Write,
        view: &str,
        table: &TableSnapshot,
    ) -> Result<()> {
        let output = self.format_table(view, table)?;
        writeln!(out, "{output}")?;
        Ok(())
    }
}

/// Render a table as aligned text with a `view (n rows)` title line.
fn render_table(view: &str, table: &TableSnapshot) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let noun = if table.rows.len() == 1 { "row" } else { "rows" };
    let mut lines = vec![format!("{view} ({} {noun})", table.rows.len())];
    lines.push(render_line(&table.columns, &widths));
    for row in &table.rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render_line(&cells, &widths));
    }
    lines.join("\n")
}

fn render_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}", width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Render a JSON value as concise text
fn render_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(key, val)| format!("{key}:{}", render_field_value(val)))
            .collect::<Vec<_>>()
            .join("  "),
        serde_json::Value::Array(arr) => {
            arr.iter().map(render_text).collect::<Vec<_>>().join("\n")
        }
        _ => render_field_value(value),
    }
}

/// Render a single field value as concise text
fn render_field_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => {
            if s.contains(' ') || s.contains('\n') {
                format!("\"{}\"", s.replace('\n', "\\n"))
            } else {
                s.clone()
            }
        }
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(render_field_value).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(_) => render_text(value),
    }
}
