//! Output rendering: JSON or delimited text.
//!
//! Rendering is the last pipeline stage. It projects the requested fields
//! and returns the complete, newline-terminated output as one string so
//! the caller can write stdout in a single shot, with no partial output
//! on error.

use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::error::{ExportError, Result};
use crate::item::{render_scalar, WishlistItem};

/// Quoting behavior for delimited output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QuoteMode {
    /// No quoting; embedded separators, quotes, backslashes and line
    /// breaks are backslash-escaped instead.
    Never,
    /// Quote only fields that need it.
    Minimal,
    /// Quote every field.
    Always,
}

/// Resolved output mode.
#[derive(Debug, Clone)]
pub enum OutputMode {
    /// Pretty-printed JSON object keyed by gameid. `fields: None` keeps
    /// every normalized field.
    Json { fields: Option<Vec<&'static str>> },
    /// One line per record, no header row.
    Delimited {
        fields: Vec<&'static str>,
        separator: u8,
        quote: QuoteMode,
    },
}

/// Render the record set in the requested mode.
pub fn render(items: &[WishlistItem], mode: &OutputMode) -> Result<String> {
    match mode {
        OutputMode::Json { fields } => render_json(items, fields.as_deref()),
        OutputMode::Delimited {
            fields,
            separator,
            quote,
        } => render_delimited(items, fields, *separator, *quote),
    }
}

/// One JSON object keyed by gameid, pipeline order preserved. Projection
/// keeps each record's own field order.
fn render_json(items: &[WishlistItem], fields: Option<&[&'static str]>) -> Result<String> {
    let mut out = Map::new();
    for item in items {
        let mut fields_out = item.fields.clone();
        if let Some(wanted) = fields {
            fields_out.retain(|key, _| wanted.contains(&key.as_str()));
        }
        out.insert(item.gameid.clone(), Value::Object(fields_out));
    }
    let mut text = serde_json::to_string_pretty(&Value::Object(out))?;
    text.push('\n');
    Ok(text)
}

fn render_delimited(
    items: &[WishlistItem],
    fields: &[&'static str],
    separator: u8,
    quote: QuoteMode,
) -> Result<String> {
    let style = match quote {
        QuoteMode::Never => csv::QuoteStyle::Never,
        QuoteMode::Minimal => csv::QuoteStyle::Necessary,
        QuoteMode::Always => csv::QuoteStyle::Always,
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(separator)
        .quote_style(style)
        .from_writer(vec![]);

    for item in items {
        let row: Vec<String> = fields
            .iter()
            .map(|field| {
                let cell = render_scalar(item.field(field));
                match quote {
                    // The csv writer emits Never-style fields verbatim,
                    // so embedded metacharacters must be escaped here.
                    QuoteMode::Never => escape_unquoted(&cell, separator),
                    _ => cell,
                }
            })
            .collect();
        writer.write_record(&row)?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| ExportError::Format(format!("delimited output failed: {e}")))?;
    String::from_utf8(data)
        .map_err(|e| ExportError::Format(format!("delimited output is not UTF-8: {e}")))
}

/// Backslash-escape the separator, the quote character, backslash itself,
/// CR and LF. The escaped character stays in place.
fn escape_unquoted(cell: &str, separator: u8) -> String {
    let sep = char::from(separator);
    let mut out = String::with_capacity(cell.len());
    for c in cell.chars() {
        if c == '\\' || c == sep || c == '"' || c == '\r' || c == '\n' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
