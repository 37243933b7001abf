// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output formatting for the `exk` CLI.

use crate::commands::{CodeEntry, InspectReport};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Pretty JSON; serialisation failures are rendered as an `error` object.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Render an inspection report.
pub fn format_report(report: &InspectReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "exception: {}", yes_no(report.exception));
            let _ = writeln!(out, "abort:     {}", yes_no(report.abort));
            if let Some(name) = &report.name {
                let _ = writeln!(out, "name:      {name}");
            }
            if let Some(code) = &report.code {
                let _ = writeln!(out, "code:      {}", display_code(code));
            }
            if let Some(status) = &report.status {
                let _ = writeln!(out, "status:    {status}");
            }
            if report.has_cause {
                let kind = if report.cause_is_exception {
                    "exception"
                } else {
                    "value"
                };
                let _ = writeln!(out, "cause:     {kind}");
            }
            out
        }
    }
}

/// Render the code table.
pub fn format_codes(entries: &[CodeEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&entries),
        OutputFormat::Text => {
            let width = entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
            let mut out = String::new();
            for entry in entries {
                let origin = if entry.builtin { "builtin" } else { "custom" };
                let _ = writeln!(
                    out,
                    "{:<width$}  {}  ({origin})",
                    entry.label, entry.code
                );
            }
            out
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn display_code(code: &serde_json::Value) -> String {
    match code.as_str() {
        Some(s) => s.to_owned(),
        None => code.to_string(),
    }
}
