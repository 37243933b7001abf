// SPDX-License-Identifier: MIT OR Apache-2.0
//! Implementations behind the `exk` subcommands.

use crate::config::ExkConfig;
use exk_exception::{
    AbortError, AbortOptions, Cause, ErrorCode, Exception, ExceptionOptions, Recognize,
    is_abort_error, is_abort_error_with_code, is_exception,
};
use serde::Serialize;
use serde_json::{Number, Value};
use tracing::debug;

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

/// Classification of one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    /// Carries the exception marker.
    pub exception: bool,
    /// Recognised as an abort (by name, by `ERR:ABORT`, or by a configured code).
    pub abort: bool,
    /// The `name` field, when the document is an exception.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The `code` field, when the document is an exception.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
    /// The `status` field, when present and numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Number>,
    /// Whether a cause is attached.
    pub has_cause: bool,
    /// Whether the cause is itself an exception.
    pub cause_is_exception: bool,
}

/// Classify `value`, treating `abort_codes` as additional abort codes.
pub fn inspect(value: &Value, abort_codes: &[ErrorCode]) -> InspectReport {
    let Some(fingerprint) = value.fingerprint() else {
        debug!(target: "exk.cli", "document is not an exception");
        return InspectReport {
            exception: false,
            abort: false,
            name: None,
            code: None,
            status: None,
            has_cause: false,
            cause_is_exception: false,
        };
    };

    let abort = is_abort_error(value)
        || abort_codes
            .iter()
            .any(|code| is_abort_error_with_code(value, code));
    let cause = value.get("cause").filter(|c| !c.is_null());

    InspectReport {
        exception: true,
        abort,
        name: fingerprint.name.map(str::to_owned),
        code: fingerprint.code.map(|c| c.into_owned()),
        status: value.get("status").and_then(Value::as_number).cloned(),
        has_cause: cause.is_some(),
        cause_is_exception: cause.is_some_and(is_exception),
    }
}

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

/// Inputs for `exk new`.
#[derive(Debug, Clone, Default)]
pub struct NewException {
    /// Message text.
    pub message: String,
    /// Code label or literal; defaults to `UNKNOWN` (or `ABORT` for aborts).
    pub code: Option<String>,
    /// Category label (ignored for aborts).
    pub name: Option<String>,
    /// Transport status.
    pub status: Option<Number>,
    /// Cause text.
    pub cause: Option<String>,
    /// Build an [`AbortError`] instead of a plain exception.
    pub abort: bool,
}

/// Build the structural JSON for `exk new`.
pub fn build(request: NewException, config: &ExkConfig) -> serde_json::Result<Value> {
    let code = request.code.as_deref().map(|raw| config.resolve_code(raw));
    let cause = request.cause.map(Cause::from);
    let status = request.status;

    if request.abort {
        let options = AbortOptions {
            code,
            status,
            cause,
        };
        return AbortError::with_options(request.message, options).to_json();
    }

    let options = ExceptionOptions {
        code: code.unwrap_or(ErrorCode::UNKNOWN),
        name: request.name,
        status,
        cause,
    };
    Exception::new(request.message, options).to_json()
}

// ---------------------------------------------------------------------------
// codes
// ---------------------------------------------------------------------------

/// One row of `exk codes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    /// Constant or configured label.
    pub label: String,
    /// Wire value.
    pub code: String,
    /// Part of the built-in vocabulary.
    pub builtin: bool,
}

/// Built-in codes followed by the configured custom ones.
pub fn code_entries(config: &ExkConfig) -> Vec<CodeEntry> {
    let builtin = ErrorCode::builtin().iter().map(|code| CodeEntry {
        label: code.builtin_label().unwrap_or_default().to_owned(),
        code: code.as_str().to_owned(),
        builtin: true,
    });
    let custom = config.codes.iter().map(|(label, code)| CodeEntry {
        label: label.clone(),
        code: code.clone(),
        builtin: false,
    });
    builtin.chain(custom).collect()
}

// ---------------------------------------------------------------------------
// schema
// ---------------------------------------------------------------------------

/// JSON Schema of the wire shape of `Exception<String, ErrorCode>`.
pub fn exception_schema() -> serde_json::Result<Value> {
    serde_json::to_value(schemars::schema_for!(Exception))
}
