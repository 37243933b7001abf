// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stable, machine-readable error codes.

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Machine-readable, stable error code.
///
/// The built-in vocabulary is exposed as associated constants. The type is
/// deliberately open: any caller-defined token can be wrapped with
/// [`ErrorCode::custom`] and travels over the wire exactly like a built-in
/// one. Codes serialise to a plain JSON string and are never meant to be
/// shown to end users.
///
/// ```
/// use exk_exception::ErrorCode;
///
/// let code = ErrorCode::custom("ERR:NOTFOUND");
/// assert!(!code.is_builtin());
/// assert!(ErrorCode::ABORT.is_builtin());
/// assert_eq!(ErrorCode::ABORT.as_str(), "ERR:ABORT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(Cow<'static, str>);

impl ErrorCode {
    /// Failure with no more specific classification.
    pub const UNKNOWN: ErrorCode = ErrorCode::from_static("ERR:UNKNOWN");
    /// The operation was cancelled or aborted.
    pub const ABORT: ErrorCode = ErrorCode::from_static("ERR:ABORT");
    /// A required value was missing or empty.
    pub const EMPTY_VALUE: ErrorCode = ErrorCode::from_static("ERR:EMPTYVALUE");
    /// A value was present but not acceptable.
    pub const WRONG_VALUE: ErrorCode = ErrorCode::from_static("ERR:WRONGVALUE");
    /// Something was used after its validity window closed.
    pub const EXPIRED: ErrorCode = ErrorCode::from_static("ERR:EXPIRED");
    /// Something was used before its validity window opened.
    pub const TOO_EARLY: ErrorCode = ErrorCode::from_static("ERR:TOOEARLY");

    /// Wrap a `'static` string without allocating.
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Wrap a caller-defined code.
    ///
    /// No validation is performed; the vocabulary is open for extension.
    pub fn custom(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    /// The wire representation of the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the code is one of [`ErrorCode::builtin`].
    pub fn is_builtin(&self) -> bool {
        BUILTIN_CODES.contains(self)
    }

    /// The built-in vocabulary, in declaration order.
    pub fn builtin() -> &'static [ErrorCode] {
        BUILTIN_CODES
    }

    /// Constant name of a built-in code (`"ABORT"` for `ERR:ABORT`).
    pub fn builtin_label(&self) -> Option<&'static str> {
        BUILTIN_LABELS
            .iter()
            .zip(BUILTIN_CODES)
            .find(|(_, code)| *code == self)
            .map(|(label, _)| *label)
    }
}

const BUILTIN_CODES: &[ErrorCode] = &[
    ErrorCode::UNKNOWN,
    ErrorCode::ABORT,
    ErrorCode::EMPTY_VALUE,
    ErrorCode::WRONG_VALUE,
    ErrorCode::EXPIRED,
    ErrorCode::TOO_EARLY,
];

const BUILTIN_LABELS: &[&str] = &[
    "UNKNOWN",
    "ABORT",
    "EMPTY_VALUE",
    "WRONG_VALUE",
    "EXPIRED",
    "TOO_EARLY",
];

impl Default for ErrorCode {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::custom(s))
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        Self::custom(code)
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        Self::custom(code)
    }
}

impl AsRef<str> for ErrorCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ErrorCode {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for ErrorCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ErrorCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl JsonSchema for ErrorCode {
    fn schema_name() -> Cow<'static, str> {
        "ErrorCode".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "description": "Stable machine-readable error code.",
            "examples": ["ERR:UNKNOWN", "ERR:ABORT"]
        })
    }
}
