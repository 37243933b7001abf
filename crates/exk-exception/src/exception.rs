// SPDX-License-Identifier: MIT OR Apache-2.0
//! The structured [`Exception`] record.

use crate::recognize::{self, Recognize};
use crate::{Cause, DecodeError, ErrorCode};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// Default `name` of an exception, and the value of its structural marker.
pub const EXCEPTION_NAME: &str = "Exception";

/// Key under which the structural marker is serialised.
pub(crate) const MARKER_KEY: &str = "__typename";

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// Zero-sized structural marker.
///
/// Always serialises to `"Exception"` and refuses to deserialise from
/// anything else, so a decoded [`Exception`] carries the same marker as a
/// freshly constructed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
struct Marker;

impl Serialize for Marker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(EXCEPTION_NAME)
    }
}

impl<'de> Deserialize<'de> for Marker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Cow::<'de, str>::deserialize(deserializer)?;
        if raw == EXCEPTION_NAME {
            Ok(Marker)
        } else {
            Err(de::Error::invalid_value(
                Unexpected::Str(&raw),
                &"the literal \"Exception\"",
            ))
        }
    }
}

impl JsonSchema for Marker {
    fn schema_name() -> Cow<'static, str> {
        "ExceptionMarker".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "const": EXCEPTION_NAME
        })
    }
}

fn default_name() -> String {
    EXCEPTION_NAME.to_owned()
}

fn deserialize_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.is_empty()).unwrap_or_else(default_name))
}

// ---------------------------------------------------------------------------
// ExceptionOptions
// ---------------------------------------------------------------------------

/// Construction options for an [`Exception`].
///
/// Only `code` is required; the rest default to "absent".
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionOptions<C = ErrorCode> {
    /// Machine-readable code.
    pub code: C,
    /// Category label; `"Exception"` when absent or empty.
    pub name: Option<String>,
    /// Transport status hint. Usually HTTP-like, but any JSON number is kept.
    pub status: Option<Number>,
    /// Underlying cause.
    pub cause: Option<Cause>,
}

impl<C> ExceptionOptions<C> {
    /// Options carrying only a code.
    pub fn new(code: C) -> Self {
        Self {
            code,
            name: None,
            status: None,
            cause: None,
        }
    }

    /// Set the category label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the transport status.
    pub fn with_status(mut self, status: impl Into<Number>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Attach an underlying cause.
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Exception
// ---------------------------------------------------------------------------

/// Structured error with a stable code that stays recognisable after it
/// has been serialised.
///
/// `M` is the message payload (a `String` unless stated otherwise) and `C`
/// the code type ([`ErrorCode`] unless stated otherwise). Every instance
/// carries a private `__typename: "Exception"` marker which is what
/// [`is_exception`](crate::is_exception) looks for once the value has been
/// reduced to plain JSON.
///
/// ```
/// use exk_exception::{Exception, ExceptionOptions, ErrorCode, is_exception};
///
/// let err = Exception::new(
///     "upstream refused",
///     ExceptionOptions::new(ErrorCode::WRONG_VALUE).with_status(502),
/// );
/// assert_eq!(err.name(), "Exception");
///
/// let wire = serde_json::to_value(&err).unwrap();
/// assert!(is_exception(&wire));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Exception<M = String, C = ErrorCode> {
    message: M,
    code: C,
    #[serde(default = "default_name", deserialize_with = "deserialize_name")]
    #[schemars(with = "String")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<Number>,
    #[serde(rename = "__typename")]
    marker: Marker,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cause: Option<Cause>,
}

impl<C> Exception<String, C> {
    /// Create an exception with a string message.
    pub fn new(message: impl Into<String>, options: ExceptionOptions<C>) -> Self {
        Self::with_payload(message.into(), options)
    }

    /// Shorthand for `Exception::new(message, ExceptionOptions::new(code))`.
    pub fn with_code(message: impl Into<String>, code: C) -> Self {
        Self::new(message, ExceptionOptions::new(code))
    }
}

impl<M, C> Exception<M, C> {
    /// Create an exception with an arbitrary message payload.
    pub fn with_payload(message: M, options: ExceptionOptions<C>) -> Self {
        let ExceptionOptions {
            code,
            name,
            status,
            cause,
        } = options;
        Self {
            message,
            code,
            name: name.filter(|n| !n.is_empty()).unwrap_or_else(default_name),
            status,
            marker: Marker,
            cause: cause.filter(|c| !c.is_null()),
        }
    }

    /// The message payload.
    pub fn message(&self) -> &M {
        &self.message
    }

    /// The machine-readable code.
    pub fn code(&self) -> &C {
        &self.code
    }

    /// The category label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The transport status, if any.
    pub fn status(&self) -> Option<&Number> {
        self.status.as_ref()
    }

    /// The underlying cause, if any.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    /// Consume the exception, returning its message payload.
    pub fn into_message(self) -> M {
        self.message
    }
}

impl<M: Serialize, C: Serialize> Exception<M, C> {
    /// Structural JSON projection of the exception.
    ///
    /// Contains `message`, `code`, `name`, `status` (when set), the
    /// `__typename` marker and `cause` (when set).
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl<M: DeserializeOwned, C: DeserializeOwned> Exception<M, C> {
    /// Revive an exception from its structural JSON projection.
    ///
    /// Fails with [`DecodeError::NotAnException`] when the marker is missing
    /// or wrong, and with [`DecodeError::Malformed`] when the marker is
    /// present but the remaining fields do not decode into `M` / `C`.
    pub fn from_json(value: Value) -> Result<Self, DecodeError> {
        if !recognize::is_exception(&value) {
            debug!(target: "exk.decode", "value carries no exception marker");
            return Err(DecodeError::NotAnException);
        }
        serde_json::from_value(value).map_err(|e| {
            debug!(target: "exk.decode", error = %e, "exception payload failed to decode");
            DecodeError::Malformed(e)
        })
    }

    /// Parse a JSON document and revive the exception it contains.
    pub fn from_json_str(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(value)
    }
}

impl Exception {
    /// Returns `true` if `value` is an exception, natively or structurally.
    ///
    /// See [`is_exception`](crate::is_exception).
    pub fn is_exception<T: Recognize + ?Sized>(value: &T) -> bool {
        recognize::is_exception(value)
    }

    /// Returns `true` if `value` is an exception named `"AbortError"` or
    /// carrying [`ErrorCode::ABORT`].
    pub fn is_abort_error<T: Recognize + ?Sized>(value: &T) -> bool {
        recognize::is_abort_error(value)
    }

    /// Like [`Exception::is_abort_error`] with a caller-chosen abort code.
    pub fn is_abort_error_with_code<T, K>(value: &T, code: &K) -> bool
    where
        T: Recognize + ?Sized,
        K: Serialize + ?Sized,
    {
        recognize::is_abort_error_with_code(value, code)
    }
}

impl<M: fmt::Display, C: fmt::Display> fmt::Display for Exception<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.name, self.message)
    }
}

impl<M, C> std::error::Error for Exception<M, C>
where
    M: fmt::Display + fmt::Debug,
    C: fmt::Display + fmt::Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}
