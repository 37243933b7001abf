// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chained causes that survive serialization.

use crate::recognize::{self, is_exception};
use crate::{DecodeError, EXCEPTION_NAME, Exception};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The underlying cause of an [`Exception`].
///
/// A cause is stored as its JSON projection so that it crosses a
/// serialization boundary unchanged. When the cause is itself an exception
/// its structural marker is kept, so the chained value is still recognised
/// by [`is_exception`] on the other side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Cause(Value);

impl Cause {
    /// Wrap an arbitrary JSON value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Project any serialisable payload into a cause.
    pub fn from_serialize<T: Serialize + ?Sized>(payload: &T) -> serde_json::Result<Self> {
        serde_json::to_value(payload).map(Self)
    }

    /// Capture an error as a cause.
    ///
    /// Exceptions are embedded structurally (marker included); any other
    /// error is reduced to its display string.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        match recognize::native_projection(error) {
            Some(value) => Self(value),
            None => Self(Value::String(error.to_string())),
        }
    }

    /// The raw JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the cause, returning the raw JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The cause as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Revive a chained exception.
    pub fn to_exception<M, C>(&self) -> Result<Exception<M, C>, DecodeError>
    where
        M: DeserializeOwned,
        C: DeserializeOwned,
    {
        Exception::from_json(self.0.clone())
    }

    pub(crate) fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl From<&str> for Cause {
    fn from(text: &str) -> Self {
        Self(Value::String(text.to_owned()))
    }
}

impl From<String> for Cause {
    fn from(text: String) -> Self {
        Self(Value::String(text))
    }
}

impl From<Value> for Cause {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Cause {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Cause {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            Value::Object(map) if is_exception(&self.0) => {
                let name = map.get("name").and_then(Value::as_str).unwrap_or(EXCEPTION_NAME);
                match map.get("message") {
                    Some(Value::String(m)) => write!(f, "{name}: {m}"),
                    Some(other) => write!(f, "{name}: {other}"),
                    None => f.write_str(name),
                }
            }
            other => write!(f, "{other}"),
        }
    }
}

impl std::error::Error for Cause {}
