// SPDX-License-Identifier: MIT OR Apache-2.0
//! The "operation aborted" specialisation.

use crate::recognize::{self, Recognize};
use crate::{Cause, ErrorCode, Exception, ExceptionOptions};
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;
use std::fmt;
use std::ops::Deref;

/// Name carried by every [`AbortError`].
pub const ABORT_ERROR_NAME: &str = "AbortError";

/// Options for an [`AbortError`]. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbortOptions {
    /// Code override; [`ErrorCode::ABORT`] when absent.
    pub code: Option<ErrorCode>,
    /// Transport status hint.
    pub status: Option<Number>,
    /// Underlying cause.
    pub cause: Option<Cause>,
}

impl AbortOptions {
    /// Override the abort code.
    pub fn with_code(mut self, code: impl Into<ErrorCode>) -> Self {
        self.code = Some(code.into());
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

/// An [`Exception`] meaning "the operation was cancelled".
///
/// The name is always `"AbortError"` and the code defaults to
/// [`ErrorCode::ABORT`]. On the wire it is indistinguishable from an
/// `Exception` with those fields; it adds nothing to the serialised shape.
///
/// ```
/// use exk_exception::{AbortError, ErrorCode, is_abort_error};
///
/// let err = AbortError::new("user closed the tab");
/// assert_eq!(err.name(), "AbortError");
/// assert_eq!(err.code(), &ErrorCode::ABORT);
///
/// let wire = serde_json::to_value(&err).unwrap();
/// assert!(is_abort_error(&wire));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct AbortError<M = String>(Exception<M, ErrorCode>);

impl AbortError {
    /// Create an abort with a string reason and default options.
    pub fn new(reason: impl Into<String>) -> Self {
        Self::with_options(reason, AbortOptions::default())
    }

    /// Create an abort with a string reason.
    pub fn with_options(reason: impl Into<String>, options: AbortOptions) -> Self {
        Self::with_payload(reason.into(), options)
    }

    /// Returns `true` if `value` is an exception named `"AbortError"` or
    /// carrying [`ErrorCode::ABORT`].
    pub fn is_abort_error<T: Recognize + ?Sized>(value: &T) -> bool {
        recognize::is_abort_error(value)
    }
}

impl<M> AbortError<M> {
    /// Create an abort with an arbitrary reason payload.
    pub fn with_payload(reason: M, options: AbortOptions) -> Self {
        let AbortOptions {
            code,
            status,
            cause,
        } = options;
        let mut inner = ExceptionOptions::new(code.unwrap_or(ErrorCode::ABORT))
            .with_name(ABORT_ERROR_NAME);
        inner.status = status;
        inner.cause = cause;
        Self(Exception::with_payload(reason, inner))
    }

    /// Borrow the underlying exception.
    pub fn as_exception(&self) -> &Exception<M, ErrorCode> {
        &self.0
    }

    /// Unwrap into the underlying exception.
    pub fn into_exception(self) -> Exception<M, ErrorCode> {
        self.0
    }
}

impl<M> Deref for AbortError<M> {
    type Target = Exception<M, ErrorCode>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<M> From<AbortError<M>> for Exception<M, ErrorCode> {
    fn from(abort: AbortError<M>) -> Self {
        abort.0
    }
}

// Accepts exactly what `is_abort_error` accepts: the abort name or the
// default abort code. A document matched by code alone is renamed.
impl<'de, M: Deserialize<'de>> Deserialize<'de> for AbortError<M> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut inner = Exception::<M, ErrorCode>::deserialize(deserializer)?;
        if inner.name() == ABORT_ERROR_NAME || inner.code() == &ErrorCode::ABORT {
            inner.set_name(ABORT_ERROR_NAME);
            Ok(Self(inner))
        } else {
            Err(D::Error::custom(format!(
                "exception `{}` with code `{}` is not an abort",
                inner.name(),
                inner.code()
            )))
        }
    }
}

impl<M: fmt::Display> fmt::Display for AbortError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<M: fmt::Display + fmt::Debug> std::error::Error for AbortError<M> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.0)
    }
}
