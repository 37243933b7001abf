// SPDX-License-Identifier: MIT OR Apache-2.0
//! Recognising exceptions by native identity or by structural marker.
//!
//! A value that has been through JSON (or any other data-only boundary)
//! loses its Rust type. What survives is its shape, including the
//! `__typename: "Exception"` marker, and that is what the predicates here
//! fall back to. Every predicate is total: it returns `false` for anything
//! it does not understand and never panics.

use crate::abort::ABORT_ERROR_NAME;
use crate::exception::{EXCEPTION_NAME, MARKER_KEY};
use crate::{AbortError, Cause, ErrorCode, Exception};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::error::Error as StdError;
use tracing::debug;

/// What the predicates need to know about a recognised exception.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint<'a> {
    /// The `name` field, if present and a string.
    pub name: Option<&'a str>,
    /// The JSON projection of the `code` field, if present.
    pub code: Option<Cow<'a, Value>>,
}

/// A value that may be an exception.
///
/// Implemented for the native exception types, for JSON values, and for
/// type-erased errors. Downstream crates can implement it for their own
/// wrappers.
pub trait Recognize {
    /// Returns the fingerprint if `self` is an exception, `None` otherwise.
    fn fingerprint(&self) -> Option<Fingerprint<'_>>;
}

/// Returns `true` if `value` is an exception.
///
/// Native [`Exception`] / [`AbortError`] values are recognised by type;
/// JSON objects are recognised by a `__typename` key equal to
/// `"Exception"`.
///
/// ```
/// use exk_exception::{Exception, ErrorCode, is_exception};
/// use serde_json::json;
///
/// let err = Exception::with_code("boom", ErrorCode::UNKNOWN);
/// assert!(is_exception(&err));
/// assert!(is_exception(&serde_json::to_value(&err).unwrap()));
/// assert!(!is_exception(&json!({"message": "boom"})));
/// ```
pub fn is_exception<T: Recognize + ?Sized>(value: &T) -> bool {
    value.fingerprint().is_some()
}

/// Returns `true` if `value` is an exception that means "aborted": named
/// `"AbortError"` or carrying [`ErrorCode::ABORT`].
pub fn is_abort_error<T: Recognize + ?Sized>(value: &T) -> bool {
    is_abort_error_with_code(value, &ErrorCode::ABORT)
}

/// Returns `true` if `value` is an exception named `"AbortError"` or whose
/// code equals `code`.
///
/// Either condition is enough. Codes are compared through their JSON
/// projection, so a native `i64` code matches a decoded JSON number.
pub fn is_abort_error_with_code<T, K>(value: &T, code: &K) -> bool
where
    T: Recognize + ?Sized,
    K: Serialize + ?Sized,
{
    let Some(fingerprint) = value.fingerprint() else {
        return false;
    };
    if fingerprint.name == Some(ABORT_ERROR_NAME) {
        return true;
    }
    match (fingerprint.code, serde_json::to_value(code)) {
        (Some(actual), Ok(expected)) => *actual == expected,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Native values
// ---------------------------------------------------------------------------

impl<M, C: Serialize> Recognize for Exception<M, C> {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        Some(Fingerprint {
            name: Some(self.name()),
            code: serde_json::to_value(self.code()).ok().map(Cow::Owned),
        })
    }
}

impl<M> Recognize for AbortError<M> {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        self.as_exception().fingerprint()
    }
}

// Instantiations reachable through `dyn Error`: string-like or JSON
// messages crossed with every primitive code type a literal can infer to.
// Identity for any other `Exception<M, C>` is only available on the
// concrete value.
macro_rules! with_native {
    (@codes $error:expr, $native:ident, $body:expr, $message:ty) => {
        with_native!(@each $error, $native, $body, $message;
            ErrorCode, String, &'static str, Value, bool, f32, f64,
            i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
    };
    (@each $error:expr, $native:ident, $body:expr, $message:ty; $($code:ty),*) => {
        $(
            if let Some($native) = $error.downcast_ref::<Exception<$message, $code>>() {
                return $body;
            }
        )*
    };
    (@abort $error:expr, $native:ident, $body:expr; $($message:ty),*) => {
        $(
            if let Some($native) = $error.downcast_ref::<AbortError<$message>>() {
                return $body;
            }
        )*
    };
    ($error:expr, |$native:ident| $body:expr) => {
        with_native!(@codes $error, $native, $body, String);
        with_native!(@codes $error, $native, $body, &'static str);
        with_native!(@codes $error, $native, $body, Value);
        with_native!(@abort $error, $native, $body; String, &'static str, Value);
    };
}

fn native_fingerprint<'a>(error: &'a (dyn StdError + 'static)) -> Option<Fingerprint<'a>> {
    with_native!(error, |native| native.fingerprint());
    None
}

/// Structural projection of a type-erased error, if it is a native exception.
pub(crate) fn native_projection(error: &(dyn StdError + 'static)) -> Option<Value> {
    with_native!(error, |native| native.to_json().ok());
    None
}

impl Recognize for dyn StdError + 'static {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        native_fingerprint(self)
    }
}

impl Recognize for dyn StdError + Send + Sync + 'static {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        native_fingerprint(self)
    }
}

// ---------------------------------------------------------------------------
// Structural values
// ---------------------------------------------------------------------------

impl Recognize for Map<String, Value> {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        match self.get(MARKER_KEY)? {
            Value::String(marker) if marker == EXCEPTION_NAME => {}
            other => {
                debug!(
                    target: "exk.recognize",
                    marker = %other,
                    "structural marker present with unexpected value"
                );
                return None;
            }
        }
        Some(Fingerprint {
            name: self.get("name").and_then(Value::as_str),
            code: self.get("code").map(Cow::Borrowed),
        })
    }
}

impl Recognize for Value {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        self.as_object()?.fingerprint()
    }
}

impl Recognize for Cause {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        self.as_value().fingerprint()
    }
}

// ---------------------------------------------------------------------------
// Wrappers
// ---------------------------------------------------------------------------

impl<T: Recognize + ?Sized> Recognize for &T {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        (**self).fingerprint()
    }
}

impl<T: Recognize + ?Sized> Recognize for Box<T> {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        (**self).fingerprint()
    }
}

impl<T: Recognize> Recognize for Option<T> {
    fn fingerprint(&self) -> Option<Fingerprint<'_>> {
        self.as_ref()?.fingerprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExceptionOptions;
    use serde_json::json;
    use std::io;

    fn roundtrip<T: Serialize>(value: &T) -> Value {
        serde_json::from_str(&serde_json::to_string(value).unwrap()).unwrap()
    }

    #[test]
    fn native_exception_is_recognised() {
        assert!(is_exception(&Exception::with_code("x", ErrorCode::UNKNOWN)));
        assert!(is_exception(&Exception::with_code("x", 0)));
        assert!(is_exception(&AbortError::new("x")));
    }

    #[test]
    fn non_exceptions_are_rejected() {
        let none: Option<Value> = None;
        assert!(!is_exception(&none));
        assert!(!is_exception(&Value::Null));
        assert!(!is_exception(&json!(42)));
        assert!(!is_exception(&json!("str")));
        assert!(!is_exception(&json!({})));
        assert!(!is_exception(&json!([{"__typename": "Exception"}])));
        let io = io::Error::other("x");
        let erased: &(dyn StdError + 'static) = &io;
        assert!(!is_exception(erased));
    }

    #[test]
    fn marker_must_match_exactly() {
        assert!(!is_exception(&json!({"__typename": "exception"})));
        assert!(!is_exception(&json!({"__typename": null})));
        assert!(!is_exception(&json!({"__typename": ["Exception"]})));
        assert!(is_exception(&json!({"__typename": "Exception"})));
    }

    #[test]
    fn recognised_after_roundtrip() {
        let err = Exception::new(
            "Exception with custom name.",
            ExceptionOptions::new(0).with_name("AbortError"),
        );
        assert!(is_exception(&roundtrip(&err)));
    }

    #[test]
    fn erased_errors_are_downcast() {
        let boxed: Box<dyn StdError + Send + Sync> =
            Box::new(Exception::with_code("x", ErrorCode::EXPIRED));
        assert!(is_exception(&boxed));
        assert!(!is_abort_error(&boxed));

        let abort: Box<dyn StdError + Send + Sync> = Box::new(AbortError::new("stop"));
        assert!(is_abort_error(&abort));

        let numeric: Box<dyn StdError + Send + Sync> = Box::new(Exception::with_code("x", 7i64));
        assert!(is_abort_error_with_code(&numeric, &7));
    }

    #[test]
    fn literal_code_types_survive_erasure() {
        let int: Box<dyn StdError + Send + Sync> =
            Box::new(Exception::with_code("Error message", 0));
        assert!(is_exception(&int));
        assert!(is_abort_error_with_code(&int, &0));

        let text: Box<dyn StdError + Send + Sync> =
            Box::new(Exception::with_code("Not found", "ERRNOTFOUND"));
        assert!(is_exception(&text));
        assert!(is_abort_error_with_code(&text, "ERRNOTFOUND"));

        let unsigned: Box<dyn StdError> = Box::new(Exception::with_code("r", 404u32));
        assert!(is_exception(&unsigned));

        let borrowed: Box<dyn StdError> = Box::new(Exception::with_payload(
            "static",
            ExceptionOptions::new(ErrorCode::EXPIRED),
        ));
        assert!(is_exception(&borrowed));

        let abort: Box<dyn StdError> = Box::new(AbortError::with_payload(
            json!({"reason": "closed"}),
            Default::default(),
        ));
        assert!(is_abort_error(&abort));
    }

    #[test]
    fn erased_projection_keeps_literal_codes() {
        let err = Exception::with_code("Not found", "ERRNOTFOUND");
        let cause = Cause::from_error(&err);
        assert!(is_exception(&cause));
        assert_eq!(cause.as_value()["code"], "ERRNOTFOUND");
    }

    #[test]
    fn abort_by_name() {
        let err = Exception::new(
            "r",
            ExceptionOptions::new(ErrorCode::custom("ERR:OTHER")).with_name("AbortError"),
        );
        assert!(is_abort_error(&err));
    }

    #[test]
    fn abort_by_code() {
        let err = Exception::with_code("r", "CUSTOM");
        assert!(!is_abort_error(&err));
        assert!(is_abort_error_with_code(&err, "CUSTOM"));
        assert!(is_abort_error(&Exception::with_code("r", ErrorCode::ABORT)));
    }

    #[test]
    fn numeric_codes_compare_through_json() {
        let wire = roundtrip(&Exception::with_code("r", 499u16));
        assert!(is_abort_error_with_code(&wire, &499i64));
        assert!(!is_abort_error_with_code(&wire, "499"));
    }

    #[test]
    fn abort_rejects_non_exceptions() {
        assert!(!is_abort_error(&json!({"name": "AbortError", "code": "ERR:ABORT"})));
        assert!(!is_abort_error(&Value::Null));
    }

    #[test]
    fn structural_fingerprint_borrows_fields() {
        let value = json!({"__typename": "Exception", "name": "N", "code": "C"});
        let fp = value.fingerprint().unwrap();
        assert_eq!(fp.name, Some("N"));
        assert_eq!(fp.code.as_deref(), Some(&json!("C")));
    }

    #[test]
    fn non_string_name_is_ignored() {
        let value = json!({"__typename": "Exception", "name": 1, "code": "C"});
        assert!(is_exception(&value));
        assert_eq!(value.fingerprint().unwrap().name, None);
    }
}
