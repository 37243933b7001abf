// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end scenarios for exceptions crossing a JSON boundary.

use exk_exception::{
    Cause, DecodeError, ErrorCode, Exception, ExceptionOptions, is_abort_error, is_exception,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::error::Error as StdError;
use std::io;

// ─── helpers ────────────────────────────────────────────────────────────────

/// Serialize to text and parse back into an untyped value.
fn roundtrip<T: Serialize>(value: &T) -> Value {
    let text = serde_json::to_string(value).expect("serialize");
    serde_json::from_str(&text).expect("parse")
}

fn raise<E>(err: E) -> Result<(), Box<dyn StdError + Send + Sync>>
where
    E: StdError + Send + Sync + 'static,
{
    Err(Box::new(err))
}

// ═══════════════════════════════════════════════════════════════════════════
// 1. Construction
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn numeric_code_and_default_name() {
    let err = Exception::with_code("Error message", 0);
    assert_eq!(err.name(), "Exception");
    assert_eq!(*err.code(), 0);
}

#[test]
fn custom_code_type() {
    let err = Exception::with_code("Not found", "ERRNOTFOUND");
    assert_eq!(*err.code(), "ERRNOTFOUND");
}

#[test]
fn caught_exception_narrows_by_type() {
    let caught = raise(Exception::with_code("Error message", 0)).unwrap_err();
    assert!(is_exception(&caught));
    let native = caught.downcast_ref::<Exception<String, i32>>().unwrap();
    assert_eq!(native.name(), "Exception");
    assert_eq!(*native.code(), 0);
}

#[test]
fn caught_exception_with_custom_code_type() {
    let caught = raise(Exception::with_code("Not found", "ERRNOTFOUND")).unwrap_err();
    assert!(is_exception(&caught));
    assert!(!is_abort_error(&caught));
    let native = caught.downcast_ref::<Exception<String, &'static str>>().unwrap();
    assert_eq!(*native.code(), "ERRNOTFOUND");
}

#[test]
fn caught_exception_with_width_specific_codes() {
    for caught in [
        raise(Exception::with_code("m", 404u16)).unwrap_err(),
        raise(Exception::with_code("m", 404u64)).unwrap_err(),
        raise(Exception::with_code("m", -1i8)).unwrap_err(),
        raise(Exception::with_code("m", 1.5f64)).unwrap_err(),
        raise(Exception::with_code("m", true)).unwrap_err(),
    ] {
        assert!(is_exception(&caught), "{caught} should be recognised");
    }
}

#[test]
fn caught_exception_becomes_structured_cause() {
    let caught = raise(Exception::with_code("Not found", "ERRNOTFOUND")).unwrap_err();
    let outer = Exception::new(
        "lookup failed",
        ExceptionOptions::new(ErrorCode::UNKNOWN).with_cause(Cause::from_error(&*caught)),
    );
    let revived: Exception = Exception::from_json(roundtrip(&outer)).unwrap();
    let inner: Exception<String, String> = revived.cause().unwrap().to_exception().unwrap();
    assert_eq!(inner.code(), "ERRNOTFOUND");
}

#[test]
fn foreign_errors_are_not_exceptions() {
    let caught: Box<dyn StdError + Send + Sync> = Box::new(io::Error::other("Error message"));
    assert!(!is_exception(&caught));
    assert!(!is_abort_error(&caught));
}

#[test]
fn primitives_are_not_exceptions() {
    for value in [Value::Null, json!(42), json!("str"), json!({}), json!([])] {
        assert!(!is_exception(&value), "{value} should not be recognised");
        assert!(!is_abort_error(&value));
    }
    let missing: Option<Value> = None;
    assert!(!is_exception(&missing));
}

// ═══════════════════════════════════════════════════════════════════════════
// 2. JSON projection
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn json_object_with_custom_name_is_recognised() {
    let err = Exception::new(
        "Exception with custom name.",
        ExceptionOptions::new(0).with_name("AbortError"),
    );
    assert!(is_exception(&roundtrip(&err)));
}

#[test]
fn full_projection_round_trips() {
    let exception = Exception::new(
        "msg",
        ExceptionOptions::new(ErrorCode::ABORT)
            .with_status(400)
            .with_name("AbortError")
            .with_cause("User aborted."),
    );

    let parsed = roundtrip(&exception);
    assert!(is_exception(&parsed));
    assert_eq!(parsed["message"], "msg");
    assert_eq!(parsed["code"], "ERR:ABORT");
    assert_eq!(parsed["name"], "AbortError");
    assert_eq!(parsed["status"], 400);
    assert_eq!(parsed["__typename"], "Exception");
    assert_eq!(parsed["cause"], "User aborted.");

    let revived: Exception = Exception::from_json(parsed).unwrap();
    assert_eq!(revived, exception);
}

#[test]
fn to_json_matches_serialize() {
    let err = Exception::new(
        "m",
        ExceptionOptions::new(ErrorCode::WRONG_VALUE).with_status(422),
    );
    assert_eq!(err.to_json().unwrap(), roundtrip(&err));
}

#[test]
fn structured_cause_round_trips() {
    let cause = json!({"retry_after": 30, "hosts": ["a", "b"]});
    let err = Exception::new(
        "throttled",
        ExceptionOptions::new(ErrorCode::TOO_EARLY).with_cause(cause.clone()),
    );
    let revived: Exception = Exception::from_json(roundtrip(&err)).unwrap();
    assert_eq!(revived.cause().map(Cause::as_value), Some(&cause));
}

#[test]
fn explicit_null_and_omitted_status_are_equivalent() {
    let omitted = json!({
        "message": "m", "code": "ERR:UNKNOWN", "name": "Exception", "__typename": "Exception"
    });
    let explicit = json!({
        "message": "m", "code": "ERR:UNKNOWN", "name": "Exception", "status": null,
        "cause": null, "__typename": "Exception"
    });
    assert!(is_exception(&omitted));
    assert!(is_exception(&explicit));
    let a: Exception = Exception::from_json(omitted).unwrap();
    let b: Exception = Exception::from_json(explicit).unwrap();
    assert_eq!(a, b);
    assert!(!a.to_json().unwrap().as_object().unwrap().contains_key("status"));
}

#[test]
fn revive_reports_missing_marker() {
    let err = Exception::<String, String>::from_json(json!({"message": "m", "code": "c"}))
        .unwrap_err();
    assert!(matches!(err, DecodeError::NotAnException));
    assert_eq!(err.to_string(), "value is not a serialized exception");
}

#[test]
fn revive_reports_wrong_payload_type() {
    let err = Exception::<String, i64>::from_json(json!({
        "message": "m", "code": "not-a-number", "__typename": "Exception"
    }))
    .unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// 3. Cause chains
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn chained_exception_survives_two_hops() {
    let root = Exception::new(
        "socket closed",
        ExceptionOptions::new(ErrorCode::custom("ERR:IO")).with_status(503),
    );
    let outer = Exception::new(
        "fetch failed",
        ExceptionOptions::new(ErrorCode::UNKNOWN).with_cause(Cause::from_error(&root)),
    );

    let hop1 = roundtrip(&outer);
    let hop2 = roundtrip(&hop1);
    assert!(is_exception(&hop2["cause"]));

    let revived: Exception = Exception::from_json(hop2).unwrap();
    let cause = revived.cause().unwrap();
    assert!(is_exception(cause));
    let inner: Exception = cause.to_exception().unwrap();
    assert_eq!(inner, root);
    assert_eq!(
        revived.source().unwrap().to_string(),
        "Exception: socket closed"
    );
}

#[test]
fn associated_predicates_match_free_functions() {
    let err = Exception::with_code("m", ErrorCode::ABORT);
    let wire = roundtrip(&err);
    assert_eq!(Exception::is_exception(&wire), is_exception(&wire));
    assert_eq!(Exception::is_abort_error(&wire), is_abort_error(&wire));
    assert!(Exception::is_abort_error_with_code(&wire, &ErrorCode::ABORT));
}
