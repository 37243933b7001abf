// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz ErrorCode deserialization, display, and Exception construction.
//!
//! Verifies:
//! 1. Deserializing arbitrary strings as ErrorCode never panics.
//! 2. Built-in codes have consistent Display/as_str/label.
//! 3. Exception construction with arbitrary message/code never panics.
//! 4. The structural projection round-trips and stays recognised.
#![no_main]
use exk_exception::{ErrorCode, Exception, ExceptionOptions, is_abort_error, is_exception};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    // --- Property 1: JSON deserialization never panics ---
    if let Ok(code) = serde_json::from_str::<ErrorCode>(s) {
        assert_eq!(format!("{code}"), code.as_str(), "Display and as_str must agree");
        let json = serde_json::to_string(&code).expect("ErrorCode must serialize");
        let rt: ErrorCode = serde_json::from_str(&json).expect("ErrorCode round-trip must succeed");
        assert_eq!(code, rt);
    }

    // --- Property 2: exercise the built-in vocabulary ---
    for code in ErrorCode::builtin() {
        assert!(code.is_builtin());
        assert!(code.builtin_label().is_some());
        let _ = format!("{code}");
    }

    // --- Property 3: arbitrary message/code never panics ---
    let code = ErrorCode::custom(s);
    let status = data.first().map(|b| serde_json::Number::from(i64::from(*b) - 100));
    let mut options = ExceptionOptions::new(code.clone()).with_name(s).with_cause(s);
    options.status = status.clone();
    let err = Exception::new(s, options);
    assert!(!err.name().is_empty());
    assert!(!format!("{err}").is_empty());

    // --- Property 4: projection round-trip ---
    let json = serde_json::to_string(&err).expect("Exception must serialize");
    let rt: Exception = Exception::from_json_str(&json).expect("Exception round-trip must succeed");
    assert_eq!(rt.code(), &code);
    assert_eq!(rt.status(), status.as_ref());
    assert!(is_exception(&rt));
    assert_eq!(is_abort_error(&rt), is_abort_error(&err));
});
