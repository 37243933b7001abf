// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz structural recognition with arbitrary JSON documents.
//!
//! Verifies:
//! 1. `is_exception` / `is_abort_error` never panic on any parsed document.
//! 2. A document that is not an exception is never an abort.
//! 3. A document that revives into an exception re-serialises into a
//!    document that is still recognised, with the same name and code.
#![no_main]
use exk_exception::{Exception, is_abort_error, is_abort_error_with_code, is_exception};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    // --- Property 1 & 2: predicates are total and consistent ---
    let recognised = is_exception(&value);
    let abort = is_abort_error(&value);
    let numeric_abort = is_abort_error_with_code(&value, &0);
    if !recognised {
        assert!(!abort, "non-exception recognised as abort");
        assert!(!numeric_abort, "non-exception recognised as abort");
    }

    // --- Property 3: revival round-trips ---
    if let Ok(revived) = Exception::<Value, Value>::from_json(value.clone()) {
        assert!(recognised, "revived a value the predicate rejected");
        let wire = revived.to_json().expect("revived exception must serialize");
        assert!(is_exception(&wire));
        assert_eq!(wire["name"].as_str(), Some(revived.name()));
        assert_eq!(&wire["code"], revived.code());
        assert_eq!(is_abort_error(&wire), is_abort_error(&revived));
    }
});
