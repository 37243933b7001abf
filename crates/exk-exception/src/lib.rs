// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured exceptions that stay recognisable across serialization
//! boundaries.
//!
//! An [`Exception`] carries a stable [`ErrorCode`], a message payload, a
//! `name` category, an optional transport `status` and an optional
//! [`Cause`]. Its JSON form embeds a `__typename: "Exception"` marker so
//! that [`is_exception`] and [`is_abort_error`] keep working after the
//! value has crossed a process, network or structured-clone boundary and
//! lost its Rust type.
//!
//! ```
//! use exk_exception::{Exception, ExceptionOptions, ErrorCode};
//! use exk_exception::{is_abort_error, is_exception};
//!
//! let err = Exception::new(
//!     "msg",
//!     ExceptionOptions::new(ErrorCode::ABORT)
//!         .with_status(400)
//!         .with_name("AbortError")
//!         .with_cause("User aborted."),
//! );
//!
//! let wire = serde_json::to_string(&err).unwrap();
//! let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
//! assert!(is_exception(&value));
//! assert!(is_abort_error(&value));
//!
//! let revived: Exception = Exception::from_json(value).unwrap();
//! assert_eq!(revived, err);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod abort;
mod cause;
mod code;
mod error;
mod exception;
mod recognize;

pub use abort::{ABORT_ERROR_NAME, AbortError, AbortOptions};
pub use cause::Cause;
pub use code::ErrorCode;
pub use error::DecodeError;
pub use exception::{EXCEPTION_NAME, Exception, ExceptionOptions};
pub use recognize::{
    Fingerprint, Recognize, is_abort_error, is_abort_error_with_code, is_exception,
};
