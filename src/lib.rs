// SPDX-License-Identifier: MIT OR Apache-2.0
//! Umbrella crate for exception-kit.
//!
//! Re-exports [`exk_exception`] so applications can depend on a single
//! crate. The cross-crate integration tests and benchmarks of the
//! workspace live alongside this crate.
#![deny(unsafe_code)]

pub use exk_exception::*;
