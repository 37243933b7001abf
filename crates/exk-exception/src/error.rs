// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised while reviving exceptions from JSON.

/// Failure to rebuild an [`Exception`](crate::Exception) from its
/// structural JSON form.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The value carries no `__typename: "Exception"` marker.
    #[error("value is not a serialized exception")]
    NotAnException,

    /// The marker is present but the payload does not decode.
    #[error("malformed exception payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
