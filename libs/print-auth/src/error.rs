// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for print-auth

use thiserror::Error;

/// Errors that can occur while signing or verifying a payload
#[derive(Error, Debug)]
pub enum AuthError {
    /// The HMAC secret could not be used as a key
    #[error("Invalid HMAC key: {0}")]
    InvalidKey(String),

    /// The payload could not be serialized to canonical JSON
    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The signature header value is not valid hex
    #[error("Malformed signature: {0}")]
    InvalidSignature(String),

    /// The signature does not match the payload
    #[error("Signature mismatch")]
    Mismatch,
}
