// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! HMAC-SHA256 payload signing for print service requests
//!
//! Every request body is signed as a whole:
//!
//! ```text
//! X-Hmac-Sha256: hex(HMAC-SHA256(secret, body))
//! ```
//!
//! The body is the compact JSON encoding of the payload, with every object's
//! keys sorted. The same bytes that were signed must be sent, so callers
//! should use [`PayloadSigner::sign_json`] rather than serializing twice.

use crate::error::AuthError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature
pub const SIGNATURE_HEADER: &str = "X-Hmac-Sha256";

/// Compute the lowercase hex HMAC-SHA256 of `body` keyed by `secret`
pub fn sign_payload(secret: &[u8], body: &[u8]) -> Result<String, AuthError> {
    let mut mac = new_mac(secret)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn new_mac(secret: &[u8]) -> Result<HmacSha256, AuthError> {
    HmacSha256::new_from_slice(secret).map_err(|e| AuthError::InvalidKey(e.to_string()))
}

/// Signs and verifies request bodies with a shared secret
#[derive(Clone)]
pub struct PayloadSigner {
    secret: SecretString,
}

impl std::fmt::Debug for PayloadSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadSigner")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl PayloadSigner {
    /// Create a new PayloadSigner
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Sign raw body bytes
    pub fn sign(&self, body: &[u8]) -> Result<String, AuthError> {
        sign_payload(self.secret.expose_secret().as_bytes(), body)
    }

    /// Serialize `payload` to canonical JSON and sign the result
    ///
    /// The payload goes through `serde_json::Value` first, so map keys come
    /// out sorted whatever the source type (a `HashMap` iterates in a
    /// per-instance random order).
    ///
    /// # Returns
    /// A tuple of (body_bytes, signature_hex). The body bytes are what must
    /// go on the wire.
    pub fn sign_json<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<(Vec<u8>, String), AuthError> {
        let canonical = serde_json::to_value(payload)?;
        let body = serde_json::to_vec(&canonical)?;
        let signature = self.sign(&body)?;
        Ok((body, signature))
    }

    /// Check a hex signature against `body` in constant time
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<(), AuthError> {
        let expected = hex::decode(signature.trim())
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))?;
        let mut mac = new_mac(self.secret.expose_secret().as_bytes())?;
        mac.update(body);
        mac.verify_slice(&expected).map_err(|_| AuthError::Mismatch)
    }
}
