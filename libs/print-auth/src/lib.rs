// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Print Service Request Authentication
//!
//! The Incapption print service authenticates callers with a shared secret.
//! Each request carries an HMAC-SHA256 of its exact JSON body:
//!
//! ```text
//! X-Hmac-Sha256: <64 lowercase hex chars>
//! ```
//!
//! # Canonical Serialization
//!
//! The signed bytes are the compact `serde_json` encoding of the payload
//! after conversion to a `serde_json::Value`. Every object, struct or map,
//! comes out with its keys sorted, so equal payloads always produce equal
//! bodies and therefore equal signatures.
//!
//! # Example
//!
//! ```
//! use print_auth::{PayloadSigner, SIGNATURE_HEADER};
//! use secrecy::SecretString;
//!
//! let signer = PayloadSigner::new(SecretString::from("shared-secret".to_string()));
//! let (body, signature) = signer
//!     .sign_json(&serde_json::json!({"filename": "out.pdf"}))
//!     .unwrap();
//!
//! assert_eq!(SIGNATURE_HEADER, "X-Hmac-Sha256");
//! assert!(signer.verify(&body, &signature).is_ok());
//! ```

pub mod error;
pub mod signature;

pub use error::AuthError;
pub use signature::{PayloadSigner, SIGNATURE_HEADER, sign_payload};
