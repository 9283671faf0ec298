// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Client configuration

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::{PdfServiceError, Result};

/// Production endpoint of the print service
pub const DEFAULT_BASE_URL: &str = "https://pdf.incapption.io/api/v1/print/";

/// Request timeout for every call to the print service
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Print service client configuration
///
/// Immutable once handed to [`crate::PdfService::new`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Shared secret used to sign request bodies
    pub hmac_secret: SecretString,
    /// Base URL; `html` and `pdf` are resolved relative to it
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the production service
    pub fn new(hmac_secret: impl Into<String>) -> Self {
        Self {
            hmac_secret: SecretString::from(hmac_secret.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a different service instance
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve an endpoint name against the base URL
    ///
    /// The base is treated as a directory even when it lacks a trailing
    /// slash, so `https://host/api/v1/print` + `pdf` gives
    /// `https://host/api/v1/print/pdf`.
    pub fn endpoint(&self, name: &str) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|e| PdfServiceError::Config(format!("invalid base URL: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(PdfServiceError::Config(format!(
                "base URL cannot have a path: {}",
                self.base_url
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(name)
            .map_err(|e| PdfServiceError::Config(format!("invalid endpoint {}: {}", name, e)))
    }

    /// Build the HTTP client used for every request
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        // reqwest is built without a bundled crypto provider; an Err here
        // only means another provider was installed first.
        let _ = rustls::crypto::ring::default_provider().install_default();

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("pdf-service-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PdfServiceError::Config(format!("failed to create HTTP client: {}", e)))
    }
}
