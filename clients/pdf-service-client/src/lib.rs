// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Incapption Print Service Client
//!
//! The print service renders Liquid templates to HTML or PDF. This crate
//! wraps its two endpoints and persists the results locally:
//!
//! - [`PdfService::generate_html`] - `POST html`, writes the `html` field of
//!   the JSON response to the save path
//! - [`PdfService::generate_pdf`] - `POST pdf`, streams the response body
//!   into the save path
//! - [`PdfService::serve_file`] - turns a local file into a download
//!   response for an end user
//!
//! # Request Flow
//!
//! 1. Refuse to run if anything already exists at the save path
//! 2. Build `{filename, data, template}` with `filename` set to the save
//!    path's last component
//! 3. Serialize it once, sign those bytes (see [`print_auth`]), and send
//!    them with the `X-Hmac-Sha256` header
//! 4. Persist the response; on PDF failures remove anything written
//!
//! # Example
//!
//! ```ignore
//! use pdf_service_client::{ClientConfig, PdfService};
//! use serde_json::json;
//!
//! let service = PdfService::new(ClientConfig::new("shared-secret"))?;
//! let path = service
//!     .generate_pdf(&json!({"name": "Jane"}), "Hello {{name}}", "/tmp/hello.pdf")
//!     .await?;
//! ```
//!
//! # Known Limitations
//!
//! Two calls racing on the same save path can both pass the existence
//! check. The output file is opened create-new, so the slower one fails
//! with [`PdfServiceError::AlreadyExists`] instead of overwriting, but
//! nothing serializes the calls.
//!
//! Dropping a `generate_pdf` future mid-download (a `timeout` or `select!`
//! around it) removes the partial file from `Drop`, with a blocking unlink
//! on the runtime thread.

pub mod config;
pub mod download;
pub mod error;
pub mod request;
mod sink;

use std::path::{Path, PathBuf};

use print_auth::{PayloadSigner, SIGNATURE_HEADER};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use url::Url;

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use download::{FileDownload, serve_file};
pub use error::{PdfServiceError, Result};
pub use request::RenderRequest;

use request::HtmlResponse;

/// Client for the print service
#[derive(Clone, Debug)]
pub struct PdfService {
    client: reqwest::Client,
    signer: PayloadSigner,
    html_url: Url,
    pdf_url: Url,
}

impl PdfService {
    /// Create a new PdfService
    ///
    /// # Errors
    /// Returns `Config` if the base URL is unusable or the HTTP client
    /// cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        let html_url = config.endpoint("html")?;
        let pdf_url = config.endpoint("pdf")?;
        let client = config.http_client()?;

        Ok(Self {
            client,
            signer: PayloadSigner::new(config.hmac_secret),
            html_url,
            pdf_url,
        })
    }

    /// Render `template` with `data` to HTML and save it at `save_path`
    ///
    /// # Returns
    /// The save path
    ///
    /// # Errors
    /// - `AlreadyExists` if anything is at `save_path`; no request is made
    /// - `Transport` on network failure, timeout, or non-2xx status
    /// - `InvalidResponse` if the body is not `{"html": "..."}`
    ///
    /// The file is only created after a complete, valid response.
    pub async fn generate_html<D>(
        &self,
        data: &D,
        template: &str,
        save_path: impl AsRef<Path>,
    ) -> Result<PathBuf>
    where
        D: Serialize + ?Sized,
    {
        let save_path = save_path.as_ref();
        sink::ensure_absent(save_path).await?;

        let request = RenderRequest::for_save_path(save_path, data, template);
        let response = self.post(&self.html_url, &request).await?;
        let body = response.bytes().await?;

        let rendered: HtmlResponse = serde_json::from_slice(&body)
            .map_err(|e| PdfServiceError::InvalidResponse(e.to_string()))?;
        sink::write_new(save_path, rendered.html.as_bytes()).await?;

        tracing::info!(path = %save_path.display(), "Saved rendered HTML");
        Ok(save_path.to_path_buf())
    }

    /// Render `template` with `data` to PDF and stream it into `save_path`
    ///
    /// # Returns
    /// The save path
    ///
    /// # Errors
    /// Same as [`generate_html`](Self::generate_html), minus
    /// `InvalidResponse`. If the transfer fails after bytes were written,
    /// the partial file is deleted before the error is returned.
    pub async fn generate_pdf<D>(
        &self,
        data: &D,
        template: &str,
        save_path: impl AsRef<Path>,
    ) -> Result<PathBuf>
    where
        D: Serialize + ?Sized,
    {
        let save_path = save_path.as_ref();
        sink::ensure_absent(save_path).await?;

        let request = RenderRequest::for_save_path(save_path, data, template);
        let response = self.post(&self.pdf_url, &request).await?;
        let written = sink::stream_to_file(response, save_path).await?;

        tracing::info!(path = %save_path.display(), bytes = written, "Saved rendered PDF");
        Ok(save_path.to_path_buf())
    }

    /// Build a download response for `file_path`
    ///
    /// See [`download::serve_file`].
    pub async fn serve_file(
        &self,
        file_path: impl AsRef<Path>,
        unlink_after: bool,
    ) -> Result<FileDownload> {
        download::serve_file(file_path, unlink_after).await
    }

    /// Sign and send a render request, rejecting non-2xx statuses
    async fn post<D>(&self, url: &Url, request: &RenderRequest<'_, D>) -> Result<reqwest::Response>
    where
        D: Serialize + ?Sized,
    {
        let (body, signature) = self.signer.sign_json(request)?;

        tracing::debug!(
            url = %url,
            filename = %request.filename,
            bytes = body.len(),
            "Sending render request"
        );

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await?;

        tracing::debug!(url = %url, status = %response.status(), "Render response");
        Ok(response.error_for_status()?)
    }
}
