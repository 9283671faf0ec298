// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Serving a local file as an HTTP download
//!
//! [`serve_file`] produces a [`FileDownload`], a complete response that the
//! host framework sends as-is. Nothing else may be written to that response
//! afterwards.
//!
//! ```rust,ignore
//! async fn get_report(State(path): State<PathBuf>) -> axum::response::Response {
//!     match pdf_service_client::serve_file(&path, true).await {
//!         Ok(download) => download.into_response().map(axum::body::Body::from),
//!         Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
//!     }
//! }
//! ```

use std::io::ErrorKind;
use std::path::Path;

use bytes::Bytes;
use http::header::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, EXPIRES, HeaderName,
    HeaderValue, PRAGMA,
};
use http::{HeaderMap, Response, StatusCode};

use crate::error::{PdfServiceError, Result};
use crate::request::basename;

/// A file transfer response, ready to be sent
#[derive(Debug, Clone)]
pub struct FileDownload {
    filename: String,
    body: Bytes,
}

impl FileDownload {
    /// Wrap `body` as an attachment named `filename`
    pub fn new(filename: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        Self {
            filename: if filename.is_empty() {
                DEFAULT_NAME.to_string()
            } else {
                filename
            },
            body: body.into(),
        }
    }

    /// Attachment name offered to the client, as given
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Body size in bytes
    pub fn content_length(&self) -> u64 {
        self.body.len() as u64
    }

    /// File contents
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Download headers for this file
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(7);
        headers.insert(
            HeaderName::from_static("content-description"),
            HeaderValue::from_static("File Transfer"),
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        // content_disposition() emits only visible ASCII, which is always a
        // valid header value
        if let Ok(disposition) = HeaderValue::from_str(&content_disposition(&self.filename)) {
            headers.insert(CONTENT_DISPOSITION, disposition);
        }
        headers.insert(EXPIRES, HeaderValue::from_static("0"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("must-revalidate"));
        headers.insert(PRAGMA, HeaderValue::from_static("public"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(self.content_length()));
        headers
    }

    /// Convert into a `200 OK` response carrying the file
    pub fn into_response(self) -> Response<Bytes> {
        let headers = self.headers();
        let mut response = Response::new(self.body);
        *response.status_mut() = StatusCode::OK;
        *response.headers_mut() = headers;
        response
    }
}

impl From<FileDownload> for Response<Bytes> {
    fn from(download: FileDownload) -> Self {
        download.into_response()
    }
}

const DEFAULT_NAME: &str = "download";

/// `attachment` disposition for `name`
///
/// The quoted `filename` is an ASCII stand-in. When that loses anything, the
/// exact name follows as an RFC 5987 `filename*` parameter.
fn content_disposition(name: &str) -> String {
    let fallback = ascii_fallback(name);
    if fallback == name {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(name)
        )
    }
}

/// Replace characters that cannot appear inside a quoted header parameter
fn ascii_fallback(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

/// Load `file_path` into a download response
///
/// With `unlink_after`, the file is deleted once its bytes are held by the
/// response; it no longer exists on disk when this returns `Ok`.
pub async fn serve_file(file_path: impl AsRef<Path>, unlink_after: bool) -> Result<FileDownload> {
    let path = file_path.as_ref();

    let body = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => PdfServiceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PdfServiceError::io(path, e),
    })?;

    if unlink_after {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| PdfServiceError::io(path, e))?;
    }

    let download = FileDownload::new(basename(path), body);
    tracing::debug!(
        path = %path.display(),
        bytes = download.content_length(),
        unlinked = unlink_after,
        "Prepared file download"
    );
    Ok(download)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_fallback() {
        assert_eq!(ascii_fallback("report.pdf"), "report.pdf");
        assert_eq!(ascii_fallback("my report.pdf"), "my report.pdf");
        assert_eq!(ascii_fallback("a\"b\\c.pdf"), "a_b_c.pdf");
        assert_eq!(ascii_fallback("line\nbreak.pdf"), "line_break.pdf");
        assert_eq!(ascii_fallback("r\u{e9}sum\u{e9}.pdf"), "r_sum_.pdf");
    }

    #[test]
    fn test_empty_name_gets_default() {
        assert_eq!(FileDownload::new("", Bytes::new()).filename(), "download");
    }

    #[test]
    fn test_non_ascii_name_keeps_exact_form() {
        let download = FileDownload::new("r\u{e9}sum\u{e9}.pdf", &b"%PDF"[..]);
        assert_eq!(download.filename(), "r\u{e9}sum\u{e9}.pdf");
        assert_eq!(
            download.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"r_sum_.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
        );
    }

    #[test]
    fn test_quote_in_name_is_encoded() {
        assert_eq!(
            content_disposition("a\"b.pdf"),
            "attachment; filename=\"a_b.pdf\"; filename*=UTF-8''a%22b.pdf"
        );
    }

    #[test]
    fn test_headers() {
        let download = FileDownload::new("invoice.pdf", &b"%PDF-1.7"[..]);
        let headers = download.headers();

        assert_eq!(headers["content-description"], "File Transfer");
        assert_eq!(headers[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(
            headers[CONTENT_DISPOSITION],
            "attachment; filename=\"invoice.pdf\""
        );
        assert_eq!(headers[EXPIRES], "0");
        assert_eq!(headers[CACHE_CONTROL], "must-revalidate");
        assert_eq!(headers[PRAGMA], "public");
        assert_eq!(headers[CONTENT_LENGTH], "8");
    }

    #[test]
    fn test_into_response() {
        let response: Response<Bytes> = FileDownload::new("a.bin", vec![0u8, 1, 2]).into();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "3");
        assert_eq!(response.body().as_ref(), &[0u8, 1, 2]);
    }

    #[test]
    fn test_empty_file() {
        let download = FileDownload::new("empty.txt", Bytes::new());
        assert_eq!(download.content_length(), 0);
        assert_eq!(download.headers()[CONTENT_LENGTH], "0");
    }
}
