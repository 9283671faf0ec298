// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

#![allow(clippy::expect_used, clippy::unwrap_used)]

//! File download tests

use http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use pdf_service_client::{ClientConfig, PdfService, PdfServiceError, serve_file};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_serve_file_headers_and_body() {
    let dir = TempDir::new().unwrap();
    let contents = b"%PDF-1.7 not really a pdf".repeat(100);
    let path = write_file(&dir, "statement.pdf", &contents);
    let size_on_disk = std::fs::metadata(&path).unwrap().len();

    let download = serve_file(&path, false).await.unwrap();
    assert_eq!(download.filename(), "statement.pdf");
    assert_eq!(download.content_length(), size_on_disk);

    let response = download.into_response();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"statement.pdf\""
    );
    assert_eq!(
        response.headers()[CONTENT_LENGTH],
        size_on_disk.to_string().as_str()
    );
    assert_eq!(response.body().as_ref(), contents.as_slice());

    // Without unlink the file stays
    assert!(path.exists());
}

#[tokio::test]
async fn test_serve_file_unlink_after() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "once.html", b"<p>bye</p>");

    let download = serve_file(&path, true).await.unwrap();

    assert!(!path.exists());
    assert_eq!(download.body().as_ref(), b"<p>bye</p>");
    assert_eq!(download.content_length(), 10);
}

#[tokio::test]
async fn test_serve_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.pdf");

    let err = serve_file(&path, true).await.unwrap_err();
    assert!(matches!(err, PdfServiceError::NotFound { path: ref p } if p == &path));
}

#[tokio::test]
async fn test_serve_directory_is_io_error() {
    let dir = TempDir::new().unwrap();

    let err = serve_file(dir.path(), false).await.unwrap_err();
    assert!(matches!(err, PdfServiceError::Io { .. }));
    assert!(dir.path().exists());
}

#[tokio::test]
async fn test_service_method_delegates() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "a.txt", b"abc");
    let service = PdfService::new(ClientConfig::new("secret")).unwrap();

    let download = service.serve_file(&path, false).await.unwrap();
    assert_eq!(download.content_length(), 3);
}

#[tokio::test]
async fn test_serve_file_keeps_non_ascii_name() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "Gr\u{fc}\u{df}e.pdf", b"%PDF");

    let download = serve_file(&path, false).await.unwrap();
    assert_eq!(download.filename(), "Gr\u{fc}\u{df}e.pdf");
    assert_eq!(
        download.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"Gr__e.pdf\"; filename*=UTF-8''Gr%C3%BC%C3%9Fe.pdf"
    );
}
