// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Writing rendered output to the save path
//!
//! Output files are always opened with create-new semantics. A file we did
//! not create is never truncated or removed. A file we did create is removed
//! again unless it was written completely, including when the writing future
//! is dropped part way through.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{PdfServiceError, Result};

/// Fail with `AlreadyExists` if anything is present at `path`
pub(crate) async fn ensure_absent(path: &Path) -> Result<()> {
    match fs::try_exists(path).await {
        Ok(false) => Ok(()),
        Ok(true) => Err(PdfServiceError::AlreadyExists {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(PdfServiceError::io(path, e)),
    }
}

async fn create_new(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => PdfServiceError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => PdfServiceError::io(path, e),
        })
}

/// Removes the file at `path` on drop unless [`PartialFile::keep`] was called
///
/// Only created after our own create-new open succeeded.
struct PartialFile {
    path: PathBuf,
    keep: bool,
}

impl PartialFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            keep: false,
        }
    }

    fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        // Drop cannot await
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed partial output"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove partial output"
            ),
        }
    }
}

/// Write `contents` to a new file at `path`
pub(crate) async fn write_new(path: &Path, contents: &[u8]) -> Result<()> {
    let file = create_new(path).await?;
    let partial = PartialFile::new(path);

    write_all(file, contents)
        .await
        .map_err(|e| PdfServiceError::io(path, e))?;
    partial.keep();
    Ok(())
}

async fn write_all(mut file: File, contents: &[u8]) -> std::io::Result<()> {
    file.write_all(contents).await?;
    file.flush().await
}

/// Stream an HTTP response body into a new file at `path`
///
/// If the copy fails, or the returned future is dropped before it
/// completes, the file is removed again. Returns the number of bytes
/// written.
pub(crate) async fn stream_to_file(response: reqwest::Response, path: &Path) -> Result<u64> {
    let file = create_new(path).await?;
    let partial = PartialFile::new(path);

    let written = copy_body(response, file, path).await?;
    partial.keep();
    Ok(written)
}

async fn copy_body(response: reqwest::Response, mut file: File, path: &Path) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| PdfServiceError::io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| PdfServiceError::io(path, e))?;
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");
        ensure_absent(&path).await.unwrap();

        std::fs::write(&path, b"x").unwrap();
        let err = ensure_absent(&path).await.unwrap_err();
        assert!(matches!(err, PdfServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_directory_counts_as_existing() {
        let dir = TempDir::new().unwrap();
        let err = ensure_absent(dir.path()).await.unwrap_err();
        assert!(matches!(err, PdfServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_write_new_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");
        std::fs::write(&path, b"original").unwrap();

        let err = write_new(&path, b"replacement").await.unwrap_err();
        assert!(matches!(err, PdfServiceError::AlreadyExists { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_write_new_keeps_complete_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");

        write_new(&path, b"<p>done</p>").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"<p>done</p>");
    }

    #[test]
    fn test_partial_file_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        drop(PartialFile::new(&path));
        assert!(!path.exists());
    }

    #[test]
    fn test_partial_file_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        PartialFile::new(&path).keep();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_write_new_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.html");

        let err = write_new(&path, b"x").await.unwrap_err();
        assert!(matches!(err, PdfServiceError::Io { .. }));
        assert!(!path.exists());
    }
}
