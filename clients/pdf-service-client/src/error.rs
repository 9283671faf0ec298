// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for pdf-service-client

use std::path::PathBuf;

use print_auth::AuthError;
use thiserror::Error;

/// Errors that can occur while rendering or serving files
#[derive(Error, Debug)]
pub enum PdfServiceError {
    /// A file is already present at the save path
    #[error("The file already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// Network failure, non-2xx status, or timeout talking to the print service
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The print service answered 2xx but the body was not what we expected
    #[error("Invalid response from print service: {0}")]
    InvalidResponse(String),

    /// The file to serve does not exist
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Local filesystem error
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to sign the request payload
    #[error("Signing error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PdfServiceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised by the HTTP layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, PdfServiceError>;
