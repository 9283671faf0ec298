// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Render request payload

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Body of a `POST html` / `POST pdf` call
///
/// Signing re-encodes this with sorted keys; see [`print_auth::PayloadSigner::sign_json`].
#[derive(Debug, Serialize)]
pub struct RenderRequest<'a, D: ?Sized> {
    /// Name the service should give the rendered document
    pub filename: String,
    /// Template variables
    pub data: &'a D,
    /// Liquid template source
    pub template: &'a str,
}

impl<'a, D: Serialize + ?Sized> RenderRequest<'a, D> {
    pub fn new(filename: impl Into<String>, data: &'a D, template: &'a str) -> Self {
        Self {
            filename: filename.into(),
            data,
            template,
        }
    }

    /// Build a request named after the last component of `save_path`
    pub fn for_save_path(save_path: &Path, data: &'a D, template: &'a str) -> Self {
        Self::new(basename(save_path), data, template)
    }
}

/// Last path component, or empty when the path has none (e.g. `..`)
pub(crate) fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Response body of `POST html`
#[derive(Debug, Deserialize)]
pub(crate) struct HtmlResponse {
    pub html: String,
}
