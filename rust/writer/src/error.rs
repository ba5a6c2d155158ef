// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for container writing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing a glTF container
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported container extension: {}", .0.display())]
    UnsupportedContainer(PathBuf),

    #[error("Unsupported image format for texture {}", path.display())]
    UnsupportedImageFormat { path: PathBuf },

    #[error("Scene too large for a glTF container: {0} bytes")]
    TooLarge(usize),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
