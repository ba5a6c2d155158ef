// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the host document model.

use thiserror::Error;

/// Result type alias for document model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building the document model from host data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mesh face must reference exactly 3 or 4 vertices.
    #[error("mesh face must have 3 or 4 vertex indices, got {0}")]
    InvalidFaceArity(usize),
}
