// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and exit codes for the command line.

use thiserror::Error;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing input snapshot path")]
    MissingInput,

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid value for {option}: {value}")]
    InvalidValue { option: String, value: String },

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Write failed: {0}")]
    Write(#[from] cad_glb_writer::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::MissingInput
            | CliError::UnknownOption(_)
            | CliError::MissingValue(_)
            | CliError::InvalidValue { .. } => 2,
            CliError::Snapshot(_) => 3,
            CliError::Write(_) => 4,
        }
    }

    /// Usage errors are followed by the help text.
    pub fn is_usage(&self) -> bool {
        self.exit_code() == 2
    }
}
