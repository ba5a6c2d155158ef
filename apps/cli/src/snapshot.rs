// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON snapshot of a host document and the selected objects.

use serde::Deserialize;

use cad_glb_core::{Document, SceneObject};

use crate::error::CliError;

/// `{"document": {...}, "objects": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub document: Document,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(text)?)
    }
}
