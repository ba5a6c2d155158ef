// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selected scene objects and their attributes

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mesh::MeshData;

/// Where an object takes its material from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaterialSource {
    #[default]
    None,
    FromObject,
    FromLayer,
}

/// Per-object attributes captured from the host.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObjectAttributes {
    pub material_source: MaterialSource,
    /// Index into the document material table (-1 = none)
    pub material_index: i32,
    /// Index into the document layer table
    pub layer_index: i32,
    /// User strings in the order the host exposes them
    pub user_strings: Vec<(String, String)>,
}

impl Default for ObjectAttributes {
    fn default() -> Self {
        Self {
            material_source: MaterialSource::None,
            material_index: -1,
            layer_index: 0,
            user_strings: Vec::new(),
        }
    }
}

impl ObjectAttributes {
    /// Look up a user string by key
    pub fn user_string(&self, key: &str) -> Option<&str> {
        self.user_strings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a user string, replacing an existing value for the same key
    pub fn set_user_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.user_strings.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.user_strings.push((key, value)),
        }
    }
}

/// Snapshot of a boundary-representation body.
///
/// The exporter never looks inside the surfaces: it checks the summary
/// values and hands the body to a tessellator. `render_meshes` carries the
/// meshes the host already cached for display, if any.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Solid {
    pub surface_count: usize,
    pub area: f64,
    pub render_meshes: Vec<MeshData>,
}

/// Geometry of a selected object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RawGeometry {
    Mesh(MeshData),
    Solid(Solid),
}

/// An object picked for export.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneObject {
    /// Host identifier, used in diagnostics only
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<String>,
    pub geometry: RawGeometry,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: ObjectAttributes,
}

impl SceneObject {
    pub fn new(geometry: RawGeometry) -> Self {
        Self {
            id: None,
            geometry,
            attributes: ObjectAttributes::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attributes(mut self, attributes: ObjectAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Label for log lines and diagnostics: the id, or `#<position>`.
    pub fn label(&self, position: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("#{}", position),
        }
    }
}
