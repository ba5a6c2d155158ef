// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document-level tables: materials, layers and the unit system.

use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::units::UnitSystem;

/// A material as stored in the document material table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaterialRecord {
    /// Material name, may be empty
    pub name: String,
    /// Diffuse color, 0-255 per channel
    pub diffuse: [u8; 3],
    /// 0.0 = opaque, 1.0 = fully transparent
    pub transparency: f64,
    /// Bitmap texture file, if one is assigned
    pub texture_path: Option<PathBuf>,
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse: [255, 255, 255],
            transparency: 0.0,
            texture_path: None,
        }
    }
}

impl MaterialRecord {
    pub fn new(name: impl Into<String>, diffuse: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            diffuse,
            ..Self::default()
        }
    }

    /// Material used for objects whose own material cannot be resolved:
    /// "Default", white, opaque.
    pub fn fallback() -> Self {
        Self::new("Default", [255, 255, 255])
    }

    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture_path = Some(path.into());
        self
    }
}

/// A document layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Layer {
    pub name: String,
    /// Index into the material table, negative when the layer has none
    pub render_material_index: i32,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            name: String::new(),
            render_material_index: -1,
        }
    }
}

impl Layer {
    pub fn new(name: impl Into<String>, render_material_index: i32) -> Self {
        Self {
            name: name.into(),
            render_material_index,
        }
    }
}

/// Read-only view of the host document the selection came from.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Document {
    /// Path of the document on disk; unsaved documents have none
    pub path: Option<PathBuf>,
    pub unit_system: UnitSystem,
    pub materials: Vec<MaterialRecord>,
    pub layers: Vec<Layer>,
}

impl Document {
    pub fn new(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            ..Self::default()
        }
    }

    /// Material table lookup; negative or out-of-range indices give `None`.
    #[inline]
    pub fn material(&self, index: i32) -> Option<&MaterialRecord> {
        usize::try_from(index).ok().and_then(|i| self.materials.get(i))
    }

    /// Layer table lookup; negative or out-of-range indices give `None`.
    #[inline]
    pub fn layer(&self, index: i32) -> Option<&Layer> {
        usize::try_from(index).ok().and_then(|i| self.layers.get(i))
    }

    /// Append a material, returning its table index
    pub fn add_material(&mut self, material: MaterialRecord) -> i32 {
        self.materials.push(material);
        (self.materials.len() - 1) as i32
    }

    /// Append a layer, returning its table index
    pub fn add_layer(&mut self, layer: Layer) -> i32 {
        self.layers.push(layer);
        (self.layers.len() - 1) as i32
    }

    /// File name of the document without extension, if it has been saved.
    pub fn base_name(&self) -> Option<&str> {
        self.path
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }
}
