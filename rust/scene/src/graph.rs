// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output scene graph handed to the container writer

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use cad_glb_core::UserAttribute;

use crate::materials::MaterialLibrary;

/// Handle to a descriptor in a [`MaterialLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub(crate) u32);

impl MaterialId {
    /// Position of the material in the library (and in the glTF material array)
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A deduplicated output material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescriptor {
    pub name: String,
    /// Linear RGBA in 0..=1; alpha is `1 - transparency`
    pub base_color: [f32; 4],
    /// Image file backing the base color channel, checked to exist when
    /// the descriptor was built
    pub base_color_texture: Option<PathBuf>,
    pub double_sided: bool,
}

impl MaterialDescriptor {
    /// True when the base color is not fully opaque
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.base_color[3] < 1.0
    }
}

/// One exported vertex, already in glTF space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl OutputVertex {
    /// Bit pattern used to weld identical vertices
    #[inline]
    pub(crate) fn key(&self) -> [u32; 8] {
        [
            self.position[0].to_bits(),
            self.position[1].to_bits(),
            self.position[2].to_bits(),
            self.normal[0].to_bits(),
            self.normal[1].to_bits(),
            self.normal[2].to_bits(),
            self.uv[0].to_bits(),
            self.uv[1].to_bits(),
        ]
    }
}

/// Flat string map attached to a mesh as glTF `extras`.
///
/// Keys are kept sorted so the serialized JSON is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Extras(BTreeMap<String, String>);

impl Extras {
    /// Build extras from collected attributes, `None` when there are none.
    pub fn from_attributes(attributes: &[UserAttribute]) -> Option<Self> {
        if attributes.is_empty() {
            return None;
        }
        let map = attributes
            .iter()
            .map(|a| (a.key.clone(), a.value.clone()))
            .collect();
        Some(Self(map))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The extras as a single JSON object, e.g. `{"id":"42","part":"arm"}`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A mesh placed at the identity transform.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub name: String,
    pub material: MaterialId,
    /// Welded vertices
    pub vertices: Vec<OutputVertex>,
    /// Triangle list into `vertices`
    pub indices: Vec<u32>,
    pub extras: Option<Extras>,
}

impl MeshNode {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [OutputVertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.vertices[t[0] as usize],
                self.vertices[t[1] as usize],
                self.vertices[t[2] as usize],
            ]
        })
    }
}

/// Root of the exported scene: flat list of nodes plus their materials.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    pub nodes: Vec<MeshNode>,
    pub materials: MaterialLibrary,
}

impl SceneGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Material a node references
    pub fn material_of(&self, node: &MeshNode) -> Option<&MaterialDescriptor> {
        self.materials.get(node.material)
    }
}
