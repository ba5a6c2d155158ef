// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene assembly
//!
//! Turns accepted objects into mesh nodes. Per object, in order:
//! normalize the mesh, look up or create its material, emit three vertices
//! per triangle, attach extras when the object carried user attributes.

use cad_glb_core::{MaterialRecord, MeshData, UserAttribute};
use cad_glb_geometry::{normalize_mesh, CoordinateTransform};

use crate::error::{Error, Result};
use crate::graph::{Extras, MaterialId, MeshNode, SceneGraph};
use crate::materials::MaterialLibrary;
use crate::vertex::{assemble_vertex, TriangleListBuilder};

/// Node name used when the object has no identifier
pub const DEFAULT_NODE_NAME: &str = "mesh";

/// An accepted object, ready for assembly.
#[derive(Debug, Clone)]
pub struct MeshWithContext {
    pub name: Option<String>,
    pub mesh: MeshData,
    pub attributes: Vec<UserAttribute>,
    pub material: MaterialRecord,
}

impl MeshWithContext {
    pub fn new(mesh: MeshData, attributes: Vec<UserAttribute>, material: MaterialRecord) -> Self {
        Self {
            name: None,
            mesh,
            attributes,
            material,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Accumulates mesh nodes and owns the material library for one run.
#[derive(Debug)]
pub struct SceneAssembler {
    transform: CoordinateTransform,
    materials: MaterialLibrary,
    nodes: Vec<MeshNode>,
}

impl SceneAssembler {
    pub fn new(transform: CoordinateTransform) -> Self {
        Self {
            transform,
            materials: MaterialLibrary::new(),
            nodes: Vec::new(),
        }
    }

    /// Number of nodes added so far
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Assemble one object into a node.
    ///
    /// Fails without touching the material library when normalization
    /// leaves no triangles, so a rejected mesh never leaves an orphan
    /// material behind.
    pub fn add(&mut self, item: MeshWithContext) -> Result<MaterialId> {
        let mesh = normalize_mesh(&item.mesh);
        if mesh.face_count() == 0 {
            return Err(Error::NoTriangles {
                faces: item.mesh.face_count(),
            });
        }

        let material = self.materials.get_or_insert(&item.material);

        let mut triangles = TriangleListBuilder::with_capacity(mesh.face_count());
        for face in &mesh.faces {
            let &[a, b, c] = face.indices() else {
                continue;
            };
            triangles.add_triangle(
                assemble_vertex(&mesh, a as usize, &self.transform),
                assemble_vertex(&mesh, b as usize, &self.transform),
                assemble_vertex(&mesh, c as usize, &self.transform),
            );
        }
        let (vertices, indices) = triangles.finish();

        self.nodes.push(MeshNode {
            name: item.name.unwrap_or_else(|| DEFAULT_NODE_NAME.to_string()),
            material,
            vertices,
            indices,
            extras: Extras::from_attributes(&item.attributes),
        });
        Ok(material)
    }

    pub fn finish(self) -> SceneGraph {
        SceneGraph {
            nodes: self.nodes,
            materials: self.materials,
        }
    }
}
