// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex assembly and welding

use rustc_hash::FxHashMap;

use cad_glb_core::{MeshData, Vector3};
use cad_glb_geometry::CoordinateTransform;

use crate::graph::OutputVertex;

/// Build the output vertex for one mesh corner.
///
/// Position and normal go through `transform`. The UV is the vertex's
/// texture coordinate when the mesh has one for it and it is set, (0, 0)
/// otherwise. A vertex without a normal gets +Z before the remap.
pub fn assemble_vertex(
    mesh: &MeshData,
    index: usize,
    transform: &CoordinateTransform,
) -> OutputVertex {
    let position = transform.apply_point(&mesh.vertices[index]);
    let normal = transform.apply_normal(&mesh.normals.get(index).copied().unwrap_or_else(Vector3::z));
    let uv = mesh
        .texture_coord(index)
        .map(|uv| [uv.x, uv.y])
        .unwrap_or([0.0, 0.0]);

    OutputVertex {
        position: [position.x as f32, position.y as f32, position.z as f32],
        normal: [normal.x as f32, normal.y as f32, normal.z as f32],
        uv,
    }
}

/// Collects triangles, merging bit-identical vertices into one index.
#[derive(Debug, Default)]
pub struct TriangleListBuilder {
    vertices: Vec<OutputVertex>,
    indices: Vec<u32>,
    lookup: FxHashMap<[u32; 8], u32>,
}

impl TriangleListBuilder {
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
            indices: Vec::with_capacity(triangles * 3),
            lookup: FxHashMap::default(),
        }
    }

    fn push_vertex(&mut self, vertex: OutputVertex) -> u32 {
        let next = self.vertices.len() as u32;
        let index = *self.lookup.entry(vertex.key()).or_insert(next);
        if index == next {
            self.vertices.push(vertex);
        }
        index
    }

    pub fn add_triangle(&mut self, a: OutputVertex, b: OutputVertex, c: OutputVertex) {
        let ia = self.push_vertex(a);
        let ib = self.push_vertex(b);
        let ic = self.push_vertex(c);
        self.indices.extend_from_slice(&[ia, ib, ic]);
    }

    /// Welded vertices and the triangle list indexing them
    pub fn finish(self) -> (Vec<OutputVertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}
