// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh normalization prior to export
//!
//! Three steps, always in this order:
//! 1. quads are split into triangles along the 0-2 diagonal
//! 2. per-vertex normals are recomputed from the triangles
//! 3. vertices no face references are removed and indices remapped
//!
//! Every step returns new data; the source mesh is never modified, since the
//! same host geometry can back several selected objects.

use cad_glb_core::{Face, MeshData, Point2, UNSET_TEXCOORD};
use nalgebra::Vector3;
use rustc_hash::FxHashMap;

/// Split quads along the diagonal between their first and third corners.
///
/// `(v0, v1, v2, v3)` becomes `(v0, v1, v2)` and `(v0, v2, v3)`. A quad whose
/// last two corners coincide is the host's encoding of a triangle and yields
/// a single triangle. Faces that reference a vertex outside the mesh are
/// dropped.
pub fn triangulate_faces(mesh: &MeshData) -> Vec<[u32; 3]> {
    let vertex_count = mesh.vertex_count();
    let in_range = |indices: &[u32]| indices.iter().all(|&i| (i as usize) < vertex_count);

    let mut triangles = Vec::with_capacity(mesh.face_count() + mesh.quad_count());
    for face in &mesh.faces {
        if !in_range(face.indices()) {
            continue;
        }
        match *face {
            Face::Triangle(tri) => triangles.push(tri),
            Face::Quad([a, b, c, d]) if c == d => triangles.push([a, b, c]),
            Face::Quad([a, b, c, d]) => {
                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }
    }
    triangles
}

/// Area-weighted vertex normals.
///
/// Each triangle contributes its unnormalized cross product to its three
/// corners, so larger faces weigh more. Vertices whose sum vanishes (unused
/// or only in degenerate triangles) get +Z.
pub fn compute_vertex_normals(mesh: &MeshData, triangles: &[[u32; 3]]) -> Vec<Vector3<f64>> {
    let mut normals = vec![Vector3::zeros(); mesh.vertex_count()];

    for &[i0, i1, i2] in triangles {
        let v0 = mesh.vertices[i0 as usize];
        let v1 = mesh.vertices[i1 as usize];
        let v2 = mesh.vertices[i2 as usize];

        let normal = (v1 - v0).cross(&(v2 - v0));

        normals[i0 as usize] += normal;
        normals[i1 as usize] += normal;
        normals[i2 as usize] += normal;
    }

    normals
        .into_iter()
        .map(|n| n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z))
        .collect()
}

/// Triangulate, recompute normals and compact a mesh.
///
/// The result holds only triangles, a normal per vertex, and only vertices
/// some triangle references. Texture coordinates follow their vertices; when
/// the source had fewer coordinates than vertices the gaps are filled with
/// [`UNSET_TEXCOORD`].
pub fn normalize_mesh(mesh: &MeshData) -> MeshData {
    let triangles = triangulate_faces(mesh);
    let normals = compute_vertex_normals(mesh, &triangles);

    // Old index -> new index, in first-reference order
    let mut remap: FxHashMap<u32, u32> = FxHashMap::default();
    let mut order: Vec<u32> = Vec::with_capacity(mesh.vertex_count());
    for &index in triangles.iter().flatten() {
        remap.entry(index).or_insert_with(|| {
            order.push(index);
            (order.len() - 1) as u32
        });
    }

    let has_texture_coords = !mesh.texture_coords.is_empty();
    let unset = Point2::new(UNSET_TEXCOORD, UNSET_TEXCOORD);

    let mut out = MeshData::with_capacity(order.len(), triangles.len());
    for &old in &order {
        let old = old as usize;
        out.vertices.push(mesh.vertices[old]);
        out.normals.push(normals[old]);
        if has_texture_coords {
            out.texture_coords
                .push(mesh.texture_coords.get(old).copied().unwrap_or(unset));
        }
    }

    out.faces = triangles
        .iter()
        .map(|&[a, b, c]| Face::Triangle([remap[&a], remap[&b], remap[&c]]))
        .collect();

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cad_glb_core::Point3;

    fn quad_with_stray_vertex() -> MeshData {
        let mut mesh = MeshData::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(5.0, 5.0, 5.0)); // unreferenced
        mesh.add_quad(0, 1, 2, 3);
        mesh
    }

    #[test]
    fn test_quad_split_on_first_diagonal() {
        let mesh = quad_with_stray_vertex();
        assert_eq!(triangulate_faces(&mesh), vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_degenerate_quad_is_one_triangle() {
        let mut mesh = quad_with_stray_vertex();
        mesh.faces = vec![Face::Quad([0, 1, 2, 2])];
        assert_eq!(triangulate_faces(&mesh), vec![[0, 1, 2]]);
    }

    #[test]
    fn test_out_of_range_faces_dropped() {
        let mut mesh = quad_with_stray_vertex();
        mesh.add_triangle(0, 1, 99);
        let out = normalize_mesh(&mesh);
        assert_eq!(out.face_count(), 2);
    }

    #[test]
    fn test_output_is_triangles_in_range() {
        let mut mesh = quad_with_stray_vertex();
        mesh.add_triangle(1, 2, 4);
        let out = normalize_mesh(&mesh);

        assert!(out.faces.iter().all(|f| matches!(f, Face::Triangle(_))));
        let n = out.vertex_count() as u32;
        assert!(out.faces.iter().flat_map(|f| f.indices()).all(|&i| i < n));
        assert_eq!(out.normals.len(), out.vertex_count());
    }

    #[test]
    fn test_compaction_removes_unused_vertex() {
        let mesh = quad_with_stray_vertex();
        let out = normalize_mesh(&mesh);
        assert_eq!(out.vertex_count(), 4);
        assert!(out.vertices.iter().all(|v| v.z == 0.0));
        // Source untouched
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.quad_count(), 1);
    }

    #[test]
    fn test_compaction_remaps_indices() {
        let mut mesh = MeshData::new();
        mesh.add_vertex(Point3::new(9.0, 9.0, 9.0)); // unreferenced
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(1, 2, 3);

        let out = normalize_mesh(&mesh);
        assert_eq!(out.faces, vec![Face::Triangle([0, 1, 2])]);
        assert_eq!(out.vertices[0], Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_normals_point_up_for_ccw_quad() {
        let out = normalize_mesh(&quad_with_stray_vertex());
        for n in &out.normals {
            assert_relative_eq!(*n, Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_normals_are_area_weighted() {
        // Two triangles sharing vertex 0: a large one facing +Z, a small one
        // facing +X. The shared normal leans towards +Z.
        let mut mesh = MeshData::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(10.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 10.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 3, 4);

        let normals = compute_vertex_normals(&mesh, &triangulate_faces(&mesh));
        assert!(normals[0].z > normals[0].x);
        assert_relative_eq!(normals[0].norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let mesh = quad_with_stray_vertex();
        assert_eq!(normalize_mesh(&mesh), normalize_mesh(&mesh));
    }

    #[test]
    fn test_short_texture_coords_padded() {
        let mut mesh = quad_with_stray_vertex();
        mesh.texture_coords = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];

        let out = normalize_mesh(&mesh);
        assert_eq!(out.texture_coords.len(), out.vertex_count());
        assert_eq!(out.texture_coord(1), Some(Point2::new(1.0, 0.0)));
        assert_eq!(out.texture_coord(3), None);
    }

    #[test]
    fn test_no_texture_coords_stay_empty() {
        let out = normalize_mesh(&quad_with_stray_vertex());
        assert!(out.texture_coords.is_empty());
    }
}
