// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures as exposed by the host document

use nalgebra::{Point2, Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel the host stores in texture coordinate slots that were never set.
pub const UNSET_TEXCOORD: f32 = -1.234321e38;

/// True if a texture coordinate is the host's "unset" value (or not finite).
#[inline]
pub fn is_unset_texcoord(uv: &Point2<f32>) -> bool {
    uv.x == UNSET_TEXCOORD || uv.y == UNSET_TEXCOORD || !uv.x.is_finite() || !uv.y.is_finite()
}

/// A mesh face: a triangle or a quad, as vertex indices in winding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u32>", into = "Vec<u32>"))]
pub enum Face {
    Triangle([u32; 3]),
    Quad([u32; 4]),
}

impl Face {
    /// Corner indices of the face.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        match self {
            Face::Triangle(v) => v,
            Face::Quad(v) => v,
        }
    }

    /// Whether every corner indexes one of `vertex_count` vertices.
    #[inline]
    pub fn is_within(&self, vertex_count: usize) -> bool {
        self.indices().iter().all(|&i| (i as usize) < vertex_count)
    }

    /// Add `offset` to every corner index, or `None` if any index overflows.
    #[inline]
    pub fn offset(self, offset: u32) -> Option<Face> {
        match self {
            Face::Triangle([a, b, c]) => Some(Face::Triangle([
                a.checked_add(offset)?,
                b.checked_add(offset)?,
                c.checked_add(offset)?,
            ])),
            Face::Quad([a, b, c, d]) => Some(Face::Quad([
                a.checked_add(offset)?,
                b.checked_add(offset)?,
                c.checked_add(offset)?,
                d.checked_add(offset)?,
            ])),
        }
    }
}

impl TryFrom<Vec<u32>> for Face {
    type Error = Error;

    fn try_from(indices: Vec<u32>) -> Result<Self> {
        match indices.as_slice() {
            [a, b, c] => Ok(Face::Triangle([*a, *b, *c])),
            [a, b, c, d] => Ok(Face::Quad([*a, *b, *c, *d])),
            other => Err(Error::InvalidFaceArity(other.len())),
        }
    }
}

impl From<Face> for Vec<u32> {
    fn from(face: Face) -> Self {
        face.indices().to_vec()
    }
}

/// Polygon mesh with optional normals and texture coordinates.
///
/// `normals` is either empty or parallel to `vertices`. `texture_coords` may
/// be shorter than `vertices`; missing entries are treated as unset.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeshData {
    pub vertices: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub texture_coords: Vec<Point2<f32>>,
    pub faces: Vec<Face>,
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            texture_coords: Vec::new(),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Add a vertex, returning its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        self.vertices.push(position);
        (self.vertices.len() - 1) as u32
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.faces.push(Face::Triangle([a, b, c]));
    }

    /// Add a quad
    #[inline]
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.faces.push(Face::Quad([a, b, c, d]));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get face count (triangles and quads)
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of quad faces
    pub fn quad_count(&self) -> usize {
        self.faces.iter().filter(|f| matches!(f, Face::Quad(_))).count()
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Texture coordinate of a vertex, `None` when absent or unset.
    #[inline]
    pub fn texture_coord(&self, index: usize) -> Option<Point2<f32>> {
        self.texture_coords
            .get(index)
            .filter(|uv| !is_unset_texcoord(uv))
            .copied()
    }

    /// Merge another mesh into this one.
    ///
    /// Faces of `other` are re-indexed past this mesh's vertices; faces that
    /// reference a vertex outside `other` are dropped. Normals are
    /// kept only while both sides carry a full set; texture coordinates are
    /// padded with [`UNSET_TEXCOORD`] so indices stay aligned.
    pub fn merge(&mut self, other: &MeshData) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other.clone();
            return;
        }

        let vertex_offset = self.vertices.len() as u32;
        let normals_complete = self.normals.len() == self.vertices.len()
            && other.normals.len() == other.vertices.len();

        if !self.texture_coords.is_empty() || !other.texture_coords.is_empty() {
            let unset = Point2::new(UNSET_TEXCOORD, UNSET_TEXCOORD);
            self.texture_coords.resize(self.vertices.len(), unset);
            self.texture_coords.extend_from_slice(&other.texture_coords);
            self.texture_coords
                .resize(self.vertices.len() + other.vertices.len(), unset);
        }

        if normals_complete {
            self.normals.extend_from_slice(&other.normals);
        } else {
            self.normals.clear();
        }

        let other_count = other.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .filter(|f| f.is_within(other_count))
                .filter_map(|f| f.offset(vertex_offset)),
        );
    }

    /// Batch merge multiple meshes at once
    pub fn merge_all(meshes: &[MeshData]) -> MeshData {
        let total_vertices: usize = meshes.iter().map(|m| m.vertices.len()).sum();
        let total_faces: usize = meshes.iter().map(|m| m.faces.len()).sum();

        let mut combined = MeshData::with_capacity(total_vertices, total_faces);
        for mesh in meshes {
            combined.merge(mesh);
        }
        combined
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
        for v in &self.vertices {
            min = min.inf(v);
            max = max.sup(v);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> MeshData {
        let mut mesh = MeshData::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_quad(0, 1, 2, 3);
        mesh
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = MeshData::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_face_from_indices() {
        assert_eq!(Face::try_from(vec![0, 1, 2]), Ok(Face::Triangle([0, 1, 2])));
        assert_eq!(Face::try_from(vec![0, 1, 2, 3]), Ok(Face::Quad([0, 1, 2, 3])));
        assert_eq!(
            Face::try_from(vec![0, 1]),
            Err(Error::InvalidFaceArity(2))
        );
    }

    #[test]
    fn test_texture_coord_defaults() {
        let mut mesh = unit_quad();
        mesh.texture_coords = vec![
            Point2::new(0.5, 0.25),
            Point2::new(UNSET_TEXCOORD, UNSET_TEXCOORD),
        ];
        assert_eq!(mesh.texture_coord(0), Some(Point2::new(0.5, 0.25)));
        assert_eq!(mesh.texture_coord(1), None);
        assert_eq!(mesh.texture_coord(3), None);
    }

    #[test]
    fn test_merge_offsets_faces() {
        let mut a = unit_quad();
        let b = unit_quad();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.face_count(), 2);
        assert_eq!(a.faces[1], Face::Quad([4, 5, 6, 7]));
    }

    #[test]
    fn test_merge_drops_out_of_range_faces() {
        let mut a = unit_quad();
        let mut b = unit_quad();
        b.add_triangle(0, 1, u32::MAX - 1);
        b.add_triangle(0, 1, 4);
        a.merge(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.faces, vec![Face::Quad([0, 1, 2, 3]), Face::Quad([4, 5, 6, 7])]);
    }

    #[test]
    fn test_face_offset_overflow() {
        assert_eq!(Face::Triangle([0, 1, 2]).offset(3), Some(Face::Triangle([3, 4, 5])));
        assert_eq!(Face::Triangle([0, 1, u32::MAX - 1]).offset(3), None);
        assert!(!Face::Quad([0, 1, 2, 4]).is_within(4));
    }

    #[test]
    fn test_merge_pads_texture_coords() {
        let a = unit_quad();
        let mut b = unit_quad();
        b.texture_coords = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];

        let merged = MeshData::merge_all(&[a, b]);
        assert_eq!(merged.texture_coords.len(), 8);
        assert_eq!(merged.texture_coord(0), None);
        assert_eq!(merged.texture_coord(5), Some(Point2::new(1.0, 0.0)));
        assert_eq!(merged.texture_coord(7), None);
    }

    #[test]
    fn test_merge_drops_partial_normals() {
        let mut a = unit_quad();
        a.normals = vec![Vector3::z(); 4];
        let b = unit_quad();
        a.merge(&b);
        assert!(a.normals.is_empty());
    }

    #[test]
    fn test_bounds() {
        let mesh = unit_quad();
        let (min, max) = mesh.bounds();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_faces() {
        let json = r#"{"vertices":[[0,0,0],[1,0,0],[1,1,0]],"faces":[[0,1,2]]}"#;
        let mesh: MeshData = serde_json::from_str(json).unwrap();
        assert_eq!(mesh.faces, vec![Face::Triangle([0, 1, 2])]);
        assert!(mesh.normals.is_empty());

        let bad = r#"{"vertices":[[0,0,0]],"faces":[[0,1]]}"#;
        assert!(serde_json::from_str::<MeshData>(bad).is_err());
    }
}
