// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accept/reject predicates for raw geometry

use cad_glb_core::{MeshData, Solid};

/// A solid is exportable when it has at least one bounding surface and a
/// positive, finite area.
#[inline]
pub fn is_valid_solid(solid: &Solid) -> bool {
    solid.surface_count > 0 && solid.area.is_finite() && solid.area > 0.0
}

/// A mesh is exportable when it has at least one face and one vertex.
#[inline]
pub fn is_valid_mesh(mesh: &MeshData) -> bool {
    mesh.face_count() > 0 && mesh.vertex_count() > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use cad_glb_core::Point3;

    #[test]
    fn test_solid_validation() {
        let valid = Solid {
            surface_count: 6,
            area: 6.0,
            render_meshes: Vec::new(),
        };
        assert!(is_valid_solid(&valid));

        let zero_area = Solid { area: 0.0, ..valid.clone() };
        assert!(!is_valid_solid(&zero_area));

        let no_surfaces = Solid { surface_count: 0, ..valid.clone() };
        assert!(!is_valid_solid(&no_surfaces));

        let nan_area = Solid { area: f64::NAN, ..valid };
        assert!(!is_valid_solid(&nan_area));
    }

    #[test]
    fn test_mesh_validation() {
        let mut mesh = MeshData::new();
        assert!(!is_valid_mesh(&mesh));

        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        assert!(!is_valid_mesh(&mesh), "vertices without faces");

        mesh.add_triangle(0, 1, 2);
        assert!(is_valid_mesh(&mesh));
    }
}
