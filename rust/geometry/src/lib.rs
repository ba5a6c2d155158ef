// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CAD-GLB Geometry Processing
//!
//! Validation, tessellation, normalization and coordinate transforms for
//! meshes on their way from a CAD document to glTF, using nalgebra for the
//! math.

pub mod error;
pub mod normalize;
pub mod tessellate;
pub mod transform;
pub mod validate;

pub use error::{Error, Result};
pub use normalize::{compute_vertex_normals, normalize_mesh, triangulate_faces};
pub use tessellate::{tessellate_solid, MeshingQuality, RenderMeshTessellator, Tessellator};
pub use transform::CoordinateTransform;
pub use validate::{is_valid_mesh, is_valid_solid};
