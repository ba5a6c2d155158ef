// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid tessellation seam
//!
//! Meshing a boundary representation is the host's job. The exporter only
//! sees the [`Tessellator`] trait and merges whatever meshes it returns.

use cad_glb_core::{MeshData, Solid};

use crate::error::{Error, Result};

/// Meshing settings forwarded to the tessellator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshingQuality {
    /// 0.0 = coarsest, 1.0 = densest
    pub density: f64,
}

impl MeshingQuality {
    pub fn new(density: f64) -> Self {
        Self {
            density: density.clamp(0.0, 1.0),
        }
    }
}

impl Default for MeshingQuality {
    fn default() -> Self {
        Self { density: 0.0 }
    }
}

/// Converts a solid into one or more meshes.
pub trait Tessellator {
    /// Mesh a solid. Returning an empty list is allowed; it means the solid
    /// produced no geometry.
    fn tessellate(&self, solid: &Solid, quality: &MeshingQuality) -> Result<Vec<MeshData>>;
}

/// Tessellator that returns the render meshes the host cached on the solid.
///
/// Document snapshots carry these meshes already, so no meshing happens and
/// `quality` is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderMeshTessellator;

impl Tessellator for RenderMeshTessellator {
    fn tessellate(&self, solid: &Solid, _quality: &MeshingQuality) -> Result<Vec<MeshData>> {
        Ok(solid.render_meshes.clone())
    }
}

/// Tessellate a solid and merge the pieces into one mesh.
///
/// The pieces are concatenated without any relative transform.
pub fn tessellate_solid(
    solid: &Solid,
    tessellator: &dyn Tessellator,
    quality: &MeshingQuality,
) -> Result<MeshData> {
    let pieces = tessellator.tessellate(solid, quality)?;
    let mesh = MeshData::merge_all(&pieces);
    if mesh.is_empty() {
        return Err(Error::EmptyMesh(format!(
            "tessellation of a solid with {} surfaces produced no vertices",
            solid.surface_count
        )));
    }
    Ok(mesh)
}
