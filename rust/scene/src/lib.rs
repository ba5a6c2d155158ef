// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CAD-GLB Scene
//!
//! Builds the in-memory scene graph a container writer serializes to glTF.
//!
//! - [`MaterialLibrary`]: one descriptor per material name, first seen wins
//! - [`assemble_vertex`]: one glTF-space vertex per mesh corner
//! - [`SceneAssembler`]: mesh nodes with materials and user-attribute extras
//! - [`ExportPipeline`]: runs a whole selection, skipping bad objects
//!
//! ```rust
//! use cad_glb_core::{Document, MeshData, Point3, RawGeometry, SceneObject, UnitSystem};
//! use cad_glb_geometry::RenderMeshTessellator;
//! use cad_glb_scene::{ExportOptions, ExportPipeline};
//!
//! let mut mesh = MeshData::new();
//! mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
//! mesh.add_triangle(0, 1, 2);
//!
//! let doc = Document::new(UnitSystem::Meters);
//! let objects = vec![SceneObject::new(RawGeometry::Mesh(mesh))];
//! let report = ExportPipeline::new(&doc, &RenderMeshTessellator, ExportOptions::default())
//!     .run(&objects);
//! assert_eq!(report.scene.nodes.len(), 1);
//! ```

pub mod assembler;
pub mod error;
pub mod graph;
pub mod materials;
pub mod pipeline;
pub mod vertex;

pub use assembler::{MeshWithContext, SceneAssembler, DEFAULT_NODE_NAME};
pub use error::{Error, Result};
pub use graph::{Extras, MaterialDescriptor, MaterialId, MeshNode, OutputVertex, SceneGraph};
pub use materials::MaterialLibrary;
pub use pipeline::{
    Diagnostic, DiagnosticKind, ExportOptions, ExportPipeline, ExportReport, ExportStep,
    MissingMaterialPolicy,
};
pub use vertex::{assemble_vertex, TriangleListBuilder};
