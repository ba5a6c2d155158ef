// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export pipeline over a selection
//!
//! Runs every selected object through validation, tessellation, material
//! resolution, attribute collection and scene assembly. A problem with one
//! object never stops the run: the object is skipped, a [`Diagnostic`]
//! names the step that failed, and the remaining objects are processed.

use std::borrow::Cow;
use std::fmt;

use cad_glb_core::{
    collect_user_attributes, resolve_material, Document, MaterialRecord, MeshData, RawGeometry,
    SceneObject,
};
use cad_glb_geometry::{
    is_valid_mesh, is_valid_solid, tessellate_solid, CoordinateTransform, MeshingQuality,
    Tessellator,
};

use crate::assembler::{MeshWithContext, SceneAssembler};
use crate::graph::SceneGraph;

/// What to do with an object whose material cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingMaterialPolicy {
    /// Export it with [`ExportOptions::default_material`]
    #[default]
    UseDefault,
    /// Leave it out of the scene
    SkipObject,
}

impl MissingMaterialPolicy {
    /// Parse `"default"` / `"skip"` as used in configuration
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" | "use_default" => Some(Self::UseDefault),
            "skip" | "skip_object" => Some(Self::SkipObject),
            _ => None,
        }
    }
}

/// Settings for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub meshing_quality: MeshingQuality,
    pub missing_material: MissingMaterialPolicy,
    pub default_material: MaterialRecord,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            meshing_quality: MeshingQuality::default(),
            missing_material: MissingMaterialPolicy::UseDefault,
            default_material: MaterialRecord::fallback(),
        }
    }
}

/// Pipeline step a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStep {
    Validation,
    Tessellation,
    MaterialResolution,
    Assembly,
}

impl fmt::Display for ExportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStep::Validation => "geometry validation",
            ExportStep::Tessellation => "tessellation",
            ExportStep::MaterialResolution => "material resolution",
            ExportStep::Assembly => "scene assembly",
        };
        f.write_str(name)
    }
}

/// Kind of per-object problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    InvalidGeometry,
    UnresolvableMaterial,
    UnexpectedFault,
}

/// A per-object problem recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Object id, or `#<position in selection>`
    pub object: String,
    pub step: ExportStep,
    pub kind: DiagnosticKind,
    pub message: String,
    /// False when the object was still exported (default material fallback)
    pub skipped: bool,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.skipped { "skipped" } else { "kept" };
        write!(
            f,
            "{} ({}) during {}: {}",
            self.object, action, self.step, self.message
        )
    }
}

/// Result of a run: the scene plus what happened to each object.
#[derive(Debug)]
pub struct ExportReport {
    pub scene: SceneGraph,
    /// Objects that made it into the scene
    pub exported: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExportReport {
    /// Diagnostics of objects that were left out
    pub fn skipped(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.skipped)
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }
}

/// One export run over a document.
pub struct ExportPipeline<'a> {
    document: &'a Document,
    tessellator: &'a dyn Tessellator,
    options: ExportOptions,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(
        document: &'a Document,
        tessellator: &'a dyn Tessellator,
        options: ExportOptions,
    ) -> Self {
        Self {
            document,
            tessellator,
            options,
        }
    }

    /// Convert the selection into a scene graph, in selection order.
    pub fn run(&self, objects: &[SceneObject]) -> ExportReport {
        let transform = CoordinateTransform::from_units(self.document.unit_system);
        tracing::info!(
            objects = objects.len(),
            unit_system = ?self.document.unit_system,
            scale = transform.scale(),
            "Starting export"
        );

        let mut assembler = SceneAssembler::new(transform);
        let mut diagnostics = Vec::new();

        for (position, object) in objects.iter().enumerate() {
            let label = object.label(position);
            let Some(item) = self.prepare(object, &label, &mut diagnostics) else {
                continue;
            };
            if let Err(e) = assembler.add(item) {
                diagnostics.push(skip(
                    &label,
                    ExportStep::Assembly,
                    DiagnosticKind::InvalidGeometry,
                    e.to_string(),
                ));
            }
        }

        for diagnostic in &diagnostics {
            tracing::warn!(
                object = %diagnostic.object,
                step = %diagnostic.step,
                skipped = diagnostic.skipped,
                "{}",
                diagnostic.message
            );
        }

        let exported = assembler.len();
        let scene = assembler.finish();
        tracing::info!(
            exported,
            skipped = objects.len() - exported,
            materials = scene.materials.len(),
            "Export pipeline complete"
        );

        ExportReport {
            scene,
            exported,
            diagnostics,
        }
    }

    /// Resolve geometry, material and attributes for one object.
    fn prepare(
        &self,
        object: &SceneObject,
        label: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<MeshWithContext> {
        let mesh = match self.resolve_geometry(&object.geometry) {
            Ok(mesh) => mesh,
            Err(diagnostic) => {
                diagnostics.push(Diagnostic {
                    object: label.to_string(),
                    ..diagnostic
                });
                return None;
            }
        };

        let material = match resolve_material(&object.attributes, self.document) {
            Some(record) => record.clone(),
            None => {
                let message = format!(
                    "no material for source {:?} (material {}, layer {})",
                    object.attributes.material_source,
                    object.attributes.material_index,
                    object.attributes.layer_index
                );
                match self.options.missing_material {
                    MissingMaterialPolicy::UseDefault => {
                        diagnostics.push(Diagnostic {
                            object: label.to_string(),
                            step: ExportStep::MaterialResolution,
                            kind: DiagnosticKind::UnresolvableMaterial,
                            message: format!(
                                "{}, using \"{}\"",
                                message, self.options.default_material.name
                            ),
                            skipped: false,
                        });
                        self.options.default_material.clone()
                    }
                    MissingMaterialPolicy::SkipObject => {
                        diagnostics.push(skip(
                            label,
                            ExportStep::MaterialResolution,
                            DiagnosticKind::UnresolvableMaterial,
                            message,
                        ));
                        return None;
                    }
                }
            }
        };

        let item = MeshWithContext {
            name: object.id.clone(),
            mesh: mesh.into_owned(),
            attributes: collect_user_attributes(&object.attributes),
            material,
        };
        Some(item)
    }

    /// Mesh to export for an object's geometry, tessellating solids.
    ///
    /// The returned diagnostic has an empty `object`; the caller fills it in.
    fn resolve_geometry<'g>(
        &self,
        geometry: &'g RawGeometry,
    ) -> std::result::Result<Cow<'g, MeshData>, Diagnostic> {
        let mesh = match geometry {
            RawGeometry::Mesh(mesh) => Cow::Borrowed(mesh),
            RawGeometry::Solid(solid) => {
                if !is_valid_solid(solid) {
                    return Err(skip(
                        "",
                        ExportStep::Validation,
                        DiagnosticKind::InvalidGeometry,
                        format!(
                            "solid has {} surfaces and area {}",
                            solid.surface_count, solid.area
                        ),
                    ));
                }
                match tessellate_solid(solid, self.tessellator, &self.options.meshing_quality) {
                    Ok(mesh) => Cow::Owned(mesh),
                    Err(cad_glb_geometry::Error::EmptyMesh(message)) => {
                        return Err(skip(
                            "",
                            ExportStep::Tessellation,
                            DiagnosticKind::InvalidGeometry,
                            message,
                        ));
                    }
                    Err(e) => {
                        return Err(skip(
                            "",
                            ExportStep::Tessellation,
                            DiagnosticKind::UnexpectedFault,
                            e.to_string(),
                        ));
                    }
                }
            }
        };

        if !is_valid_mesh(&mesh) {
            return Err(skip(
                "",
                ExportStep::Validation,
                DiagnosticKind::InvalidGeometry,
                format!(
                    "mesh has {} vertices and {} faces",
                    mesh.vertex_count(),
                    mesh.face_count()
                ),
            ));
        }
        Ok(mesh)
    }
}

fn skip(object: &str, step: ExportStep, kind: DiagnosticKind, message: String) -> Diagnostic {
    Diagnostic {
        object: object.to_string(),
        step,
        kind,
        message,
        skipped: true,
    }
}
