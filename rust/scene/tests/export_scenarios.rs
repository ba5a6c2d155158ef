// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end export runs over small documents

use approx::assert_relative_eq;
use cad_glb_core::{
    Document, Layer, MaterialRecord, MaterialSource, MeshData, ObjectAttributes, Point3,
    RawGeometry, SceneObject, Solid, UnitSystem,
};
use cad_glb_geometry::RenderMeshTessellator;
use cad_glb_scene::{DiagnosticKind, ExportOptions, ExportPipeline, ExportStep};

fn triangle(points: [[f64; 3]; 3]) -> MeshData {
    let mut mesh = MeshData::new();
    for [x, y, z] in points {
        mesh.add_vertex(Point3::new(x, y, z));
    }
    mesh.add_triangle(0, 1, 2);
    mesh
}

fn solid(mesh: MeshData, area: f64) -> RawGeometry {
    RawGeometry::Solid(Solid {
        surface_count: 1,
        area,
        render_meshes: vec![mesh],
    })
}

fn from_object(material_index: i32) -> ObjectAttributes {
    ObjectAttributes {
        material_source: MaterialSource::FromObject,
        material_index,
        ..ObjectAttributes::default()
    }
}

#[test]
fn test_red_solid_in_millimeters() {
    let mut doc = Document::new(UnitSystem::Millimeters);
    let red = doc.add_material(MaterialRecord::new("Red", [255, 0, 0]));

    let mut attrs = from_object(red);
    attrs.set_user_string("id", "42");
    attrs.set_user_string("part", "arm");

    let mesh = triangle([
        [1000.0, 0.0, 0.0],
        [0.0, 1000.0, 0.0],
        [0.0, 0.0, 1000.0],
    ]);
    let objects = vec![SceneObject::new(solid(mesh, 0.5)).with_attributes(attrs)];

    let report = ExportPipeline::new(&doc, &RenderMeshTessellator, ExportOptions::default())
        .run(&objects);

    assert!(report.diagnostics.is_empty());
    assert_eq!(report.exported, 1);
    let scene = &report.scene;
    assert_eq!(scene.nodes.len(), 1);
    assert_eq!(scene.materials.len(), 1);

    let node = &scene.nodes[0];
    let material = scene.material_of(node).unwrap();
    assert_eq!(material.name, "Red");
    assert_eq!(material.base_color, [1.0, 0.0, 0.0, 1.0]);

    // Millimeters to meters, then Z-up to Y-up
    let positions: Vec<[f32; 3]> = node.vertices.iter().map(|v| v.position).collect();
    assert_eq!(positions.len(), 3);
    let expected = [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
    for (got, want) in positions.iter().zip(expected.iter()) {
        for axis in 0..3 {
            assert_relative_eq!(got[axis], want[axis], epsilon = 1e-6);
        }
    }

    let extras = node.extras.as_ref().unwrap();
    assert_eq!(extras.len(), 2);
    assert_eq!(extras.get("id"), Some("42"));
    assert_eq!(extras.get("part"), Some("arm"));
}

#[test]
fn test_zero_area_solid_gives_empty_scene() {
    let mut doc = Document::new(UnitSystem::Meters);
    let red = doc.add_material(MaterialRecord::new("Red", [255, 0, 0]));

    let mesh = triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let objects = vec![SceneObject::new(solid(mesh, 0.0))
        .with_id("degenerate")
        .with_attributes(from_object(red))];

    let report = ExportPipeline::new(&doc, &RenderMeshTessellator, ExportOptions::default())
        .run(&objects);

    assert_eq!(report.exported, 0);
    assert!(report.scene.is_empty());
    assert!(report.scene.materials.is_empty());
    assert_eq!(report.skipped_count(), 1);

    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.object, "degenerate");
    assert_eq!(diagnostic.step, ExportStep::Validation);
    assert_eq!(diagnostic.kind, DiagnosticKind::InvalidGeometry);
}

#[test]
fn test_blank_material_names_stay_distinct() {
    let mut doc = Document::new(UnitSystem::Meters);
    let first = doc.add_material(MaterialRecord::new("", [10, 10, 10]));
    let second = doc.add_material(MaterialRecord::new("", [200, 200, 200]));

    let mesh = triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let objects = vec![
        SceneObject::new(RawGeometry::Mesh(mesh.clone())).with_attributes(from_object(first)),
        SceneObject::new(RawGeometry::Mesh(mesh)).with_attributes(from_object(second)),
    ];

    let report = ExportPipeline::new(&doc, &RenderMeshTessellator, ExportOptions::default())
        .run(&objects);

    let scene = &report.scene;
    assert_eq!(scene.nodes.len(), 2);
    assert_eq!(scene.materials.len(), 2);
    assert_ne!(scene.nodes[0].material, scene.nodes[1].material);
    assert_eq!(scene.material_of(&scene.nodes[0]).unwrap().name, "Material_0");
    assert_eq!(scene.material_of(&scene.nodes[1]).unwrap().name, "Material_1");
}

#[test]
fn test_shared_blank_material_gets_a_name_per_object() {
    let mut doc = Document::new(UnitSystem::Meters);
    let blank = doc.add_material(MaterialRecord::new("", [10, 10, 10]));

    let mesh = triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let objects = vec![
        SceneObject::new(RawGeometry::Mesh(mesh.clone())).with_attributes(from_object(blank)),
        SceneObject::new(RawGeometry::Mesh(mesh)).with_attributes(from_object(blank)),
    ];

    let report = ExportPipeline::new(&doc, &RenderMeshTessellator, ExportOptions::default())
        .run(&objects);

    let names: Vec<_> = report
        .scene
        .materials
        .iter()
        .map(|(_, d)| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["Material_0", "Material_1"]);
}

#[test]
fn test_layer_material_shared_between_nodes() {
    let mut doc = Document::new(UnitSystem::Meters);
    let steel = doc.add_material(MaterialRecord::new("Steel", [128, 128, 140]));
    let layer = doc.add_layer(Layer::new("Structure", steel));

    let attrs = ObjectAttributes {
        material_source: MaterialSource::FromLayer,
        layer_index: layer,
        ..ObjectAttributes::default()
    };
    let mesh = triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let objects = vec![
        SceneObject::new(RawGeometry::Mesh(mesh.clone())).with_attributes(attrs.clone()),
        SceneObject::new(RawGeometry::Mesh(mesh)).with_attributes(attrs),
    ];

    let report = ExportPipeline::new(&doc, &RenderMeshTessellator, ExportOptions::default())
        .run(&objects);

    let scene = &report.scene;
    assert_eq!(scene.nodes.len(), 2);
    assert_eq!(scene.materials.len(), 1);
    assert_eq!(scene.nodes[0].material, scene.nodes[1].material);
    assert!(scene.nodes.iter().all(|n| n.extras.is_none()));
}

#[test]
fn test_bad_object_does_not_stop_the_run() {
    let doc = Document::new(UnitSystem::Meters);

    let good = triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let mut bad = good.clone();
    bad.faces.clear();
    bad.add_triangle(0, 1, 7);

    let objects = vec![
        SceneObject::new(RawGeometry::Mesh(good.clone())).with_id("first"),
        SceneObject::new(RawGeometry::Mesh(bad)).with_id("broken"),
        SceneObject::new(RawGeometry::Mesh(good)).with_id("third"),
    ];

    let report = ExportPipeline::new(&doc, &RenderMeshTessellator, ExportOptions::default())
        .run(&objects);

    assert_eq!(report.exported, 2);
    let names: Vec<_> = report.scene.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["first", "third"]);

    let skipped: Vec<_> = report.skipped().map(|d| d.object.as_str()).collect();
    assert_eq!(skipped, vec!["broken"]);
    let broken = report.skipped().next().unwrap();
    assert_eq!(broken.step, ExportStep::Assembly);
    assert_eq!(broken.kind, DiagnosticKind::InvalidGeometry);

    // Both survivors fell back to the default material
    assert_eq!(report.scene.materials.len(), 1);
    assert_eq!(
        report.scene.material_of(&report.scene.nodes[0]).unwrap().name,
        "Default"
    );
}

#[test]
fn test_solid_piece_with_overflowing_face_index() {
    let doc = Document::new(UnitSystem::Meters);

    let first = triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let mut second = triangle([[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
    second.faces.clear();
    second.add_triangle(0, 1, u32::MAX - 1);

    let objects = vec![SceneObject::new(RawGeometry::Solid(Solid {
        surface_count: 1,
        area: 1.0,
        render_meshes: vec![first, second],
    }))];

    let report = ExportPipeline::new(&doc, &RenderMeshTessellator, ExportOptions::default())
        .run(&objects);

    assert_eq!(report.exported, 1);
    assert_eq!(report.scene.nodes.len(), 1);
    assert_eq!(report.scene.nodes[0].triangle_count(), 1);
}
