// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! glTF document construction
//!
//! [`GltfBuilder`] turns a [`SceneGraph`] into a glTF JSON root plus one
//! binary buffer. Every mesh node becomes one glTF mesh with a single
//! triangle primitive and one root node referencing it. Buffer views are
//! 4-byte aligned inside the shared buffer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gltf::json as gj;
use rustc_hash::FxHashMap;

use cad_glb_scene::{MaterialDescriptor, MeshNode, SceneGraph};

use crate::error::{Error, Result};

const GENERATOR: &str = concat!("cad-glb ", env!("CARGO_PKG_VERSION"));

/// A base-color texture left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedTexture {
    pub material: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Accumulates the glTF root and its binary payload.
pub struct GltfBuilder {
    root: gj::Root,
    buffer: Vec<u8>,
    images: FxHashMap<PathBuf, u32>,
    dropped: Vec<DroppedTexture>,
}

impl Default for GltfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self {
            root: gj::Root {
                asset: gj::Asset {
                    generator: Some(GENERATOR.into()),
                    version: "2.0".into(),
                    ..Default::default()
                },
                ..Default::default()
            },
            buffer: Vec::new(),
            images: FxHashMap::default(),
            dropped: Vec::new(),
        }
    }

    /// Build the whole document for `scene`.
    ///
    /// Materials keep their library order so a node's `MaterialId` is also
    /// its glTF material index.
    pub fn build(mut self, scene: &SceneGraph) -> Result<BuiltDocument> {
        for (_, descriptor) in scene.materials.iter() {
            self.push_material(descriptor);
        }

        let mut node_indices = Vec::with_capacity(scene.nodes.len());
        for node in &scene.nodes {
            let mesh = self.push_mesh(node)?;
            let index = self.root.nodes.len() as u32;
            self.root.nodes.push(gj::Node {
                mesh: Some(gj::Index::new(mesh)),
                name: Some(node.name.clone()),
                ..gj::Node::default()
            });
            node_indices.push(gj::Index::new(index));
        }

        self.root.scenes.push(gj::Scene {
            name: None,
            nodes: node_indices,
            extensions: None,
            extras: gj::Extras::default(),
        });
        self.root.scene = Some(gj::Index::new(0));

        if self.buffer.len() > u32::MAX as usize {
            return Err(Error::TooLarge(self.buffer.len()));
        }
        if !self.buffer.is_empty() {
            self.root.buffers.push(gj::Buffer {
                byte_length: gj::validation::USize64(self.buffer.len() as u64),
                name: None,
                uri: None,
                extensions: None,
                extras: gj::Extras::default(),
            });
        }

        Ok(BuiltDocument {
            root: self.root,
            buffer: self.buffer,
            dropped_textures: self.dropped,
        })
    }

    fn push_material(&mut self, descriptor: &MaterialDescriptor) {
        let base_color_texture = descriptor
            .base_color_texture
            .as_deref()
            .and_then(|path| self.texture_for(&descriptor.name, path))
            .map(|index| gj::texture::Info {
                index: gj::Index::new(index),
                tex_coord: 0,
                extensions: None,
                extras: gj::Extras::default(),
            });

        let alpha_mode = if descriptor.is_transparent() {
            gj::material::AlphaMode::Blend
        } else {
            gj::material::AlphaMode::Opaque
        };

        self.root.materials.push(gj::Material {
            name: Some(descriptor.name.clone()),
            alpha_cutoff: None,
            alpha_mode: gj::validation::Checked::Valid(alpha_mode),
            double_sided: descriptor.double_sided,
            pbr_metallic_roughness: gj::material::PbrMetallicRoughness {
                base_color_factor: gj::material::PbrBaseColorFactor(descriptor.base_color),
                base_color_texture,
                metallic_factor: gj::material::StrengthFactor(1.0),
                roughness_factor: gj::material::StrengthFactor(1.0),
                metallic_roughness_texture: None,
                extensions: None,
                extras: gj::Extras::default(),
            },
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: gj::material::EmissiveFactor([0.0, 0.0, 0.0]),
            extensions: None,
            extras: gj::Extras::default(),
        });
    }

    /// Texture index for an image file, embedding it on first use.
    ///
    /// Unreadable files and formats other than PNG/JPEG are recorded as
    /// dropped and give `None`.
    fn texture_for(&mut self, material: &str, path: &Path) -> Option<u32> {
        if let Some(&texture) = self.images.get(path) {
            return Some(texture);
        }

        let (bytes, mime) = match load_image(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(material, path = %path.display(), error = %e, "Dropping texture");
                self.dropped.push(DroppedTexture {
                    material: material.to_string(),
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return None;
            }
        };

        let view = self.push_buffer_view(&bytes, None);
        let image = self.root.images.len() as u32;
        self.root.images.push(gj::Image {
            buffer_view: Some(gj::Index::new(view)),
            mime_type: Some(gj::image::MimeType(mime.into())),
            name: path.file_name().and_then(|n| n.to_str()).map(String::from),
            uri: None,
            extensions: None,
            extras: gj::Extras::default(),
        });

        let texture = self.root.textures.len() as u32;
        self.root.textures.push(gj::Texture {
            name: None,
            sampler: None,
            source: gj::Index::new(image),
            extensions: None,
            extras: gj::Extras::default(),
        });
        self.images.insert(path.to_path_buf(), texture);
        Some(texture)
    }

    fn push_mesh(&mut self, node: &MeshNode) -> Result<u32> {
        let count = node.vertex_count();

        let mut positions = Vec::with_capacity(count * 12);
        let mut normals = Vec::with_capacity(count * 12);
        let mut uvs = Vec::with_capacity(count * 8);
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for vertex in &node.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex.position[axis]);
                max[axis] = max[axis].max(vertex.position[axis]);
            }
            extend_f32(&mut positions, &vertex.position);
            extend_f32(&mut normals, &vertex.normal);
            extend_f32(&mut uvs, &vertex.uv);
        }

        let mut indices = Vec::with_capacity(node.indices.len() * 4);
        for index in &node.indices {
            indices.extend_from_slice(&index.to_le_bytes());
        }

        let mut attributes = BTreeMap::new();
        let view = self.push_buffer_view(&positions, Some(gj::buffer::Target::ArrayBuffer));
        let accessor = self.push_accessor(
            view,
            count,
            gj::accessor::ComponentType::F32,
            gj::accessor::Type::Vec3,
            Some(gj::Value::from(min.to_vec())),
            Some(gj::Value::from(max.to_vec())),
        );
        attributes.insert(
            gj::validation::Checked::Valid(gj::mesh::Semantic::Positions),
            gj::Index::new(accessor),
        );

        let view = self.push_buffer_view(&normals, Some(gj::buffer::Target::ArrayBuffer));
        let accessor = self.push_accessor(
            view,
            count,
            gj::accessor::ComponentType::F32,
            gj::accessor::Type::Vec3,
            None,
            None,
        );
        attributes.insert(
            gj::validation::Checked::Valid(gj::mesh::Semantic::Normals),
            gj::Index::new(accessor),
        );

        let view = self.push_buffer_view(&uvs, Some(gj::buffer::Target::ArrayBuffer));
        let accessor = self.push_accessor(
            view,
            count,
            gj::accessor::ComponentType::F32,
            gj::accessor::Type::Vec2,
            None,
            None,
        );
        attributes.insert(
            gj::validation::Checked::Valid(gj::mesh::Semantic::TexCoords(0)),
            gj::Index::new(accessor),
        );

        let view = self.push_buffer_view(&indices, Some(gj::buffer::Target::ElementArrayBuffer));
        let index_accessor = self.push_accessor(
            view,
            node.indices.len(),
            gj::accessor::ComponentType::U32,
            gj::accessor::Type::Scalar,
            None,
            None,
        );

        let extras = match &node.extras {
            Some(extras) => Some(serde_json::value::to_raw_value(extras)?),
            None => None,
        };

        let mesh = self.root.meshes.len() as u32;
        self.root.meshes.push(gj::Mesh {
            name: Some(node.name.clone()),
            primitives: vec![gj::mesh::Primitive {
                attributes,
                extensions: None,
                extras: gj::Extras::default(),
                indices: Some(gj::Index::new(index_accessor)),
                material: Some(gj::Index::new(node.material.index() as u32)),
                mode: gj::validation::Checked::Valid(gj::mesh::Mode::Triangles),
                targets: None,
            }],
            weights: None,
            extensions: None,
            extras,
        });
        Ok(mesh)
    }

    fn align_buffer(&mut self) {
        let padding = (4 - (self.buffer.len() % 4)) % 4;
        self.buffer.resize(self.buffer.len() + padding, 0);
    }

    fn push_buffer_view(&mut self, data: &[u8], target: Option<gj::buffer::Target>) -> u32 {
        self.align_buffer();
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(data);

        let view = self.root.buffer_views.len() as u32;
        self.root.buffer_views.push(gj::buffer::View {
            buffer: gj::Index::new(0),
            byte_offset: Some(gj::validation::USize64(offset as u64)),
            byte_length: gj::validation::USize64(data.len() as u64),
            byte_stride: None,
            target: target.map(gj::validation::Checked::Valid),
            name: None,
            extensions: None,
            extras: gj::Extras::default(),
        });
        view
    }

    fn push_accessor(
        &mut self,
        buffer_view: u32,
        count: usize,
        component_type: gj::accessor::ComponentType,
        type_: gj::accessor::Type,
        min: Option<gj::Value>,
        max: Option<gj::Value>,
    ) -> u32 {
        let accessor = self.root.accessors.len() as u32;
        self.root.accessors.push(gj::Accessor {
            buffer_view: Some(gj::Index::new(buffer_view)),
            byte_offset: Some(gj::validation::USize64(0)),
            count: gj::validation::USize64(count as u64),
            component_type: gj::validation::Checked::Valid(gj::accessor::GenericComponentType(
                component_type,
            )),
            type_: gj::validation::Checked::Valid(type_),
            min,
            max,
            normalized: false,
            name: None,
            sparse: None,
            extensions: None,
            extras: gj::Extras::default(),
        });
        accessor
    }
}

/// A finished glTF root and the bytes of its single buffer.
pub struct BuiltDocument {
    pub root: gj::Root,
    pub buffer: Vec<u8>,
    pub dropped_textures: Vec<DroppedTexture>,
}

impl BuiltDocument {
    /// Point the buffer at an external file, for `.gltf` output
    pub fn set_buffer_uri(&mut self, uri: impl Into<String>) {
        if let Some(buffer) = self.root.buffers.first_mut() {
            buffer.uri = Some(uri.into());
        }
    }

    /// Single-file binary container
    pub fn to_glb(&self) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(&self.root)?;

        let json_pad = (4 - (json.len() % 4)) % 4;
        let json_chunk_len = json.len() + json_pad;
        let bin_pad = (4 - (self.buffer.len() % 4)) % 4;
        let bin_chunk_len = self.buffer.len() + bin_pad;

        let has_bin = !self.buffer.is_empty();
        let total = 12 + 8 + json_chunk_len + if has_bin { 8 + bin_chunk_len } else { 0 };
        if total > u32::MAX as usize {
            return Err(Error::TooLarge(total));
        }

        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(&0x4654_6C67u32.to_le_bytes()); // "glTF"
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());

        glb.extend_from_slice(&(json_chunk_len as u32).to_le_bytes());
        glb.extend_from_slice(&0x4E4F_534Au32.to_le_bytes()); // "JSON"
        glb.extend_from_slice(&json);
        glb.resize(glb.len() + json_pad, b' ');

        if has_bin {
            glb.extend_from_slice(&(bin_chunk_len as u32).to_le_bytes());
            glb.extend_from_slice(&0x004E_4942u32.to_le_bytes()); // "BIN\0"
            glb.extend_from_slice(&self.buffer);
            glb.resize(glb.len() + bin_pad, 0);
        }

        Ok(glb)
    }

    /// Indented JSON for `.gltf`
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

#[inline]
fn extend_f32(out: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Read an image file and return its bytes with the glTF MIME type.
fn load_image(path: &Path) -> Result<(Vec<u8>, &'static str)> {
    let bytes = std::fs::read(path)?;
    let mime = match image::guess_format(&bytes) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        _ => {
            return Err(Error::UnsupportedImageFormat {
                path: path.to_path_buf(),
            })
        }
    };
    Ok((bytes, mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scene_has_no_buffer() {
        let built = GltfBuilder::new().build(&SceneGraph::default()).unwrap();
        assert!(built.buffer.is_empty());
        assert!(built.root.buffers.is_empty());
        assert_eq!(built.root.scenes.len(), 1);
        assert!(built.root.scenes[0].nodes.is_empty());

        let glb = built.to_glb().unwrap();
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(glb.len() % 4, 0);
        assert_eq!(u32::from_le_bytes([glb[8], glb[9], glb[10], glb[11]]) as usize, glb.len());
    }

    #[test]
    fn test_missing_image_reported() {
        let mut builder = GltfBuilder::new();
        assert!(builder
            .texture_for("Wood", Path::new("/no/such/texture.png"))
            .is_none());
        assert_eq!(builder.dropped.len(), 1);
        assert_eq!(builder.dropped[0].material, "Wood");
        assert!(builder.root.images.is_empty());
    }
}
