// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writing `.glb` / `.gltf` files
//!
//! Output goes to a hidden sibling temp file first and is renamed into
//! place once complete. A failed write removes its temp files and leaves
//! any existing file at the destination untouched.

use std::fs;
use std::path::{Path, PathBuf};

use cad_glb_scene::SceneGraph;

use crate::builder::{DroppedTexture, GltfBuilder};
use crate::error::Result;
use crate::format::ContainerFormat;

/// What a successful write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub format: ContainerFormat,
    /// Companion buffer file, `.gltf` output only
    pub bin_path: Option<PathBuf>,
    pub nodes: usize,
    pub materials: usize,
    /// Bytes written across all files
    pub bytes_written: u64,
    pub dropped_textures: Vec<DroppedTexture>,
}

/// Serialize `scene` to `path`, choosing the container from the extension.
///
/// An empty scene is still written as a valid document with no nodes.
pub fn write_scene(scene: &SceneGraph, path: &Path) -> Result<WriteSummary> {
    let format = ContainerFormat::from_path(path)?;
    let mut document = GltfBuilder::new().build(scene)?;

    let mut bin_path = None;
    let bytes_written = match format {
        ContainerFormat::Glb => {
            let glb = document.to_glb()?;
            write_atomic(path, &glb)?;
            glb.len() as u64
        }
        ContainerFormat::Gltf => {
            let mut written = 0;
            if !document.buffer.is_empty() {
                let bin = path.with_extension("bin");
                let uri = bin
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "buffer.bin".to_string());
                document.set_buffer_uri(uri);
                write_atomic(&bin, &document.buffer)?;
                written += document.buffer.len() as u64;
                bin_path = Some(bin);
            }
            let json = document.to_pretty_json()?;
            if let Err(e) = write_atomic(path, json.as_bytes()) {
                if let Some(bin) = &bin_path {
                    fs::remove_file(bin).ok();
                }
                return Err(e);
            }
            written + json.len() as u64
        }
    };

    tracing::info!(
        path = %path.display(),
        format = %format,
        nodes = scene.nodes.len(),
        materials = scene.materials.len(),
        bytes = bytes_written,
        dropped_textures = document.dropped_textures.len(),
        "Wrote glTF container"
    );

    Ok(WriteSummary {
        path: path.to_path_buf(),
        format,
        bin_path,
        nodes: scene.nodes.len(),
        materials: scene.materials.len(),
        bytes_written,
        dropped_textures: document.dropped_textures,
    })
}

/// Sibling temp path: `dir/.name.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let temp = temp_path(path);
    let result = fs::write(&temp, data).and_then(|()| fs::rename(&temp, path));
    if result.is_err() {
        fs::remove_file(&temp).ok();
    }
    Ok(result?)
}
