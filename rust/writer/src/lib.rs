// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CAD-GLB Writer
//!
//! Serializes a [`cad_glb_scene::SceneGraph`] to glTF 2.0.
//!
//! - `.glb`: one binary file with the buffer embedded
//! - `.gltf`: indented JSON plus a `<stem>.bin` buffer next to it
//!
//! Base-color textures are embedded in the buffer. Object metadata is
//! written as the `extras` object of each glTF mesh.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use cad_glb_scene::SceneGraph;
//! use cad_glb_writer::write_scene;
//!
//! let summary = write_scene(&SceneGraph::default(), Path::new("empty.glb"))?;
//! println!("{} bytes", summary.bytes_written);
//! # Ok::<(), cad_glb_writer::Error>(())
//! ```

pub mod builder;
pub mod container;
pub mod error;
pub mod format;
pub mod save;

pub use builder::{BuiltDocument, DroppedTexture, GltfBuilder};
pub use container::{write_scene, WriteSummary};
pub use error::{Error, Result};
pub use format::ContainerFormat;
pub use save::{
    default_file_name, default_save_dir, default_save_path, save_scene, FixedPath, SaveOutcome,
    SaveTarget,
};
