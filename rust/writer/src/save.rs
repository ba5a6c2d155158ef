// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Choosing where an export goes
//!
//! Interactive hosts implement [`SaveTarget`] with a native save dialog;
//! batch callers use [`FixedPath`].

use std::path::{Path, PathBuf};

use cad_glb_scene::SceneGraph;

use crate::container::{write_scene, WriteSummary};
use crate::error::Result;

const UNTITLED: &str = "untitled";

/// Something that decides the output path for a save.
pub trait SaveTarget {
    /// Final path to write, or `None` when the user cancels.
    fn choose_path(&self, suggested: &Path) -> Option<PathBuf>;
}

/// Always saves to the same path, ignoring the suggestion.
#[derive(Debug, Clone)]
pub struct FixedPath(pub PathBuf);

impl SaveTarget for FixedPath {
    fn choose_path(&self, _suggested: &Path) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Result of [`save_scene`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(WriteSummary),
    /// The target declined; nothing was written
    Cancelled,
}

/// Ask `target` for a path and write the scene there.
pub fn save_scene(
    scene: &SceneGraph,
    target: &dyn SaveTarget,
    default_path: &Path,
) -> Result<SaveOutcome> {
    let Some(path) = target.choose_path(default_path) else {
        tracing::info!("Save cancelled");
        return Ok(SaveOutcome::Cancelled);
    };
    write_scene(scene, &path).map(SaveOutcome::Saved)
}

/// `<document stem>.glb`, or `untitled.glb` for an unsaved document.
pub fn default_file_name(document_path: Option<&Path>) -> String {
    let stem = document_path
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(UNTITLED);
    format!("{}.glb", stem)
}

/// The user's desktop, falling back to the current directory.
pub fn default_save_dir() -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    if let Some(home) = home {
        let desktop = PathBuf::from(home).join("Desktop");
        if desktop.is_dir() {
            return desktop;
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Default save dir joined with the default file name.
pub fn default_save_path(document_path: Option<&Path>) -> PathBuf {
    default_save_dir().join(default_file_name(document_path))
}
