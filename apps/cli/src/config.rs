// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exporter configuration loaded from environment variables.

use std::path::PathBuf;

use cad_glb_scene::MissingMaterialPolicy;

/// Exporter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Tessellation density passed to the mesher, 0..=1.
    pub mesh_density: f64,
    /// What to do with objects whose material cannot be resolved.
    pub missing_material: MissingMaterialPolicy,
    /// Directory for output when no explicit path is given.
    pub output_dir: Option<PathBuf>,
    /// Emit log lines as JSON instead of human-readable text.
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup; unparseable values fall
    /// back to their defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            mesh_density: var("CAD_GLB_MESH_DENSITY")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|d| d.is_finite())
                .map(|d| d.clamp(0.0, 1.0))
                .unwrap_or(0.0),
            missing_material: var("CAD_GLB_MISSING_MATERIAL")
                .and_then(|v| MissingMaterialPolicy::from_name(&v))
                .unwrap_or_default(),
            output_dir: var("CAD_GLB_OUTPUT_DIR")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            json_logs: var("CAD_GLB_LOG_FORMAT")
                .map(|v| v.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
