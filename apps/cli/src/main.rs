// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CAD-GLB command line exporter.
//!
//! Reads a JSON snapshot of a CAD document and its selected objects,
//! converts the selection to a glTF scene and writes `.glb` or `.gltf`.
//!
//! Usage:
//!   cad-glb <snapshot.json> [options]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cad_glb_geometry::{MeshingQuality, RenderMeshTessellator};
use cad_glb_scene::{ExportOptions, ExportPipeline};
use cad_glb_writer::{
    default_file_name, default_save_dir, save_scene, FixedPath, SaveOutcome, SaveTarget,
};

mod args;
mod config;
mod error;
mod snapshot;

use args::{Command, ExportArgs, USAGE};
use config::Config;
use error::CliError;
use snapshot::Snapshot;

/// Declines every save, so the export runs without touching the disk.
struct DryRun;

impl SaveTarget for DryRun {
    fn choose_path(&self, _suggested: &Path) -> Option<PathBuf> {
        None
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();
    init_tracing(&config);

    let argv: Vec<String> = std::env::args().skip(1).collect();
    match run(&argv, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<CliError>() {
                Some(cli) => {
                    if cli.is_usage() {
                        eprintln!();
                        eprintln!("{}", USAGE);
                    }
                    ExitCode::from(cli.exit_code())
                }
                None => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(argv: &[String], config: &Config) -> anyhow::Result<()> {
    let export = match args::parse(argv, config)? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Export(export) => export,
    };

    let text = fs::read_to_string(&export.input)
        .with_context(|| format!("Failed to read {}", export.input.display()))?;
    let snapshot = Snapshot::from_json(&text)?;

    tracing::info!(
        input = %export.input.display(),
        objects = snapshot.objects.len(),
        materials = snapshot.document.materials.len(),
        layers = snapshot.document.layers.len(),
        "Loaded snapshot"
    );

    let options = ExportOptions {
        meshing_quality: MeshingQuality::new(export.mesh_density),
        missing_material: export.missing_material,
        ..ExportOptions::default()
    };
    let report = ExportPipeline::new(&snapshot.document, &RenderMeshTessellator, options)
        .run(&snapshot.objects);

    for diagnostic in &report.diagnostics {
        eprintln!("  {}", diagnostic);
    }
    println!(
        "Exported {} of {} objects ({} skipped), {} materials",
        report.exported,
        snapshot.objects.len(),
        report.skipped_count(),
        report.scene.materials.len()
    );

    let default_path = default_output_path(&export, snapshot.document.path.as_deref());
    let outcome = if export.dry_run {
        save_scene(&report.scene, &DryRun, &default_path)
    } else {
        let path = export.output.clone().unwrap_or_else(|| default_path.clone());
        save_scene(&report.scene, &FixedPath(path), &default_path)
    }
    .map_err(CliError::from)?;

    match outcome {
        SaveOutcome::Saved(summary) => {
            for dropped in &summary.dropped_textures {
                eprintln!(
                    "  texture {} dropped from {}: {}",
                    dropped.path.display(),
                    dropped.material,
                    dropped.reason
                );
            }
            println!(
                "Wrote {} ({} bytes)",
                summary.path.display(),
                summary.bytes_written
            );
            if let Some(bin) = &summary.bin_path {
                println!("Wrote {}", bin.display());
            }
        }
        SaveOutcome::Cancelled => println!("Dry run, nothing written"),
    }
    Ok(())
}

/// `<output dir>/<document stem>.glb`
fn default_output_path(export: &ExportArgs, document_path: Option<&Path>) -> PathBuf {
    let dir = export.output_dir.clone().unwrap_or_else(default_save_dir);
    dir.join(default_file_name(document_path))
}
