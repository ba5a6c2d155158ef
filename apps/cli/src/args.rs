// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line parsing. Flags override the environment configuration.

use std::path::PathBuf;

use cad_glb_scene::MissingMaterialPolicy;

use crate::config::Config;
use crate::error::CliError;

pub const USAGE: &str = "\
Usage:
  cad-glb <snapshot.json> [options]

Options:
  -o, --output <path>          Output file (.glb or .gltf)
      --density <0..1>         Tessellation density
      --missing-material <p>   default | skip
      --dry-run                Run the export without writing a file
  -h, --help                   Show this help

Environment:
  CAD_GLB_MESH_DENSITY, CAD_GLB_MISSING_MATERIAL, CAD_GLB_OUTPUT_DIR,
  CAD_GLB_LOG_FORMAT=json, RUST_LOG";

/// A parsed export request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub mesh_density: f64,
    pub missing_material: MissingMaterialPolicy,
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Export(ExportArgs),
}

/// Parse `args` (without the program name) on top of `config`.
pub fn parse(args: &[String], config: &Config) -> Result<Command, CliError> {
    let mut input = None;
    let mut export = ExportArgs {
        input: PathBuf::new(),
        output: None,
        mesh_density: config.mesh_density,
        missing_material: config.missing_material,
        output_dir: config.output_dir.clone(),
        dry_run: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-o" | "--output" => {
                export.output = Some(PathBuf::from(value(&mut iter, arg)?));
            }
            "--density" => {
                let raw = value(&mut iter, arg)?;
                export.mesh_density = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|d| (0.0..=1.0).contains(d))
                    .ok_or_else(|| invalid(arg, raw))?;
            }
            "--missing-material" => {
                let raw = value(&mut iter, arg)?;
                export.missing_material =
                    MissingMaterialPolicy::from_name(raw).ok_or_else(|| invalid(arg, raw))?;
            }
            "--dry-run" => export.dry_run = true,
            other if other.starts_with('-') => {
                return Err(CliError::UnknownOption(other.to_string()));
            }
            path => {
                if input.is_some() {
                    return Err(CliError::UnknownOption(path.to_string()));
                }
                input = Some(PathBuf::from(path));
            }
        }
    }

    export.input = input.ok_or(CliError::MissingInput)?;
    Ok(Command::Export(export))
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, option: &str) -> Result<&'a str, CliError> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingValue(option.to_string()))
}

fn invalid(option: &str, value: &str) -> CliError {
    CliError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
    }
}
