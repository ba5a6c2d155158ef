// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CAD-GLB Core
//!
//! Host document model consumed by the CAD to glTF exporter.
//!
//! ## Overview
//!
//! This crate describes what the exporter reads from a CAD host, read-only:
//!
//! - **Scene objects**: the selection, each holding a mesh or a solid
//! - **Document tables**: materials and layers, indexed by `i32`
//! - **Units**: the document length unit and its factor to meters
//! - **Attributes**: user strings attached to objects
//!
//! It also holds the two lookups that only depend on this model:
//! [`resolve_material`] and [`collect_user_attributes`].
//!
//! ## Quick Start
//!
//! ```rust
//! use cad_glb_core::{
//!     resolve_material, Document, MaterialRecord, MaterialSource, ObjectAttributes, UnitSystem,
//! };
//!
//! let mut doc = Document::new(UnitSystem::Millimeters);
//! let red = doc.add_material(MaterialRecord::new("Red", [255, 0, 0]));
//!
//! let attrs = ObjectAttributes {
//!     material_source: MaterialSource::FromObject,
//!     material_index: red,
//!     ..ObjectAttributes::default()
//! };
//! assert_eq!(resolve_material(&attrs, &doc).unwrap().name, "Red");
//! assert_eq!(doc.unit_system.meters_per_unit(), 0.001);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable (de)serialization of the model, used for document snapshots

pub mod attributes;
pub mod document;
pub mod error;
pub mod material;
pub mod mesh;
pub mod object;
pub mod units;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use attributes::{collect_user_attributes, UserAttribute};
pub use document::{Document, Layer, MaterialRecord};
pub use error::{Error, Result};
pub use material::resolve_material;
pub use mesh::{is_unset_texcoord, Face, MeshData, UNSET_TEXCOORD};
pub use object::{MaterialSource, ObjectAttributes, RawGeometry, SceneObject, Solid};
pub use units::UnitSystem;
