// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material resolution
//!
//! Follows the object's material source to a record in the document
//! material table:
//! - `FromObject`: the object's own material index
//! - `FromLayer`: the render material of the object's layer, if it has one
//! - `None`: nothing
//!
//! A missing layer or an index outside the table is not an error, the
//! caller just gets `None` and decides what to do with the object.

use crate::document::{Document, MaterialRecord};
use crate::object::{MaterialSource, ObjectAttributes};

/// Resolve the material record that applies to an object.
pub fn resolve_material<'a>(
    attributes: &ObjectAttributes,
    document: &'a Document,
) -> Option<&'a MaterialRecord> {
    match attributes.material_source {
        MaterialSource::FromObject => document.material(attributes.material_index),
        MaterialSource::FromLayer => {
            let layer = document.layer(attributes.layer_index)?;
            if layer.render_material_index >= 0 {
                document.material(layer.render_material_index)
            } else {
                None
            }
        }
        MaterialSource::None => None,
    }
}
