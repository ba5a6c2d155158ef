// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material deduplication
//!
//! A [`MaterialLibrary`] lives for one export run and maps a material key to
//! a single [`MaterialDescriptor`]. The key is the record's name, or
//! `Material_<n>` for an empty name, where `n` is the number of descriptors
//! created so far.
//!
//! Identity is the key, not the color: two records named "Steel" share one
//! descriptor even if their colors differ, and the first one seen decides
//! what it looks like. Two empty-named records get separate descriptors
//! unless the generated name collides with an existing one.

use rustc_hash::FxHashMap;

use cad_glb_core::MaterialRecord;

use crate::graph::{MaterialDescriptor, MaterialId};

/// Descriptors in creation order plus a key index.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    descriptors: Vec<MaterialDescriptor>,
    by_key: FxHashMap<String, MaterialId>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key a record dedups under, given the current library size
    fn key_for(&self, record: &MaterialRecord) -> String {
        if record.name.is_empty() {
            format!("Material_{}", self.descriptors.len())
        } else {
            record.name.clone()
        }
    }

    /// Return the descriptor for `record`, building it on first sight.
    pub fn get_or_insert(&mut self, record: &MaterialRecord) -> MaterialId {
        let key = self.key_for(record);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }

        let id = MaterialId(self.descriptors.len() as u32);
        let descriptor = build_descriptor(key.clone(), record);
        tracing::debug!(
            material = %descriptor.name,
            textured = descriptor.base_color_texture.is_some(),
            "Created material"
        );
        self.descriptors.push(descriptor);
        self.by_key.insert(key, id);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialDescriptor> {
        self.descriptors.get(id.index())
    }

    /// Look up a material by its key
    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.by_key.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in creation order
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &MaterialDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (MaterialId(i as u32), d))
    }
}

/// Convert a document material into an output descriptor.
///
/// The texture path is kept only if the file exists right now; a dangling
/// path silently exports an untextured material.
fn build_descriptor(name: String, record: &MaterialRecord) -> MaterialDescriptor {
    let [r, g, b] = record.diffuse;
    let alpha = (1.0 - record.transparency.clamp(0.0, 1.0)) as f32;

    let base_color_texture = record
        .texture_path
        .as_ref()
        .filter(|path| !path.as_os_str().is_empty() && path.is_file())
        .cloned();

    MaterialDescriptor {
        name,
        base_color: [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, alpha],
        base_color_texture,
        double_sided: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_same_name_same_descriptor() {
        let mut lib = MaterialLibrary::new();
        let a = lib.get_or_insert(&MaterialRecord::new("Red", [255, 0, 0]));
        let b = lib.get_or_insert(&MaterialRecord::new("Red", [255, 0, 0]));
        assert_eq!(a, b);
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn test_first_seen_wins() {
        let mut lib = MaterialLibrary::new();
        let a = lib.get_or_insert(&MaterialRecord::new("Steel", [100, 100, 100]));
        let b = lib.get_or_insert(&MaterialRecord::new("Steel", [255, 0, 0]).with_transparency(0.5));
        assert_eq!(a, b);
        let d = lib.get(a).unwrap();
        assert_eq!(d.base_color, [100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0, 1.0]);
    }

    #[test]
    fn test_same_color_different_names_not_merged() {
        let mut lib = MaterialLibrary::new();
        let a = lib.get_or_insert(&MaterialRecord::new("A", [10, 20, 30]));
        let b = lib.get_or_insert(&MaterialRecord::new("B", [10, 20, 30]));
        assert_ne!(a, b);
        assert_eq!(lib.len(), 2);
    }

    #[test]
    fn test_blank_names_get_generated_keys() {
        let mut lib = MaterialLibrary::new();
        let a = lib.get_or_insert(&MaterialRecord::new("", [0, 0, 0]));
        let b = lib.get_or_insert(&MaterialRecord::new("", [0, 0, 0]));
        assert_ne!(a, b);
        assert_eq!(lib.get(a).unwrap().name, "Material_0");
        assert_eq!(lib.get(b).unwrap().name, "Material_1");
    }

    #[test]
    fn test_whitespace_name_is_its_own_key() {
        let mut lib = MaterialLibrary::new();
        let a = lib.get_or_insert(&MaterialRecord::new("  ", [0, 0, 0]));
        let b = lib.get_or_insert(&MaterialRecord::new("  ", [9, 9, 9]));
        assert_eq!(a, b);
        assert_eq!(lib.get(a).unwrap().name, "  ");
    }

    #[test]
    fn test_generated_key_counts_named_materials() {
        let mut lib = MaterialLibrary::new();
        lib.get_or_insert(&MaterialRecord::new("Red", [255, 0, 0]));
        let blank = lib.get_or_insert(&MaterialRecord::new("", [0, 0, 0]));
        assert_eq!(lib.get(blank).unwrap().name, "Material_1");
    }

    #[test]
    fn test_generated_key_collision_merges() {
        let mut lib = MaterialLibrary::new();
        let named = lib.get_or_insert(&MaterialRecord::new("Material_1", [1, 2, 3]));
        let blank = lib.get_or_insert(&MaterialRecord::new("", [9, 9, 9]));
        assert_eq!(named, blank);
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn test_base_color_and_alpha() {
        let mut lib = MaterialLibrary::new();
        let id = lib.get_or_insert(&MaterialRecord::new("Glass", [0, 51, 255]).with_transparency(0.25));
        let d = lib.get(id).unwrap();
        assert_eq!(d.base_color, [0.0, 0.2, 1.0, 0.75]);
        assert!(d.is_transparent());
        assert!(d.double_sided);
    }

    #[test]
    fn test_missing_texture_is_dropped() {
        let mut lib = MaterialLibrary::new();
        let record = MaterialRecord::new("Wood", [200, 150, 100])
            .with_texture(PathBuf::from("/definitely/not/here/wood.png"));
        let id = lib.get_or_insert(&record);
        assert!(lib.get(id).unwrap().base_color_texture.is_none());
    }

    #[test]
    fn test_existing_texture_is_kept() {
        let path = std::env::temp_dir().join(format!("cad-glb-texture-{}.png", std::process::id()));
        std::fs::write(&path, b"not really a png").unwrap();

        let mut lib = MaterialLibrary::new();
        let id = lib.get_or_insert(&MaterialRecord::new("Brick", [180, 60, 40]).with_texture(&path));
        assert_eq!(lib.get(id).unwrap().base_color_texture.as_deref(), Some(path.as_path()));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_find_and_iter() {
        let mut lib = MaterialLibrary::new();
        lib.get_or_insert(&MaterialRecord::new("A", [0, 0, 0]));
        lib.get_or_insert(&MaterialRecord::new("B", [0, 0, 0]));
        assert_eq!(lib.find("B").map(|id| id.index()), Some(1));
        assert!(lib.find("C").is_none());
        let names: Vec<_> = lib.iter().map(|(_, d)| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
