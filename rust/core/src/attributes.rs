// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-defined key/value metadata attached to scene objects.

use rustc_hash::FxHashSet;

use crate::object::ObjectAttributes;

/// A single user string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserAttribute {
    pub key: String,
    pub value: String,
}

impl UserAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Enumerate the user strings of an object in host order.
///
/// Entries with an empty key are ignored and a repeated key keeps its first
/// value, so the returned keys are unique.
pub fn collect_user_attributes(attributes: &ObjectAttributes) -> Vec<UserAttribute> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut collected = Vec::with_capacity(attributes.user_strings.len());
    for (key, value) in &attributes.user_strings {
        if key.is_empty() || !seen.insert(key.as_str()) {
            continue;
        }
        collected.push(UserAttribute::new(key.as_str(), value.as_str()));
    }
    collected
}
