// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for scene assembly
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning one object into a mesh node
#[derive(Error, Debug)]
pub enum Error {
    #[error("mesh has no usable triangles after normalization ({faces} source faces)")]
    NoTriangles { faces: usize },
}
