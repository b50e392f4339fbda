// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with collecting arguments.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgsError {
    /// An empty (or null) path was supplied.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot add gpubox file '{filename}'; the maximum of {capacity} gpubox files has been reached")]
    CapacityExceeded { filename: String, capacity: usize },

    #[error("A metafits file has already been set ('{existing}'); refusing to replace it with '{new}'")]
    MetafitsAlreadySet { existing: String, new: String },
}
