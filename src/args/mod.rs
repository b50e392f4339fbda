// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The set of files handed to mwalib to describe an observation.

mod error;

pub use error::ArgsError;

use std::path::{Path, PathBuf};

use log::trace;

use crate::constants::MWALIB_MAX_GPUBOX_FILENAMES;

/// A metafits file and the gpubox files that go with it.
///
/// The metafits file can only be set once. Gpubox files are kept in the order
/// they were added, and no more than the capacity of the struct can be added.
#[derive(Debug, Clone)]
pub struct MwalibArgs {
    metafits_filename: Option<PathBuf>,
    gpubox_filenames: Vec<PathBuf>,
    capacity: usize,
}

impl Default for MwalibArgs {
    fn default() -> Self {
        Self::new()
    }
}

impl MwalibArgs {
    /// Create an empty [`MwalibArgs`] that accepts up to
    /// [`MWALIB_MAX_GPUBOX_FILENAMES`] gpubox files.
    pub fn new() -> Self {
        Self::with_capacity(MWALIB_MAX_GPUBOX_FILENAMES)
    }

    /// Create an empty [`MwalibArgs`] that accepts up to `capacity` gpubox
    /// files.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            metafits_filename: None,
            gpubox_filenames: Vec::with_capacity(capacity.min(MWALIB_MAX_GPUBOX_FILENAMES)),
            capacity,
        }
    }

    /// Set the metafits file. Fails if `filename` is empty, or if a metafits
    /// file has already been set; in that case the existing value is kept.
    pub fn set_metafits_filename<P: AsRef<Path>>(&mut self, filename: P) -> Result<(), ArgsError> {
        let filename = filename.as_ref();
        if filename.as_os_str().is_empty() {
            return Err(ArgsError::InvalidArgument(
                "The metafits filename is empty".to_string(),
            ));
        }
        if let Some(existing) = &self.metafits_filename {
            return Err(ArgsError::MetafitsAlreadySet {
                existing: existing.display().to_string(),
                new: filename.display().to_string(),
            });
        }

        trace!("Setting metafits file {}", filename.display());
        self.metafits_filename = Some(filename.to_path_buf());
        Ok(())
    }

    /// Append a gpubox file. Fails if `filename` is empty or the capacity has
    /// been reached; the existing gpubox files are untouched on failure.
    pub fn add_gpubox_filename<P: AsRef<Path>>(&mut self, filename: P) -> Result<(), ArgsError> {
        let filename = filename.as_ref();
        if filename.as_os_str().is_empty() {
            return Err(ArgsError::InvalidArgument(
                "A gpubox filename is empty".to_string(),
            ));
        }
        if self.gpubox_filenames.len() >= self.capacity {
            return Err(ArgsError::CapacityExceeded {
                filename: filename.display().to_string(),
                capacity: self.capacity,
            });
        }

        trace!(
            "Adding gpubox file {} ({} of at most {})",
            filename.display(),
            self.gpubox_filenames.len() + 1,
            self.capacity
        );
        self.gpubox_filenames.push(filename.to_path_buf());
        Ok(())
    }

    pub fn metafits_filename(&self) -> Option<&Path> {
        self.metafits_filename.as_deref()
    }

    pub fn gpubox_filenames(&self) -> &[PathBuf] {
        &self.gpubox_filenames
    }

    /// The maximum number of gpubox files this struct accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
