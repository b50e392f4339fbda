// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Collect the metafits and gpubox files of a Murchison Widefield Array (MWA)
observation, check them against each other and summarise the observation.
 */

pub mod args;
pub mod cli;
pub mod coarse_channel;
mod constants;
pub mod errors;
mod ffi;
pub mod fits_read;
pub mod gpubox_files;
pub mod metafits;
pub mod obs_context;
#[cfg(test)]
pub(crate) mod test_common;
mod types;

pub use args::{ArgsError, MwalibArgs};
pub use coarse_channel::CoarseChannel;
pub use constants::{MWALIB_ERROR_MESSAGE_LEN, MWALIB_MAX_GPUBOX_FILENAMES};
pub use errors::MwalibError;
pub use fits_read::{FitsError, FitsHeader};
pub use gpubox_files::GpuboxError;
pub use metafits::{MetafitsContext, MetafitsError};
pub use obs_context::ObservationContext;
pub use types::MWAVersion;
