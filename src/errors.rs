// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with all aspects of mwalib.
 */

use thiserror::Error;

use crate::{ArgsError, FitsError, GpuboxError, MetafitsError};

#[derive(Error, Debug)]
pub enum MwalibError {
    /// A bad argument was given while collecting files.
    #[error(transparent)]
    Args(#[from] ArgsError),

    #[error("No metafits file was supplied")]
    MissingMetafits,

    /// A file couldn't be read, or isn't a usable FITS file.
    #[error(transparent)]
    Fits(#[from] FitsError),

    /// The metafits contents don't describe a sensible observation.
    #[error(transparent)]
    Metafits(#[from] MetafitsError),

    /// The gpubox files don't agree with each other or with the metafits.
    #[error(transparent)]
    Gpubox(#[from] GpuboxError),
}
