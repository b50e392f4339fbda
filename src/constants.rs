// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.
 */

/// The maximum number of gpubox files that can be given to [`crate::MwalibArgs`]
/// by default.
pub const MWALIB_MAX_GPUBOX_FILENAMES: usize = 256;

/// The size of the error message buffers that callers of the C interface are
/// expected to supply (including the trailing null).
pub const MWALIB_ERROR_MESSAGE_LEN: usize = 1024;

/// The value of CORR_VER in a legacy (post-2014) gpubox file.
pub(crate) const LEGACY_CORR_VER: u8 = 1;

/// The value of CORR_VER in an MWAX gpubox file.
pub(crate) const MWAX_CORR_VER: u8 = 2;

/// Receiver channels above this number are in reverse order in the legacy
/// correlator.
pub(crate) const LEGACY_REVERSE_CHAN_THRESHOLD: u32 = 128;

/// The largest receiver channel number the MWA can use.
pub(crate) const MAX_RECEIVER_CHAN: u32 = 255;
