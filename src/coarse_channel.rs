// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Coarse channels and how they map onto gpubox files.
 */

use std::fmt;

use crate::{constants::LEGACY_REVERSE_CHAN_THRESHOLD, MWAVersion};

/// A coarse channel of an observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoarseChannel {
    /// The receiver channel number (0 to 255).
    pub rec_chan_number: u32,
    /// The index of this channel in the correlator's output order.
    pub corr_chan_number: usize,
    /// The number in the gpubox filenames for this channel; "gpubox01" is 1
    /// and "ch114" is 114.
    pub gpubox_number: u32,
}

impl CoarseChannel {
    /// Make the coarse channels for all of the (ascendingly sorted) receiver
    /// channels listed in a metafits file.
    ///
    /// The legacy correlator writes receiver channels above 128 in reverse
    /// order, so for legacy observations the receiver channels 131, 132, 133
    /// are correlator channels 2, 1, 0, and gpubox files 03, 02, 01. MWAX
    /// writes channels in receiver order, and names its files after the
    /// receiver channel.
    pub(crate) fn populate(receiver_chans: &[u32], mwa_version: MWAVersion) -> Vec<CoarseChannel> {
        let num_low = receiver_chans
            .iter()
            .filter(|&&c| c <= LEGACY_REVERSE_CHAN_THRESHOLD)
            .count();
        let num_chans = receiver_chans.len();

        receiver_chans
            .iter()
            .enumerate()
            .map(|(i, &rec_chan_number)| match mwa_version {
                MWAVersion::CorrOldLegacy | MWAVersion::CorrLegacy => {
                    let corr_chan_number = if i < num_low {
                        i
                    } else {
                        num_low + (num_chans - 1 - i)
                    };
                    CoarseChannel {
                        rec_chan_number,
                        corr_chan_number,
                        gpubox_number: corr_chan_number as u32 + 1,
                    }
                }
                MWAVersion::CorrMWAXv2 => CoarseChannel {
                    rec_chan_number,
                    corr_chan_number: i,
                    gpubox_number: rec_chan_number,
                },
            })
            .collect()
    }
}

impl fmt::Display for CoarseChannel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.rec_chan_number)
    }
}
