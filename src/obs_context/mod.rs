// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The main interface to MWA data.
 */

#[cfg(test)]
mod tests;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::debug;
use vec1::Vec1;

use crate::{
    coarse_channel::CoarseChannel,
    fits_read::FitsHeader,
    gpubox_files::{examine_gpubox_files, GpuboxFile},
    metafits::MetafitsContext,
    GpuboxError, MWAVersion, MwalibArgs, MwalibError,
};

/// `mwalib` observation context. This is what a metafits file and its gpubox
/// files say about an observation, after checking that they agree.
#[derive(Debug, Clone)]
pub struct ObservationContext {
    /// Observation id
    pub obsid: u32,
    /// Scheduled start (UNIX time) of the observation \[ms\]
    pub start_unix_time_ms: u64,
    /// Scheduled end (UNIX time) of the observation \[ms\]. Never earlier than
    /// the start.
    pub end_unix_time_ms: u64,
    /// Width of each fine channel \[Hz\]
    pub fine_chan_width_hz: u32,
    /// Width of each coarse channel \[Hz\]
    pub coarse_chan_width_hz: u32,
    /// The bandwidth of the coarse channels we have gpubox files for \[Hz\]
    pub observation_bandwidth_hz: u32,
    /// The coarse channels that we have gpubox files for, ascendingly sorted
    /// by receiver channel number.
    pub coarse_chans: Vec1<CoarseChannel>,
    /// The correlator that wrote the gpubox files.
    pub mwa_version: MWAVersion,
    /// The number of gpubox batches.
    pub num_gpubox_batches: usize,
    /// The gpubox files, in the order they were supplied.
    pub gpubox_files: Vec1<GpuboxFile>,
    /// Everything else the metafits says about the observation.
    pub metafits_context: MetafitsContext,
    /// Filename of the metafits we were given
    pub metafits_filename: PathBuf,
}

impl ObservationContext {
    /// Check and combine the files in `args` into an [`ObservationContext`].
    ///
    /// All files are opened and their primary headers read before anything is
    /// cross-checked. The first problem found is returned.
    pub fn new(args: &MwalibArgs) -> Result<Self, MwalibError> {
        let metafits_filename = args
            .metafits_filename()
            .ok_or(MwalibError::MissingMetafits)?;
        if args.gpubox_filenames().is_empty() {
            return Err(GpuboxError::NoGpuboxes.into());
        }

        // Can we read everything?
        let mut metafits_header = FitsHeader::read(metafits_filename)?;
        let mut gpubox_headers = args
            .gpubox_filenames()
            .iter()
            .map(FitsHeader::read)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "Read the headers of {} and {} gpubox file(s)",
            metafits_filename.display(),
            gpubox_headers.len()
        );

        let metafits = MetafitsContext::from_header(&mut metafits_header)?;
        debug!("{metafits}");
        let gpubox_info = examine_gpubox_files(&mut gpubox_headers, &metafits)?;
        let fine_chan_width_hz = metafits.fine_chan_width_hz()?;
        let coarse_chan_width_hz = metafits.coarse_chan_width_hz()?;
        let observation_bandwidth_hz =
            coarse_chan_width_hz.saturating_mul(gpubox_info.coarse_chans.len() as u32);

        Ok(Self {
            obsid: metafits.obsid,
            start_unix_time_ms: metafits.scheduled_start_unix_time_ms,
            end_unix_time_ms: metafits.scheduled_end_unix_time_ms,
            fine_chan_width_hz,
            coarse_chan_width_hz,
            observation_bandwidth_hz,
            coarse_chans: gpubox_info.coarse_chans,
            mwa_version: gpubox_info.mwa_version,
            num_gpubox_batches: gpubox_info.num_batches,
            gpubox_files: gpubox_info.gpubox_files,
            metafits_filename: metafits.metafits_filename.clone(),
            metafits_context: metafits,
        })
    }

    /// A shortcut for collecting files into [`MwalibArgs`] and calling
    /// [`ObservationContext::new`].
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        metafits: P,
        gpubox_files: &[Q],
    ) -> Result<Self, MwalibError> {
        let mut args = MwalibArgs::new();
        args.set_metafits_filename(metafits)?;
        for gpubox in gpubox_files {
            args.add_gpubox_filename(gpubox)?;
        }
        Self::new(&args)
    }

    pub fn num_coarse_chans(&self) -> usize {
        self.coarse_chans.len()
    }

    /// The receiver channel numbers of the coarse channels.
    pub fn coarse_chan_numbers(&self) -> Vec<u32> {
        self.coarse_chans.iter().map(|c| c.rec_chan_number).collect()
    }
}

impl fmt::Display for ObservationContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Observation ID: {}", self.obsid)?;
        writeln!(
            f,
            "Start time (UNIX milliseconds): {}",
            self.start_unix_time_ms
        )?;
        writeln!(f, "End time   (UNIX milliseconds): {}", self.end_unix_time_ms)?;
        writeln!(f, "Fine-channel resolution [Hz]:  {}", self.fine_chan_width_hz)?;
        writeln!(
            f,
            "Coarse-channel bandwidth [Hz]: {}",
            self.coarse_chan_width_hz
        )?;
        writeln!(f, "Correlator version: {}", self.mwa_version)?;
        writeln!(f, "Number of gpubox batches: {}", self.num_gpubox_batches)?;
        writeln!(
            f,
            "Number of coarse-band channels: {}",
            self.num_coarse_chans()
        )?;
        let chans: Vec<String> = self.coarse_chans.iter().map(|c| c.to_string()).collect();
        write!(f, "Coarse channels: {}", chans.join(","))
    }
}
