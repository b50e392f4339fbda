// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Checking gpubox files against each other and against their metafits.

mod error;

pub use error::GpuboxError;

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use vec1::Vec1;

use crate::{
    coarse_channel::CoarseChannel,
    constants::{LEGACY_CORR_VER, MWAX_CORR_VER},
    fits_read::FitsHeader,
    metafits::MetafitsContext,
    MWAVersion, MwalibError,
};

lazy_static! {
    // e.g. 1065880128_20131015134930_gpubox01.fits
    static ref RE_OLD_LEGACY: Regex =
        Regex::new(r"^\d{10}_\d{14}_gpubox(?P<number>\d{2})\.fits$").unwrap();
    // e.g. 1101503312_20141201210818_gpubox01_00.fits
    static ref RE_LEGACY_BATCH: Regex =
        Regex::new(r"^\d{10}_\d{14}_gpubox(?P<number>\d{2})_(?P<batch>\d{2})\.fits$").unwrap();
    // e.g. 1244973688_20190619100110_ch114_000.fits
    static ref RE_MWAX: Regex =
        Regex::new(r"^\d{10}_\d{14}_ch(?P<number>\d{3})_(?P<batch>\d{3})\.fits$").unwrap();
}

/// The filename conventions a gpubox file can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GpuboxNameType {
    OldLegacy,
    LegacyBatch,
    Mwax,
}

/// A gpubox file that matched its metafits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuboxFile {
    pub filename: PathBuf,
    /// The number in the filename ("gpubox01" is 1, "ch114" is 114).
    pub gpubox_number: u32,
    /// The batch number in the filename. Files without one are batch 0.
    pub batch_number: usize,
    /// The receiver channel this file holds data for.
    pub rec_chan_number: u32,
}

/// What a set of gpubox files tells us about an observation.
#[derive(Debug, Clone)]
pub struct GpuboxInfo {
    pub mwa_version: MWAVersion,
    /// The gpubox files in the order they were supplied.
    pub gpubox_files: Vec1<GpuboxFile>,
    pub num_batches: usize,
    /// The distinct coarse channels the files hold data for, ascendingly
    /// sorted by receiver channel number.
    pub coarse_chans: Vec1<CoarseChannel>,
}

/// Work out the naming convention, gpubox number and batch number of a gpubox
/// filename.
///
/// Only the MWA conventions are accepted: `<obsid>_<datetime>_gpuboxNN.fits`,
/// `<obsid>_<datetime>_gpuboxNN_BB.fits` and `<obsid>_<datetime>_chCCC_BBB.fits`.
/// Any other name (e.g. `data1.fits`) is [`GpuboxError::Unrecognised`], even
/// if the file's header is fine.
fn parse_gpubox_filename(filename: &Path) -> Result<(GpuboxNameType, u32, usize), GpuboxError> {
    let unrecognised = || GpuboxError::Unrecognised(filename.display().to_string());
    let name = filename
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(unrecognised)?;

    let (name_type, caps) = if let Some(caps) = RE_MWAX.captures(name) {
        (GpuboxNameType::Mwax, caps)
    } else if let Some(caps) = RE_LEGACY_BATCH.captures(name) {
        (GpuboxNameType::LegacyBatch, caps)
    } else if let Some(caps) = RE_OLD_LEGACY.captures(name) {
        (GpuboxNameType::OldLegacy, caps)
    } else {
        return Err(unrecognised());
    };

    // The regexes only capture digits, so these can't fail to parse.
    let number = caps["number"].parse().map_err(|_| unrecognised())?;
    let batch = match caps.name("batch") {
        Some(b) => b.as_str().parse().map_err(|_| unrecognised())?,
        None => 0,
    };
    Ok((name_type, number, batch))
}

/// Get the correlator version from a gpubox header, checking it against the
/// filename convention.
fn determine_mwa_version(
    header: &mut FitsHeader,
    name_type: GpuboxNameType,
) -> Result<MWAVersion, MwalibError> {
    let filename = header.fits_filename().display().to_string();
    let corr_ver: Option<u8> = header.get_optional("CORR_VER")?;
    let version = match (name_type, corr_ver) {
        (GpuboxNameType::Mwax, Some(MWAX_CORR_VER)) => MWAVersion::CorrMWAXv2,
        (GpuboxNameType::Mwax, Some(_)) => {
            return Err(GpuboxError::MwaxCorrVerMismatch(filename).into())
        }
        (GpuboxNameType::Mwax, None) => {
            return Err(GpuboxError::MwaxCorrVerMissing(filename).into())
        }
        (_, None) => MWAVersion::CorrOldLegacy,
        (_, Some(LEGACY_CORR_VER)) => MWAVersion::CorrLegacy,
        (_, Some(v)) => {
            return Err(GpuboxError::CorrVerMismatch {
                gpubox_filename: filename,
                gpu_corr_version_value: v,
            }
            .into())
        }
    };
    Ok(version)
}

/// Check that gpubox files (represented by their primary headers) belong to
/// the observation described by `metafits`, and work out which coarse
/// channels and batches they cover.
pub(crate) fn examine_gpubox_files(
    headers: &mut [FitsHeader],
    metafits: &MetafitsContext,
) -> Result<GpuboxInfo, MwalibError> {
    let mut first: Option<(GpuboxNameType, MWAVersion)> = None;
    // Filename, gpubox number, batch number.
    let mut parsed: Vec<(PathBuf, u32, usize)> = Vec::with_capacity(headers.len());

    for header in headers {
        let filename = header.fits_filename().to_path_buf();
        let (name_type, gpubox_number, batch_number) = parse_gpubox_filename(&filename)?;
        trace!(
            "{}: {name_type:?}, gpubox {gpubox_number}, batch {batch_number}",
            filename.display()
        );

        match first {
            Some((t, _)) if t != name_type => return Err(GpuboxError::Mixture.into()),
            _ => (),
        }

        let gpubox_obsid: u32 = header
            .get_optional("OBSID")?
            .ok_or_else(|| GpuboxError::MissingObsid(filename.display().to_string()))?;
        if gpubox_obsid != metafits.obsid {
            return Err(GpuboxError::ObsidMismatch {
                obsid: metafits.obsid,
                gpubox_filename: filename.display().to_string(),
                gpubox_obsid,
            }
            .into());
        }

        let version = determine_mwa_version(header, name_type)?;
        match first {
            None => first = Some((name_type, version)),
            Some((_, v)) if v != version => {
                return Err(GpuboxError::InconsistentCorrVer {
                    gpubox_filename: filename.display().to_string(),
                }
                .into())
            }
            Some(_) => (),
        }

        parsed.push((filename, gpubox_number, batch_number));
    }

    let mwa_version = match first {
        Some((_, v)) => v,
        None => return Err(GpuboxError::NoGpuboxes.into()),
    };
    let metafits_chans = CoarseChannel::populate(&metafits.receiver_chans, mwa_version);

    // Which receiver channels are in each batch.
    let mut batches: BTreeMap<usize, BTreeSet<u32>> = BTreeMap::new();
    let mut coarse_chans: BTreeSet<CoarseChannel> = BTreeSet::new();
    let mut gpubox_files = Vec::with_capacity(parsed.len());
    for (filename, gpubox_number, batch_number) in parsed {
        let chan = metafits_chans
            .iter()
            .find(|c| c.gpubox_number == gpubox_number)
            .ok_or_else(|| GpuboxError::UndeclaredChannel {
                gpubox_filename: filename.display().to_string(),
                gpubox_number,
            })?;
        coarse_chans.insert(*chan);
        batches
            .entry(batch_number)
            .or_default()
            .insert(chan.rec_chan_number);
        gpubox_files.push(GpuboxFile {
            filename,
            gpubox_number,
            batch_number,
            rec_chan_number: chan.rec_chan_number,
        });
    }

    // Batches must start at 0 and have no gaps.
    for (expected, &got) in batches.keys().enumerate() {
        if expected != got {
            return Err(GpuboxError::BatchMissing { expected, got }.into());
        }
    }
    let mut counts = batches.values().map(|chans| chans.len());
    if let Some(expected) = counts.next() {
        if let Some(got) = counts.find(|&c| c != expected) {
            return Err(GpuboxError::UnevenCountInBatches { expected, got }.into());
        }
    }

    debug!(
        "{} gpubox files ({mwa_version}) in {} batch(es) cover {} coarse channel(s)",
        gpubox_files.len(),
        batches.len(),
        coarse_chans.len()
    );

    Ok(GpuboxInfo {
        mwa_version,
        gpubox_files: Vec1::try_from_vec(gpubox_files).map_err(|_| GpuboxError::NoGpuboxes)?,
        num_batches: batches.len(),
        coarse_chans: Vec1::try_from_vec(coarse_chans.into_iter().collect())
            .map_err(|_| GpuboxError::NoGpuboxes)?,
    })
}
