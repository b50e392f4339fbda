// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests for building observation contexts.

use std::path::Path;

use tempfile::{tempdir, TempDir};

use super::*;
use crate::{test_common::*, FitsError, MetafitsError};

/// Write a metafits declaring `chans` and legacy gpubox files named after
/// `gpubox_numbers` (batch 00) into a temporary directory.
fn legacy_obs(chans: &[u32], gpubox_numbers: &[u8]) -> (TempDir, MwalibArgs) {
    let tmp_dir = tempdir().unwrap();
    let metafits = tmp_dir.path().join(format!("{TEST_OBSID}.metafits"));
    write_metafits(&metafits, chans);

    let mut args = MwalibArgs::new();
    args.set_metafits_filename(&metafits).unwrap();
    for &n in gpubox_numbers {
        let gpubox = tmp_dir.path().join(legacy_name(n, 0));
        write_gpubox(&gpubox, TEST_OBSID, Some(1));
        args.add_gpubox_filename(&gpubox).unwrap();
    }
    (tmp_dir, args)
}

#[test]
fn test_two_channel_observation() {
    let (_tmp_dir, args) = legacy_obs(&[121, 122], &[2, 1]);
    let context = ObservationContext::new(&args).unwrap();

    assert_eq!(context.obsid, TEST_OBSID);
    assert_eq!(context.start_unix_time_ms, 1_417_468_096_000);
    assert_eq!(context.end_unix_time_ms, 1_417_468_208_000);
    assert!(context.end_unix_time_ms >= context.start_unix_time_ms);
    assert_eq!(context.fine_chan_width_hz, 40_000);
    assert_eq!(context.coarse_chan_width_hz, 1_280_000);
    assert_eq!(context.observation_bandwidth_hz, 2_560_000);
    assert_eq!(context.num_coarse_chans(), 2);
    assert_eq!(context.coarse_chan_numbers(), vec![121, 122]);
    assert_eq!(context.mwa_version, MWAVersion::CorrLegacy);
    assert_eq!(context.num_gpubox_batches, 1);
    assert_eq!(context.metafits_filename, args.metafits_filename().unwrap());
    // The supplied order is kept.
    let numbers: Vec<u32> = context.gpubox_files.iter().map(|g| g.gpubox_number).collect();
    assert_eq!(numbers, vec![2, 1]);
    assert_eq!(context.gpubox_files[0].filename, args.gpubox_filenames()[0]);
    assert_eq!(context.metafits_context.metafits_centre_freq_hz, 154_240_000);
    assert_eq!(context.metafits_context.mode, "HW_LFILES");
}

#[test]
fn test_only_supplied_channels_are_reported() {
    let chans: Vec<u32> = (109..=132).collect();
    // 109 is gpubox01; 132 is the highest channel above 128, which is reversed
    // to gpubox21.
    let (_tmp_dir, args) = legacy_obs(&chans, &[21, 1, 5]);
    let context = ObservationContext::new(&args).unwrap();
    assert_eq!(context.coarse_chan_numbers(), vec![109, 113, 132]);
    assert_eq!(context.num_coarse_chans(), context.coarse_chans.len());
    // The width is still derived from every metafits channel.
    assert_eq!(context.coarse_chan_width_hz, 1_280_000);
    assert_eq!(context.observation_bandwidth_hz, 3 * 1_280_000);
}

#[test]
fn test_channels_are_ascending_and_distinct() {
    let tmp_dir = tempdir().unwrap();
    let metafits = tmp_dir.path().join("obs.metafits");
    write_metafits(&metafits, &[130, 129, 128]);

    let mut gpuboxes = vec![];
    for (n, batch) in [(3, 0), (1, 0), (2, 0), (3, 1), (1, 1), (2, 1)] {
        let path = tmp_dir.path().join(legacy_name(n, batch));
        write_gpubox(&path, TEST_OBSID, None);
        gpuboxes.push(path);
    }

    let context = ObservationContext::from_files(&metafits, &gpuboxes).unwrap();
    let chans = context.coarse_chan_numbers();
    assert_eq!(chans, vec![128, 129, 130]);
    assert!(chans.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(context.num_gpubox_batches, 2);
    assert_eq!(context.mwa_version, MWAVersion::CorrOldLegacy);
}

#[test]
fn test_mwax_observation() {
    let tmp_dir = tempdir().unwrap();
    let metafits = tmp_dir.path().join("obs.metafits");
    write_metafits(&metafits, &[114, 115, 116]);
    let gpubox = tmp_dir.path().join(mwax_name(115, 0));
    write_gpubox(&gpubox, TEST_OBSID, Some(2));

    let context = ObservationContext::from_files(&metafits, &[&gpubox]).unwrap();
    assert_eq!(context.mwa_version, MWAVersion::CorrMWAXv2);
    assert_eq!(context.coarse_chan_numbers(), vec![115]);
    assert_eq!(context.coarse_chans[0].gpubox_number, 115);
}

#[test]
fn test_missing_metafits() {
    let mut args = MwalibArgs::new();
    args.add_gpubox_filename("whatever.fits").unwrap();
    assert!(matches!(
        ObservationContext::new(&args),
        Err(MwalibError::MissingMetafits)
    ));

    // Even an entirely empty set of arguments complains about the metafits
    // first.
    assert!(matches!(
        ObservationContext::new(&MwalibArgs::new()),
        Err(MwalibError::MissingMetafits)
    ));
}

#[test]
fn test_missing_gpuboxes() {
    let (_tmp_dir, args) = legacy_obs(&[121, 122], &[]);
    assert!(matches!(
        ObservationContext::new(&args),
        Err(MwalibError::Gpubox(GpuboxError::NoGpuboxes))
    ));
}

#[test]
fn test_unreadable_metafits() {
    let tmp_dir = tempdir().unwrap();
    let missing = tmp_dir.path().join("missing.fits");
    let gpubox = tmp_dir.path().join(legacy_name(1, 0));
    write_gpubox(&gpubox, TEST_OBSID, Some(1));

    match ObservationContext::from_files(&missing, &[&gpubox]) {
        Err(MwalibError::Fits(FitsError::Open { fits_filename, .. })) => {
            assert_eq!(fits_filename, missing)
        }
        other => panic!("Expected an open error, got {other:?}"),
    }
}

#[test]
fn test_unreadable_gpubox() {
    let (tmp_dir, mut args) = legacy_obs(&[121, 122], &[1]);
    let not_fits = tmp_dir.path().join(legacy_name(2, 0));
    std::fs::write(&not_fits, b"definitely not a FITS file").unwrap();
    args.add_gpubox_filename(&not_fits).unwrap();

    match ObservationContext::new(&args) {
        Err(MwalibError::Fits(FitsError::Open { fits_filename, .. })) => {
            assert_eq!(fits_filename, not_fits)
        }
        other => panic!("Expected a FITS error, got {other:?}"),
    }
}

#[test]
fn test_files_are_all_read_before_cross_checks() {
    // The gpubox file has the wrong name, but the missing file comes first.
    let tmp_dir = tempdir().unwrap();
    let metafits = tmp_dir.path().join("obs.metafits");
    write_metafits(&metafits, &[121]);
    let bad_name = tmp_dir.path().join("data1.fits");
    write_gpubox(&bad_name, TEST_OBSID, Some(1));
    let missing = tmp_dir.path().join(legacy_name(1, 0));

    assert!(matches!(
        ObservationContext::from_files(&metafits, &[&bad_name, &missing]),
        Err(MwalibError::Fits(FitsError::Open { .. }))
    ));
    assert!(matches!(
        ObservationContext::from_files(&metafits, &[&bad_name]),
        Err(MwalibError::Gpubox(GpuboxError::Unrecognised(_)))
    ));
}

#[test]
fn test_inconsistent_metafits() {
    let (_tmp_dir, args) = legacy_obs(&[121], &[1]);
    let metafits = args.metafits_filename().unwrap();
    let mut cards = metafits_cards(&[121]);
    set_value(&mut cards, "EXPOSURE", Value::Int(-1));
    std::fs::remove_file(metafits).unwrap();
    write_header(metafits, &cards);

    assert!(matches!(
        ObservationContext::new(&args),
        Err(MwalibError::Metafits(MetafitsError::NegativeExposure(-1)))
    ));
}

#[test]
fn test_invalid_resolution() {
    let (_tmp_dir, args) = legacy_obs(&[121], &[1]);
    let metafits = args.metafits_filename().unwrap();
    let mut cards = metafits_cards(&[121]);
    set_value(&mut cards, "FINECHAN", Value::Float(0.0));
    std::fs::remove_file(metafits).unwrap();
    write_header(metafits, &cards);

    assert!(matches!(
        ObservationContext::new(&args),
        Err(MwalibError::Metafits(MetafitsError::InvalidResolution {
            key: "FINECHAN",
            ..
        }))
    ));
}

#[test]
fn test_undeclared_channel() {
    // Only two channels are declared, so there is no gpubox03.
    let (_tmp_dir, args) = legacy_obs(&[121, 122], &[1, 3]);
    assert!(matches!(
        ObservationContext::new(&args),
        Err(MwalibError::Gpubox(GpuboxError::UndeclaredChannel {
            gpubox_number: 3,
            ..
        }))
    ));
}

#[test]
fn test_obsid_mismatch() {
    let (tmp_dir, mut args) = legacy_obs(&[121, 122], &[1]);
    let other = tmp_dir.path().join(legacy_name(2, 0));
    write_gpubox(&other, TEST_OBSID + 8, Some(1));
    args.add_gpubox_filename(&other).unwrap();

    assert!(matches!(
        ObservationContext::new(&args),
        Err(MwalibError::Gpubox(GpuboxError::ObsidMismatch { gpubox_obsid, .. })) if gpubox_obsid == TEST_OBSID + 8
    ));
}

#[test]
fn test_metafits_filename_is_kept() {
    let (_tmp_dir, args) = legacy_obs(&[121], &[1]);
    let context = ObservationContext::new(&args).unwrap();
    assert_eq!(
        context.metafits_filename.as_path(),
        args.metafits_filename().unwrap()
    );
    assert!(context
        .metafits_filename
        .to_str()
        .unwrap()
        .ends_with(&format!("{TEST_OBSID}.metafits")));
    assert!(Path::new(&context.metafits_filename).exists());
}

#[test]
fn test_display() {
    let (_tmp_dir, args) = legacy_obs(&[121, 122], &[1, 2]);
    let context = ObservationContext::new(&args).unwrap();
    let s = context.to_string();
    assert!(s.contains("Observation ID: 1101503312\n"));
    assert!(s.contains("Correlator version: Correlator v1 Legacy\n"));
    assert!(s.contains("Number of gpubox batches: 1\n"));
    assert!(s.contains("Number of coarse-band channels: 2\n"));
    assert!(s.ends_with("Coarse channels: 121,122"));
}
