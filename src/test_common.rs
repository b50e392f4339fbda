// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpers for writing small, header-only FITS files in tests.

use std::{ffi::CString, path::Path, ptr};

use fitsio::{errors::check_status as fits_check_status, FitsFile};

pub(crate) const TEST_OBSID: u32 = 1101503312;

/// The value of a header key to be written.
#[derive(Debug, Clone)]
pub(crate) enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    /// A string written with the CONTINUE convention.
    LongStr(String),
    /// A whole 80-character card, written as-is. The key is ignored.
    Card(String),
}

pub(crate) type Cards = Vec<(&'static str, Value)>;

pub(crate) fn str_value(s: &str) -> Value {
    Value::Str(s.to_string())
}

pub(crate) fn long_str_value(s: &str) -> Value {
    Value::LongStr(s.to_string())
}

/// Write a FITS file with an empty primary HDU holding `cards`.
pub(crate) fn write_header<P: AsRef<Path>>(path: P, cards: &[(&str, Value)]) {
    let mut fptr = FitsFile::create(path.as_ref()).open().unwrap();
    let hdu = fptr.primary_hdu().unwrap();
    for (key, value) in cards {
        match value {
            Value::Int(i) => hdu.write_key(&mut fptr, key, *i).unwrap(),
            Value::Float(f) => hdu.write_key(&mut fptr, key, *f).unwrap(),
            Value::Str(s) => hdu.write_key(&mut fptr, key, s.as_str()).unwrap(),
            Value::LongStr(s) => {
                let key = CString::new(*key).unwrap();
                let value = CString::new(s.as_str()).unwrap();
                let mut status = 0;
                unsafe {
                    // ffpkls = fits_write_key_longstr
                    fitsio_sys::ffpkls(
                        fptr.as_raw(),
                        key.as_ptr(),
                        value.as_ptr(),
                        ptr::null(),
                        &mut status,
                    );
                }
                fits_check_status(status).unwrap();
            }
            Value::Card(card) => {
                let card = CString::new(card.as_str()).unwrap();
                let mut status = 0;
                unsafe {
                    // ffprec = fits_write_record
                    fitsio_sys::ffprec(fptr.as_raw(), card.as_ptr(), &mut status);
                }
                fits_check_status(status).unwrap();
            }
        }
    }
}

/// Replace the value of `key`, or add it if it isn't there.
pub(crate) fn set_value(cards: &mut Cards, key: &'static str, value: Value) {
    match cards.iter_mut().find(|(k, _)| *k == key) {
        Some(c) => c.1 = value,
        None => cards.push((key, value)),
    }
}

pub(crate) fn remove_key(cards: &mut Cards, key: &str) {
    cards.retain(|(k, _)| *k != key);
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// The cards of a consistent metafits that declares `channels`.
pub(crate) fn metafits_cards(channels: &[u32]) -> Cards {
    vec![
        ("GPSTIME", Value::Int(i64::from(TEST_OBSID))),
        ("EXPOSURE", Value::Int(112)),
        ("QUACKTIM", Value::Float(2.0)),
        ("GOODTIME", Value::Float(1417468098.0)),
        ("FINECHAN", Value::Float(40.0)),
        ("BANDWDTH", Value::Float(1.28 * channels.len() as f64)),
        ("FREQCENT", Value::Float(154.24)),
        ("CHANNELS", long_str_value(&join(channels))),
        ("RA", Value::Float(144.2107505)),
        ("DEC", Value::Float(-26.63403125)),
        ("AZIMUTH", Value::Float(0.0)),
        ("ALTITUDE", Value::Float(90.0)),
        ("SUN-ALT", Value::Float(-1.532227756)),
        ("SUN-DIST", Value::Float(91.53222776)),
        ("MOONDIST", Value::Float(131.8800152)),
        ("JUP-DIST", Value::Float(41.40168434)),
        ("LST", Value::Float(144.3812519)),
        ("HA", str_value("-00:00:00.00")),
        ("GRIDNAME", str_value("sweet")),
        ("GRIDNUM", Value::Int(0)),
        ("CREATOR", str_value("Deprecated")),
        ("PROJECT", str_value("C001")),
        ("FILENAME", str_value("drift")),
        ("MODE", str_value("HW_LFILES")),
        ("RECVRS", long_str_value(&join(&(1..=16).collect::<Vec<_>>()))),
        ("DELAYS", long_str_value(&join(&[0; 16]))),
        ("ATTEN_DB", Value::Float(1.0)),
    ]
}

pub(crate) fn write_metafits<P: AsRef<Path>>(path: P, channels: &[u32]) {
    write_header(path, &metafits_cards(channels));
}

/// The cards of a gpubox file header. CORR_VER is only present if `corr_ver`
/// is supplied.
pub(crate) fn gpubox_cards(obsid: u32, corr_ver: Option<u8>) -> Cards {
    let mut cards = vec![("OBSID", Value::Int(i64::from(obsid)))];
    if let Some(v) = corr_ver {
        cards.push(("CORR_VER", Value::Int(i64::from(v))));
    }
    cards
}

pub(crate) fn write_gpubox<P: AsRef<Path>>(path: P, obsid: u32, corr_ver: Option<u8>) {
    write_header(path, &gpubox_cards(obsid, corr_ver));
}

/// A legacy gpubox filename for the test obsid.
pub(crate) fn legacy_name(gpubox_number: u8, batch: u8) -> String {
    format!("{TEST_OBSID}_20141201210818_gpubox{gpubox_number:02}_{batch:02}.fits")
}

/// An MWAX gpubox filename for the test obsid.
pub(crate) fn mwax_name(rec_chan: u32, batch: u16) -> String {
    format!("{TEST_OBSID}_20141201210818_ch{rec_chan:03}_{batch:03}.fits")
}
