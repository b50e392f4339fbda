// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading keys from the primary header of FITS files.
//!
//! Only keys of the primary HDU are ever read; no HDU data is touched.

pub mod error;

pub use error::FitsError;

use std::{
    ffi::{CStr, CString},
    fmt,
    path::{Path, PathBuf},
    ptr,
};

use fitsio::{hdu::FitsHdu, FitsFile};
use log::trace;

/// cfitsio's KEY_NO_EXIST status.
const KEY_NO_EXIST: i32 = 202;
/// cfitsio's VALUE_UNDEFINED status.
const VALUE_UNDEFINED: i32 = 204;

/// Types that can be parsed from the value of a FITS header key.
pub trait FitsValue: Sized {
    /// Parse a key's value. String values have already had their quotes
    /// removed.
    fn from_fits_value(value: &str) -> Option<Self>;
}

impl FitsValue for String {
    fn from_fits_value(value: &str) -> Option<Self> {
        Some(value.to_string())
    }
}

impl FitsValue for f64 {
    fn from_fits_value(value: &str) -> Option<Self> {
        // FITS allows a 'D' exponent for double-precision values.
        value.trim().replace(['D', 'd'], "E").parse().ok()
    }
}

macro_rules! impl_fits_value_for_int {
    ($($t:ty),*) => {
        $(
            impl FitsValue for $t {
                fn from_fits_value(value: &str) -> Option<Self> {
                    value.trim().parse().ok()
                }
            }
        )*
    };
}

impl_fits_value_for_int!(u8, u32, i32, i64);

/// An open FITS file, positioned at its primary HDU.
pub struct FitsHeader {
    fits_filename: PathBuf,
    fptr: FitsFile,
    hdu: FitsHdu,
}

impl fmt::Debug for FitsHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FitsHeader")
            .field("fits_filename", &self.fits_filename)
            .finish_non_exhaustive()
    }
}

impl FitsHeader {
    /// Open a FITS file and its primary HDU.
    pub fn read<P: AsRef<Path>>(fits_filename: P) -> Result<Self, FitsError> {
        let fits_filename = fits_filename.as_ref();
        trace!("Opening {}", fits_filename.display());
        let mut fptr = FitsFile::open(fits_filename).map_err(|fits_error| FitsError::Open {
            fits_error,
            fits_filename: fits_filename.to_path_buf(),
        })?;
        let hdu = fptr.primary_hdu().map_err(|fits_error| FitsError::Fitsio {
            fits_error,
            fits_filename: fits_filename.to_path_buf(),
            hdu_num: 0,
        })?;
        Ok(Self {
            fits_filename: fits_filename.to_path_buf(),
            fptr,
            hdu,
        })
    }

    pub fn fits_filename(&self) -> &Path {
        &self.fits_filename
    }

    /// Get the value of a key, if it exists. It is an error if the key exists
    /// but its value can't be parsed into `T`.
    pub fn get_optional<T: FitsValue>(&mut self, key: &str) -> Result<Option<T>, FitsError> {
        let unparsed: String = match self.hdu.read_key(&mut self.fptr, key) {
            Ok(v) => v,
            Err(fitsio::errors::Error::Fits(e))
                if e.status == KEY_NO_EXIST || e.status == VALUE_UNDEFINED =>
            {
                return Ok(None)
            }
            Err(fits_error) => {
                return Err(FitsError::Fitsio {
                    fits_error,
                    fits_filename: self.fits_filename.clone(),
                    hdu_num: 0,
                })
            }
        };
        trace!("{}: {key} = {unparsed}", self.fits_filename.display());

        match T::from_fits_value(&unparsed) {
            Some(v) => Ok(Some(v)),
            None => Err(FitsError::Parse {
                key: key.to_string(),
                value: unparsed,
                fits_filename: self.fits_filename.clone(),
                hdu_num: 0,
            }),
        }
    }

    /// Get the value of a key that must exist.
    pub fn get_required<T: FitsValue>(&mut self, key: &str) -> Result<T, FitsError> {
        self.get_optional(key)?
            .ok_or_else(|| self.missing_key(key))
    }

    /// Get a string that may span several cards (the long-string CONTINUE
    /// convention), if the key exists. This is what string values like the
    /// metafits CHANNELS need; [`FitsHeader::get_optional`] only sees the
    /// first card.
    pub fn get_optional_long_string(&mut self, key: &str) -> Result<Option<String>, FitsError> {
        let keyword = CString::new(key).map_err(|_| self.long_string_error(key))?;
        let mut status = 0;
        let mut long_string_ptr = ptr::null_mut();
        let long_string = unsafe {
            // ffgkls = fits_read_key_longstr
            fitsio_sys::ffgkls(
                self.fptr.as_raw(),   /* I - FITS file pointer                    */
                keyword.as_ptr(),     /* I - name of keyword to read              */
                &mut long_string_ptr, /* O - pointer to keyword value             */
                ptr::null_mut(),      /* O - keyword comment                      */
                &mut status,          /* IO - error status                        */
            );
            if long_string_ptr.is_null() {
                None
            } else {
                let s = CStr::from_ptr(long_string_ptr)
                    .to_str()
                    .map(|s| s.to_string());
                // cfitsio allocated the string; give it back.
                let mut free_status = 0;
                fitsio_sys::fffree(long_string_ptr as *mut _, &mut free_status);
                Some(s)
            }
        };

        match (status, long_string) {
            (0, Some(Ok(s))) => {
                trace!("{}: {key} = {s}", self.fits_filename.display());
                Ok(Some(s))
            }
            (KEY_NO_EXIST, _) => Ok(None),
            _ => Err(self.long_string_error(key)),
        }
    }

    /// Get a long string that must exist.
    pub fn get_required_long_string(&mut self, key: &str) -> Result<String, FitsError> {
        self.get_optional_long_string(key)?
            .ok_or_else(|| self.missing_key(key))
    }

    fn missing_key(&self, key: &str) -> FitsError {
        FitsError::MissingKey {
            key: key.to_string(),
            fits_filename: self.fits_filename.clone(),
            hdu_num: 0,
        }
    }

    fn long_string_error(&self, key: &str) -> FitsError {
        FitsError::LongString {
            key: key.to_string(),
            fits_filename: self.fits_filename.clone(),
            hdu_num: 0,
        }
    }
}
