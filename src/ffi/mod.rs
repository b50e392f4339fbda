// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code for allowing other languages to talk to this Rust library. The C
//! header is generated into `include/mwalib.h` by the build script.
//!
//! All functions that can fail take a caller-owned error buffer (at least
//! `MWALIB_ERROR_MESSAGE_LEN` bytes is recommended) and return an exit code:
//! 0 on success, 1 if an error occurred and -1 if Rust panicked. In both
//! failure cases the buffer holds a null-terminated message, truncated to fit.


use std::{
    ffi::CStr,
    os::raw::c_char,
    panic::{self, AssertUnwindSafe},
    ptr, slice,
};

use crate::{ArgsError, MwalibArgs, ObservationContext};

/// The C-compatible summary of an observation, filled in by `process_args`.
/// The channel array is owned by mwalib and must be freed with
/// `free_mwa_obs_context`.
#[repr(C)]
pub struct MwaObsContext {
    /// Observation id
    pub obsid: u64,
    /// Scheduled start (UNIX time) [milliseconds]
    pub start_time_milliseconds: u64,
    /// Scheduled end (UNIX time) [milliseconds]
    pub end_time_milliseconds: u64,
    /// Width of each fine channel [Hz]
    pub fine_channel_resolution: u32,
    /// Width of each coarse channel [Hz]
    pub coarse_channel_bandwidth: u32,
    /// The number of elements in `coarse_channels`
    pub num_coarse_channels: usize,
    /// Ascendingly-sorted receiver channel numbers
    pub coarse_channels: *mut u32,
}

/// Write `message` into a caller-provided buffer as a null-terminated UTF-8
/// string. If the buffer is too small, the message is cut at the last whole
/// character that fits. Returns the number of bytes written, not counting the
/// trailing null.
unsafe fn write_error_message(message: &str, buffer: *mut c_char, length: usize) -> usize {
    if buffer.is_null() || length == 0 {
        return 0;
    }
    let buffer = slice::from_raw_parts_mut(buffer as *mut u8, length);

    let mut end = message.len().min(length - 1);
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    buffer[..end].copy_from_slice(&message.as_bytes()[..end]);
    // Add a trailing null so people using the string as a `char *` don't
    // accidentally read into garbage.
    buffer[end] = 0;
    end
}

/// Run `f`, converting an error or a panic into an exit code and a message in
/// the error buffer.
unsafe fn ffi_call<F>(f: F, error_message: *mut c_char, error_message_length: usize) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            write_error_message(&e, error_message, error_message_length);
            1
        }
        Err(payload) => {
            write_error_message(
                panic_message::panic_message(&payload),
                error_message,
                error_message_length,
            );
            -1
        }
    }
}

/// Get a path out of a C string.
unsafe fn path_from_c_str<'a>(s: *const c_char, what: &str) -> Result<&'a str, ArgsError> {
    if s.is_null() {
        return Err(ArgsError::InvalidArgument(format!(
            "The {what} is a null pointer"
        )));
    }
    CStr::from_ptr(s)
        .to_str()
        .map_err(|e| ArgsError::InvalidArgument(format!("The {what} isn't UTF-8: {e}")))
}

/// Create a new, empty set of mwalib arguments.
///
/// # Arguments
///
/// * `args` - a double pointer to the `MwalibArgs` struct which is set by this
///   function. This struct must be freed by calling `free_args`.
///
/// # Returns
///
/// * 0 on success, 1 if `args` is null.
///
#[no_mangle]
pub unsafe extern "C" fn initialise_args(args: *mut *mut MwalibArgs) -> i32 {
    if args.is_null() {
        return 1;
    }
    *args = Box::into_raw(Box::new(MwalibArgs::new()));
    0
}

/// Set the metafits file of an `MwalibArgs`. This can only be done once.
///
/// # Arguments
///
/// * `args` - a pointer to an `MwalibArgs` created by `initialise_args`.
/// * `metafits_filename` - the path to the metafits file.
/// * `error_message` - a buffer for an error message.
/// * `error_message_length` - the size of the error buffer.
///
/// # Returns
///
/// * An exit code integer; see the module documentation.
///
#[no_mangle]
pub unsafe extern "C" fn set_metafits_filename(
    args: *mut MwalibArgs,
    metafits_filename: *const c_char,
    error_message: *mut c_char,
    error_message_length: usize,
) -> i32 {
    ffi_call(
        || {
            let args = args
                .as_mut()
                .ok_or_else(|| "The args pointer is null".to_string())?;
            let path = path_from_c_str(metafits_filename, "metafits filename")
                .map_err(|e| e.to_string())?;
            args.set_metafits_filename(path).map_err(|e| e.to_string())
        },
        error_message,
        error_message_length,
    )
}

/// Add a gpubox file to an `MwalibArgs`. At most
/// `MWALIB_MAX_GPUBOX_FILENAMES` files can be added.
///
/// # Arguments
///
/// * `args` - a pointer to an `MwalibArgs` created by `initialise_args`.
/// * `gpubox_filename` - the path to the gpubox file.
/// * `error_message` - a buffer for an error message.
/// * `error_message_length` - the size of the error buffer.
///
/// # Returns
///
/// * An exit code integer; see the module documentation.
///
#[no_mangle]
pub unsafe extern "C" fn add_gpubox_filename(
    args: *mut MwalibArgs,
    gpubox_filename: *const c_char,
    error_message: *mut c_char,
    error_message_length: usize,
) -> i32 {
    ffi_call(
        || {
            let args = args
                .as_mut()
                .ok_or_else(|| "The args pointer is null".to_string())?;
            let path =
                path_from_c_str(gpubox_filename, "gpubox filename").map_err(|e| e.to_string())?;
            args.add_gpubox_filename(path).map_err(|e| e.to_string())
        },
        error_message,
        error_message_length,
    )
}

/// Check the files in an `MwalibArgs` and summarise the observation.
///
/// # Arguments
///
/// * `args` - a pointer to an `MwalibArgs` created by `initialise_args`.
/// * `obs` - a pointer to a caller-owned `MwaObsContext`. It must be
///   zero-initialised or hold the results of an earlier `process_args` call;
///   on success, channels from an earlier call are freed before it is
///   overwritten. It is only written to on success, after which its channels
///   must be freed with `free_mwa_obs_context`.
/// * `error_message` - a buffer for an error message.
/// * `error_message_length` - the size of the error buffer.
///
/// # Returns
///
/// * An exit code integer; see the module documentation.
///
#[no_mangle]
pub unsafe extern "C" fn process_args(
    args: *const MwalibArgs,
    obs: *mut MwaObsContext,
    error_message: *mut c_char,
    error_message_length: usize,
) -> i32 {
    ffi_call(
        || {
            let args = args
                .as_ref()
                .ok_or_else(|| "The args pointer is null".to_string())?;
            if obs.is_null() {
                return Err("The obs pointer is null".to_string());
            }
            let context = ObservationContext::new(args).map_err(|e| e.to_string())?;

            let coarse_channels = context.coarse_chan_numbers().into_boxed_slice();
            let num_coarse_channels = coarse_channels.len();
            free_mwa_obs_context(obs);
            obs.write(MwaObsContext {
                obsid: u64::from(context.obsid),
                start_time_milliseconds: context.start_unix_time_ms,
                end_time_milliseconds: context.end_unix_time_ms,
                fine_channel_resolution: context.fine_chan_width_hz,
                coarse_channel_bandwidth: context.coarse_chan_width_hz,
                num_coarse_channels,
                coarse_channels: Box::into_raw(coarse_channels) as *mut u32,
            });
            Ok(())
        },
        error_message,
        error_message_length,
    )
}

/// Free an `MwalibArgs` and set the pointer to null. Calling this again on
/// the same pointer does nothing.
///
/// # Arguments
///
/// * `args` - a double pointer to an `MwalibArgs` created by
///   `initialise_args`.
///
#[no_mangle]
pub unsafe extern "C" fn free_args(args: *mut *mut MwalibArgs) {
    if args.is_null() || (*args).is_null() {
        return;
    }
    drop(Box::from_raw(*args));
    *args = ptr::null_mut();
}

/// Free the channels of an `MwaObsContext` filled in by `process_args`. The
/// channel pointer is set to null and the count to 0, so calling this again
/// does nothing.
///
/// # Arguments
///
/// * `obs` - a pointer to the `MwaObsContext`.
///
#[no_mangle]
pub unsafe extern "C" fn free_mwa_obs_context(obs: *mut MwaObsContext) {
    let obs = match obs.as_mut() {
        Some(o) => o,
        None => return,
    };
    if !obs.coarse_channels.is_null() {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
            obs.coarse_channels,
            obs.num_coarse_channels,
        )));
    }
    obs.coarse_channels = ptr::null_mut();
    obs.num_coarse_channels = 0;
}
