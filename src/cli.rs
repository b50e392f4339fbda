// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `mwalib-test` harness: collect a metafits file and gpubox files from
//! the command line, build an [`ObservationContext`] and report it.

use std::{ffi::OsString, io::Write, path::PathBuf};

use clap::{CommandFactory, Parser};
use log::{debug, error};
use thiserror::Error;

use crate::{ArgsError, MwalibArgs, MwalibError, ObservationContext};

#[derive(Parser, Debug)]
#[command(
    name = "mwalib-test",
    about = "Check an MWA observation's metafits and gpubox files",
    disable_help_flag = true
)]
struct HarnessArgs {
    /// Full path to the metafits file
    #[arg(short, long, value_name = "FILENAME", env = "MWALIB_METAFITS")]
    metafits: Option<PathBuf>,

    /// Print this help
    #[arg(short = '?', long)]
    help: bool,

    /// Full path to each gpubox or mwax FITS file
    #[arg(value_name = "GPUBOXFILE")]
    gpubox_files: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("No arguments supplied; exiting.")]
    NoArguments,

    #[error("Metafits file not supplied; exiting.")]
    MissingMetafits,

    #[error("GPUbox files not supplied; exiting.")]
    NoGpuboxes,

    #[error(transparent)]
    Clap(#[from] clap::Error),

    #[error("Error setting metafits file: {0}")]
    SetMetafits(ArgsError),

    #[error("Error adding gpubox file: {0}")]
    AddGpubox(ArgsError),

    #[error("{0}")]
    Build(#[from] MwalibError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Should the usage text follow this error?
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CliError::NoArguments
                | CliError::MissingMetafits
                | CliError::NoGpuboxes
                | CliError::Clap(_)
        )
    }
}

fn usage() -> String {
    HarnessArgs::command().render_help().to_string()
}

/// Run the harness on `args` (including the program name), writing the
/// report to `out`. Returns the process exit code: 0 on success, 1 otherwise.
pub fn run<I, T, W>(args: I, out: &mut W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    match try_run(args, out) {
        Ok(code) => code,
        Err(e) => {
            let mut report = format!("Error: {e}\n");
            if e.is_usage() {
                report.push_str(&usage());
            }
            if let Err(io_error) = out.write_all(report.as_bytes()) {
                error!("Couldn't write the error report: {io_error}");
            }
            1
        }
    }
}

fn try_run<I, T, W>(args: I, out: &mut W) -> Result<i32, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    writeln!(out, "mwalib Test Harness")?;

    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    debug!("args:\n{:?}", &args);
    if args.len() <= 1 {
        return Err(CliError::NoArguments);
    }

    let args = HarnessArgs::try_parse_from(args)?;
    debug!("parsed args:\n{:?}", &args);
    if args.help {
        write!(out, "{}", usage())?;
        return Ok(1);
    }

    let mut mwalib_args = MwalibArgs::new();
    let metafits = args.metafits.ok_or(CliError::MissingMetafits)?;
    mwalib_args
        .set_metafits_filename(&metafits)
        .map_err(CliError::SetMetafits)?;
    writeln!(out, "Metafits file: {}", metafits.display())?;

    if args.gpubox_files.is_empty() {
        return Err(CliError::NoGpuboxes);
    }
    writeln!(out, "GPUbox files: {}", args.gpubox_files.len())?;
    for gpubox in &args.gpubox_files {
        mwalib_args
            .add_gpubox_filename(gpubox)
            .map_err(CliError::AddGpubox)?;
    }

    let context = ObservationContext::new(&mwalib_args)?;
    writeln!(out, "{context}")?;
    writeln!(out, "Success!")?;
    Ok(0)
}

/// Run the harness, reporting to stdout.
pub fn main_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    run(args, &mut lock)
}
