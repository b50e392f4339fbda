// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Check a metafits file and its gpubox files, and print a summary of the
//! observation.

fn main() {
    env_logger::try_init().unwrap_or(());
    std::process::exit(mwalib::cli::main_with_args(std::env::args_os()));
}
