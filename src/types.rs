// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generic types.

/// The correlator that produced an observation's gpubox files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum MWAVersion {
    /// The legacy correlator before CORR_VER was written (pre-2014).
    CorrOldLegacy,
    /// The legacy correlator (CORR_VER = 1).
    CorrLegacy,
    /// MWAX (CORR_VER = 2).
    CorrMWAXv2,
}

impl std::fmt::Display for MWAVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MWAVersion::CorrOldLegacy => "Correlator v1 old Legacy (no file indices)",
                MWAVersion::CorrLegacy => "Correlator v1 Legacy",
                MWAVersion::CorrMWAXv2 => "Correlator v2 MWAX",
            }
        )
    }
}
