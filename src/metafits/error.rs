// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with the contents of a metafits file.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MetafitsError {
    #[error("{key} in the metafits is {value}, which isn't a finite number")]
    NotFinite { key: &'static str, value: f64 },

    #[error("EXPOSURE in the metafits is negative ({0} s)")]
    NegativeExposure(i64),

    #[error("QUACKTIM in the metafits is negative ({0} s)")]
    NegativeQuackTime(f64),

    #[error("GOODTIME ({good_time} s) is earlier than QUACKTIM ({quack_time} s); the observation would start before the UNIX epoch")]
    GoodTimeBeforeQuackTime { good_time: f64, quack_time: f64 },

    #[error("QUACKTIM ({quack_time} s) is longer than the scheduled EXPOSURE ({exposure} s)")]
    QuackTimeExceedsExposure { quack_time: f64, exposure: i64 },

    #[error("The metafits CHANNELS key doesn't list any coarse channels")]
    NoChannels,

    #[error("Couldn't parse '{0}' in the metafits CHANNELS key as a receiver channel number")]
    ChannelParse(String),

    #[error("Receiver channel {0} in the metafits CHANNELS key is out of range (0 to 255)")]
    ChannelOutOfRange(u32),

    #[error("Receiver channel {0} is listed more than once in the metafits CHANNELS key")]
    DuplicateChannel(u32),

    #[error("{key} in the metafits gives a resolution of {value_hz} Hz; resolutions must be positive and fit in 32 bits")]
    InvalidResolution { key: &'static str, value_hz: f64 },

    #[error("Couldn't parse '{value}' in the metafits {key} key as a list of numbers")]
    ListParse { key: &'static str, value: String },

    #[error("FREQCENT in the metafits is {0} MHz; the centre frequency must be positive and fit in 32 bits as Hz")]
    InvalidCentreFreq(f64),
}
