// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observation metadata from a metafits file.

mod error;

pub use error::MetafitsError;

use std::{fmt, path::PathBuf};

use log::debug;

use crate::{constants::MAX_RECEIVER_CHAN, fits_read::FitsHeader, MwalibError};

/// The metadata of an observation, as described by its metafits file. Values
/// here have been checked to be consistent with each other.
#[derive(Debug, Clone)]
pub struct MetafitsContext {
    /// Observation id (GPSTIME).
    pub obsid: u32,
    /// Seconds of bad data at the start of the observation (QUACKTIM), in ms.
    pub quack_time_duration_ms: u64,
    /// UNIX time of the first good data (GOODTIME), in ms.
    pub good_time_unix_ms: u64,
    /// Scheduled duration of the observation (EXPOSURE), in ms.
    pub scheduled_duration_ms: u64,
    pub scheduled_start_unix_time_ms: u64,
    pub scheduled_end_unix_time_ms: u64,
    /// The obsid is the scheduled GPS start time in seconds.
    pub scheduled_start_gpstime_ms: u64,
    pub scheduled_end_gpstime_ms: u64,
    /// The receiver channel numbers this observation used (CHANNELS),
    /// ascendingly sorted. Never empty.
    pub receiver_chans: Vec<u32>,
    /// FREQCENT, converted to Hz.
    pub metafits_centre_freq_hz: u32,
    /// RA tile pointing \[degrees\]
    pub ra_tile_pointing_degrees: f64,
    /// DEC tile pointing \[degrees\]
    pub dec_tile_pointing_degrees: f64,
    /// RAPHASE, if there is one \[degrees\]
    pub ra_phase_center_degrees: Option<f64>,
    /// DECPHASE, if there is one \[degrees\]
    pub dec_phase_center_degrees: Option<f64>,
    pub azimuth_degrees: f64,
    pub altitude_degrees: f64,
    pub sun_altitude_degrees: f64,
    pub sun_distance_degrees: f64,
    pub moon_distance_degrees: f64,
    pub jupiter_distance_degrees: f64,
    /// Local sidereal time \[degrees\]
    pub lst_degrees: f64,
    /// Hour angle, as written in the metafits (e.g. "-00:00:00.00").
    pub hour_angle_string: String,
    pub grid_name: String,
    pub grid_number: i32,
    pub creator: String,
    pub project_id: String,
    /// FILENAME
    pub observation_name: String,
    pub mode: String,
    /// The receivers used (RECVRS).
    pub receivers: Vec<usize>,
    /// Beamformer delays (DELAYS).
    pub delays: Vec<usize>,
    /// ATTEN_DB
    pub global_analogue_attenuation_db: f64,
    /// FINECHAN \[kHz\]
    fine_chan_width_khz: f64,
    /// BANDWDTH \[MHz\]; the bandwidth of the whole observation.
    obs_bandwidth_mhz: f64,
    pub metafits_filename: PathBuf,
}

impl MetafitsContext {
    /// Pull observation details out of a metafits primary header.
    pub fn from_header(header: &mut FitsHeader) -> Result<Self, MwalibError> {
        let obsid: u32 = header.get_required("GPSTIME")?;
        let good_time: f64 = header.get_required("GOODTIME")?;
        let quack_time: f64 = header.get_required("QUACKTIM")?;
        let exposure: i64 = header.get_required("EXPOSURE")?;
        let channels = header.get_required_long_string("CHANNELS")?;
        let fine_chan_width_khz: f64 = header.get_required("FINECHAN")?;
        let obs_bandwidth_mhz: f64 = header.get_required("BANDWDTH")?;
        let centre_freq_mhz: f64 = header.get_required("FREQCENT")?;

        for (key, value) in [("GOODTIME", good_time), ("QUACKTIM", quack_time)] {
            if !value.is_finite() {
                return Err(MetafitsError::NotFinite { key, value }.into());
            }
        }
        if exposure < 0 {
            return Err(MetafitsError::NegativeExposure(exposure).into());
        }
        if quack_time < 0.0 {
            return Err(MetafitsError::NegativeQuackTime(quack_time).into());
        }
        if quack_time > exposure as f64 {
            return Err(MetafitsError::QuackTimeExceedsExposure {
                quack_time,
                exposure,
            }
            .into());
        }
        if good_time < quack_time {
            return Err(MetafitsError::GoodTimeBeforeQuackTime {
                good_time,
                quack_time,
            }
            .into());
        }

        let quack_time_duration_ms = (quack_time * 1000.0).round() as u64;
        let good_time_unix_ms = (good_time * 1000.0).round() as u64;
        let scheduled_duration_ms = (exposure as u64).saturating_mul(1000);
        let scheduled_start_unix_time_ms = good_time_unix_ms - quack_time_duration_ms;
        let scheduled_end_unix_time_ms =
            scheduled_start_unix_time_ms.saturating_add(scheduled_duration_ms);
        let scheduled_start_gpstime_ms = u64::from(obsid) * 1000;
        let scheduled_end_gpstime_ms =
            scheduled_start_gpstime_ms.saturating_add(scheduled_duration_ms);

        let receiver_chans = parse_receiver_chans(&channels)?;
        let metafits_centre_freq_hz = {
            let hz = (centre_freq_mhz * 1e6).round();
            if hz > 0.0 && hz <= u32::MAX as f64 {
                hz as u32
            } else {
                return Err(MetafitsError::InvalidCentreFreq(centre_freq_mhz).into());
            }
        };

        let receivers_string = header.get_required_long_string("RECVRS")?;
        let receivers = parse_number_list("RECVRS", &receivers_string)?;
        let delays_string = header.get_required_long_string("DELAYS")?;
        let delays = parse_number_list("DELAYS", &delays_string)?;

        let context = Self {
            obsid,
            quack_time_duration_ms,
            good_time_unix_ms,
            scheduled_duration_ms,
            scheduled_start_unix_time_ms,
            scheduled_end_unix_time_ms,
            scheduled_start_gpstime_ms,
            scheduled_end_gpstime_ms,
            receiver_chans,
            metafits_centre_freq_hz,
            ra_tile_pointing_degrees: header.get_required("RA")?,
            dec_tile_pointing_degrees: header.get_required("DEC")?,
            ra_phase_center_degrees: header.get_optional("RAPHASE")?,
            dec_phase_center_degrees: header.get_optional("DECPHASE")?,
            azimuth_degrees: header.get_required("AZIMUTH")?,
            altitude_degrees: header.get_required("ALTITUDE")?,
            sun_altitude_degrees: header.get_required("SUN-ALT")?,
            sun_distance_degrees: header.get_required("SUN-DIST")?,
            moon_distance_degrees: header.get_required("MOONDIST")?,
            jupiter_distance_degrees: header.get_required("JUP-DIST")?,
            lst_degrees: header.get_required("LST")?,
            hour_angle_string: header.get_required("HA")?,
            grid_name: header.get_required("GRIDNAME")?,
            grid_number: header.get_required("GRIDNUM")?,
            creator: header.get_required("CREATOR")?,
            project_id: header.get_required("PROJECT")?,
            observation_name: header.get_required("FILENAME")?,
            mode: header.get_required("MODE")?,
            receivers,
            delays,
            global_analogue_attenuation_db: header.get_required("ATTEN_DB")?,
            fine_chan_width_khz,
            obs_bandwidth_mhz,
            metafits_filename: header.fits_filename().to_path_buf(),
        };
        debug!(
            "Metafits {}: obsid {obsid}, {} coarse channels, UNIX ms {scheduled_start_unix_time_ms} to {scheduled_end_unix_time_ms}",
            context.metafits_filename.display(),
            context.receiver_chans.len(),
        );
        Ok(context)
    }

    /// The width of each fine channel \[Hz\].
    pub fn fine_chan_width_hz(&self) -> Result<u32, MetafitsError> {
        to_resolution_hz("FINECHAN", self.fine_chan_width_khz * 1e3)
    }

    /// The width of each coarse channel \[Hz\]. The metafits BANDWDTH is
    /// shared equally between all of the metafits coarse channels.
    pub fn coarse_chan_width_hz(&self) -> Result<u32, MetafitsError> {
        to_resolution_hz(
            "BANDWDTH",
            self.obs_bandwidth_mhz * 1e6 / self.receiver_chans.len() as f64,
        )
    }
}

fn to_resolution_hz(key: &'static str, value_hz: f64) -> Result<u32, MetafitsError> {
    let rounded = value_hz.round();
    // NaN fails this comparison, too.
    if rounded > 0.0 && rounded <= u32::MAX as f64 {
        Ok(rounded as u32)
    } else {
        Err(MetafitsError::InvalidResolution {
            key,
            value_hz: rounded,
        })
    }
}

/// Parse the CHANNELS value (e.g. "109,110,111") into sorted receiver channel
/// numbers.
fn parse_receiver_chans(channels: &str) -> Result<Vec<u32>, MetafitsError> {
    let mut chans = Vec::new();
    for s in channels
        .split(',')
        .map(|s| s.trim_matches(|c: char| c.is_whitespace() || c == '&' || c == '\''))
        .filter(|s| !s.is_empty())
    {
        let chan: u32 = s
            .parse()
            .map_err(|_| MetafitsError::ChannelParse(s.to_string()))?;
        if chan > MAX_RECEIVER_CHAN {
            return Err(MetafitsError::ChannelOutOfRange(chan));
        }
        if chans.contains(&chan) {
            return Err(MetafitsError::DuplicateChannel(chan));
        }
        chans.push(chan);
    }

    if chans.is_empty() {
        return Err(MetafitsError::NoChannels);
    }
    chans.sort_unstable();
    Ok(chans)
}

/// Parse a comma-separated list of numbers, like RECVRS or DELAYS.
fn parse_number_list(key: &'static str, value: &str) -> Result<Vec<usize>, MetafitsError> {
    value
        .split(',')
        .map(|s| s.trim_matches(|c: char| c.is_whitespace() || c == '&' || c == '\''))
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| MetafitsError::ListParse {
                key,
                value: value.to_string(),
            })
        })
        .collect()
}

impl fmt::Display for MetafitsContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let phase_centre = |d: Option<f64>| match d {
            Some(d) => format!("{d} degrees"),
            None => "N/A".to_string(),
        };
        writeln!(
            f,
            r#"MetafitsContext (
    obsid:                    {obsid},
    mode:                     {mode},

    Creator:                  {creator},
    Project ID:               {project_id},
    Observation Name:         {obs_name},
    Receivers:                {receivers:?},
    Delays:                   {delays:?},
    Global attenuation:       {atten} dB,

    Scheduled start (UNIX)    {sched_start_unix},
    Scheduled end (UNIX)      {sched_end_unix},
    Scheduled start (GPS)     {sched_start_gps},
    Scheduled end (GPS)       {sched_end_gps},
    Scheduled duration        {sched_duration} s,
    Quack time:               {quack_duration} s,
    Good UNIX start time:     {good_time},

    R.A. (tile_pointing):     {rtpc} degrees,
    Dec. (tile_pointing):     {dtpc} degrees,
    R.A. (phase center):      {rppc},
    Dec. (phase center):      {dppc},
    Azimuth:                  {az} degrees,
    Altitude:                 {alt} degrees,
    Sun altitude:             {sun_alt} degrees,
    Sun distance:             {sun_dis} degrees,
    Moon distance:            {moon_dis} degrees,
    Jupiter distance:         {jup_dis} degrees,
    LST:                      {lst} degrees,
    Hour angle:               {ha},
    Grid name:                {grid},
    Grid number:              {grid_n},

    Coarse channels:          {chans:?},
    metafits FREQCENT key:    {freqcent} MHz,

    metafits filename:        {meta},
)"#,
            obsid = self.obsid,
            mode = self.mode,
            creator = self.creator,
            project_id = self.project_id,
            obs_name = self.observation_name,
            receivers = self.receivers,
            delays = self.delays,
            atten = self.global_analogue_attenuation_db,
            sched_start_unix = self.scheduled_start_unix_time_ms as f64 / 1e3,
            sched_end_unix = self.scheduled_end_unix_time_ms as f64 / 1e3,
            sched_start_gps = self.scheduled_start_gpstime_ms as f64 / 1e3,
            sched_end_gps = self.scheduled_end_gpstime_ms as f64 / 1e3,
            sched_duration = self.scheduled_duration_ms as f64 / 1e3,
            quack_duration = self.quack_time_duration_ms as f64 / 1e3,
            good_time = self.good_time_unix_ms as f64 / 1e3,
            rtpc = self.ra_tile_pointing_degrees,
            dtpc = self.dec_tile_pointing_degrees,
            rppc = phase_centre(self.ra_phase_center_degrees),
            dppc = phase_centre(self.dec_phase_center_degrees),
            az = self.azimuth_degrees,
            alt = self.altitude_degrees,
            sun_alt = self.sun_altitude_degrees,
            sun_dis = self.sun_distance_degrees,
            moon_dis = self.moon_distance_degrees,
            jup_dis = self.jupiter_distance_degrees,
            lst = self.lst_degrees,
            ha = self.hour_angle_string,
            grid = self.grid_name,
            grid_n = self.grid_number,
            chans = self.receiver_chans,
            freqcent = self.metafits_centre_freq_hz as f64 / 1e6,
            meta = self.metafits_filename.display(),
        )
    }
}
