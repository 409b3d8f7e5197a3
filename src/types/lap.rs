//! Lap rows from the provider and validated lap records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::session_time;
use crate::error::LapRejection;

/// One lap row exactly as the timing provider delivers it.
///
/// Both the lap time and the lap start time may be absent, for example on
/// an out-lap or when the timing loop missed the car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLap {
    /// Lap number as counted by the provider
    pub lap_number: u32,
    /// Lap time in seconds
    #[serde(default)]
    pub lap_duration: Option<f64>,
    /// Offset of the lap start from session start
    #[serde(default, with = "session_time::option")]
    pub lap_start_time: Option<Duration>,
}

impl RawLap {
    pub fn new(
        lap_number: u32,
        lap_duration: Option<f64>,
        lap_start_time: Option<Duration>,
    ) -> Self {
        Self { lap_number, lap_duration, lap_start_time }
    }
}

/// A validated lap that belongs to exactly one driver.
///
/// The duration is always finite and strictly positive. The safety-car flag
/// is assigned once, during classification, through [`LapRecord::classified`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapRecord {
    lap_number: u32,
    duration: f64,
    #[serde(serialize_with = "session_time::option::serialize")]
    start_time: Option<Duration>,
    is_safety_car: bool,
    /// Reserved; nothing populates it yet.
    is_pit_stop: bool,
}

impl LapRecord {
    /// Build a lap from its parts, validating lap number and duration.
    pub fn new(
        lap_number: u32,
        duration: f64,
        start_time: Option<Duration>,
    ) -> Result<Self, LapRejection> {
        if lap_number == 0 {
            return Err(LapRejection::InvalidLapNumber);
        }
        if !duration.is_finite() {
            return Err(LapRejection::NonFiniteDuration);
        }
        if duration <= 0.0 {
            return Err(LapRejection::NonPositiveDuration(duration));
        }

        Ok(Self { lap_number, duration, start_time, is_safety_car: false, is_pit_stop: false })
    }

    /// Validate a provider row. Rows without a lap time never become records.
    pub fn from_raw(raw: &RawLap) -> Result<Self, LapRejection> {
        let duration = raw.lap_duration.ok_or(LapRejection::MissingDuration)?;
        Self::new(raw.lap_number, duration, raw.lap_start_time)
    }

    /// Consume the record and return it with its safety-car flag set.
    pub fn classified(self, is_safety_car: bool) -> Self {
        Self { is_safety_car, ..self }
    }

    pub fn lap_number(&self) -> u32 {
        self.lap_number
    }

    /// Lap time in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start_time(&self) -> Option<Duration> {
        self.start_time
    }

    pub fn is_safety_car(&self) -> bool {
        self.is_safety_car
    }

    pub fn is_pit_stop(&self) -> bool {
        self.is_pit_stop
    }
}

impl fmt::Display for LapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Lap {}: {:.3}s, SC={}, PIT={}>",
            self.lap_number, self.duration, self.is_safety_car, self.is_pit_stop
        )
    }
}
