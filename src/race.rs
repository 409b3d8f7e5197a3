//! Session-wide race aggregate

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::driver::Driver;
use crate::report::{DeltaOutcome, DeltaReport, DriverDeltas};
use crate::{AnalysisError, Result};

/// All analysed drivers of one race session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Race {
    track_name: String,
    total_laps: u32,
    drivers: Vec<Driver>,
}

impl Race {
    /// Start an empty race. A session must have at least one lap.
    pub fn new(track_name: impl Into<String>, total_laps: u32) -> Result<Self> {
        let track_name = track_name.into();
        if total_laps == 0 {
            return Err(AnalysisError::invalid_session(track_name, "total_laps must be at least 1"));
        }
        Ok(Self { track_name, total_laps, drivers: Vec::new() })
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    pub fn total_laps(&self) -> u32 {
        self.total_laps
    }

    /// Drivers in the order they were added.
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn add_driver(&mut self, driver: Driver) {
        self.drivers.push(driver);
    }

    pub fn driver(&self, name: &str) -> Option<&Driver> {
        self.drivers.iter().find(|driver| driver.name() == name)
    }

    /// Every lap number any driver completed behind the safety car, ascending.
    ///
    /// Each driver's laps are classified from their own start times, so the
    /// boundary lap can differ between drivers. The union is the session-wide view.
    pub fn safety_car_laps(&self) -> BTreeSet<u32> {
        self.drivers.iter().flat_map(|driver| driver.safety_car_laps()).collect()
    }

    /// Pace delta for every driver around every safety-car lap.
    ///
    /// Pairs without enough green-flag laps on both sides are kept in the report
    /// as [`DeltaOutcome::InsufficientData`].
    pub fn delta_report(&self, window_size: u32) -> DeltaReport {
        let safety_car_laps: Vec<u32> = self.safety_car_laps().into_iter().collect();

        let drivers = self
            .drivers
            .iter()
            .map(|driver| DriverDeltas {
                driver: driver.name().to_string(),
                team: driver.team().to_string(),
                deltas: safety_car_laps
                    .iter()
                    .map(|&lap| (lap, DeltaOutcome::from(driver.lap_delta_around(lap, window_size))))
                    .collect(),
            })
            .collect();

        DeltaReport { window_size, safety_car_laps, drivers }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Race at {}, {} laps>", self.track_name, self.total_laps)
    }
}
