//! Structured pace-delta results for presentation
//!
//! A [`DeltaReport`] holds one entry per driver and safety-car lap. Entries
//! without enough surrounding laps stay in the report as
//! [`DeltaOutcome::InsufficientData`] so a printout can say so explicitly.

use serde::Serialize;
use std::fmt;

/// Result of one before/after comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaOutcome {
    /// Mean pace after minus mean pace before, in seconds
    Computed(f64),
    /// One side of the safety-car lap had no green-flag laps
    InsufficientData,
}

impl DeltaOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            DeltaOutcome::Computed(delta) => Some(*delta),
            DeltaOutcome::InsufficientData => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, DeltaOutcome::InsufficientData)
    }
}

impl From<Option<f64>> for DeltaOutcome {
    fn from(delta: Option<f64>) -> Self {
        delta.map_or(DeltaOutcome::InsufficientData, DeltaOutcome::Computed)
    }
}

/// Only a strictly positive delta prints with `+`; zero prints as `-0.00`.
impl fmt::Display for DeltaOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaOutcome::Computed(delta) => {
                let sign = if *delta > 0.0 { '+' } else { '-' };
                write!(f, "Δ = {}{:.2} sec (Post - Pre)", sign, delta.abs())
            }
            DeltaOutcome::InsufficientData => f.write_str("Not enough data"),
        }
    }
}

/// Deltas for a single driver, keyed by safety-car lap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverDeltas {
    pub driver: String,
    pub team: String,
    /// `(safety-car lap, outcome)` in ascending lap order
    pub deltas: Vec<(u32, DeltaOutcome)>,
}

impl DriverDeltas {
    pub fn outcome(&self, lap: u32) -> Option<DeltaOutcome> {
        self.deltas.iter().find(|(n, _)| *n == lap).map(|(_, outcome)| *outcome)
    }
}

/// Pace deltas for every analysed driver around every safety-car lap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaReport {
    /// Laps compared on each side
    pub window_size: u32,
    /// Session-wide safety-car laps, ascending
    pub safety_car_laps: Vec<u32>,
    /// Drivers in race order of insertion
    pub drivers: Vec<DriverDeltas>,
}

impl DeltaReport {
    /// `(driver, lap)` pairs that lacked data for a delta.
    pub fn insufficient(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.drivers.iter().flat_map(|entry| {
            entry
                .deltas
                .iter()
                .filter(|(_, outcome)| outcome.is_insufficient())
                .map(move |(lap, _)| (entry.driver.as_str(), *lap))
        })
    }

    pub fn driver(&self, name: &str) -> Option<&DriverDeltas> {
        self.drivers.iter().find(|entry| entry.driver == name)
    }
}

impl fmt::Display for DeltaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lap Time Delta Around Safety Car:")?;
        for entry in &self.drivers {
            writeln!(f)?;
            writeln!(f, "Driver: {}", entry.driver)?;
            for (lap, outcome) in &entry.deltas {
                writeln!(f, "  SC Lap {}: {}", lap, outcome)?;
            }
        }
        Ok(())
    }
}
