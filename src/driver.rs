//! Per-driver lap aggregate and pace queries

use serde::Serialize;
use std::fmt;

use crate::types::LapRecord;

/// Laps either side of a safety-car lap compared by [`Driver::lap_delta_around`].
pub const DEFAULT_DELTA_WINDOW: u32 = 3;

/// One driver's classified laps for a session.
///
/// Laps are kept in ingestion order, which need not be lap-number order.
/// Every pace query skips safety-car laps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    name: String,
    team: String,
    laps: Vec<LapRecord>,
}

impl Driver {
    pub fn new(name: impl Into<String>, team: impl Into<String>) -> Self {
        Self { name: name.into(), team: team.into(), laps: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn add_lap(&mut self, lap: LapRecord) {
        self.laps.push(lap);
    }

    /// Look up a lap by its number.
    pub fn lap(&self, lap_number: u32) -> Option<&LapRecord> {
        self.laps.iter().find(|lap| lap.lap_number() == lap_number)
    }

    /// Lap numbers this driver completed behind the safety car, in ingestion order.
    pub fn safety_car_laps(&self) -> impl Iterator<Item = u32> + '_ {
        self.laps.iter().filter(|lap| lap.is_safety_car()).map(LapRecord::lap_number)
    }

    /// Mean lap time over green-flag laps with `lap_number < before_lap` and
    /// `lap_number > after_lap`. Either bound may be omitted.
    ///
    /// Both bounds are exclusive. Returns `None` when no lap qualifies.
    pub fn average_lap_time(&self, before_lap: Option<u32>, after_lap: Option<u32>) -> Option<f64> {
        mean(
            self.green_laps()
                .filter(|lap| before_lap.is_none_or(|before| lap.lap_number() < before))
                .filter(|lap| after_lap.is_none_or(|after| lap.lap_number() > after))
                .map(LapRecord::duration),
        )
    }

    /// Difference between mean pace after and before `sc_lap_number`.
    ///
    /// Compares green-flag laps in `[sc - window_size, sc)` with those in
    /// `(sc, sc + window_size]`. A positive value means the driver was slower
    /// afterwards. Returns `None` unless both sides have at least one lap.
    pub fn lap_delta_around(&self, sc_lap_number: u32, window_size: u32) -> Option<f64> {
        let first = sc_lap_number.saturating_sub(window_size);
        let last = sc_lap_number.saturating_add(window_size);

        let before = mean(
            self.green_laps()
                .filter(|lap| (first..sc_lap_number).contains(&lap.lap_number()))
                .map(LapRecord::duration),
        )?;
        let after = mean(
            self.green_laps()
                .filter(|lap| lap.lap_number() > sc_lap_number && lap.lap_number() <= last)
                .map(LapRecord::duration),
        )?;

        Some(after - before)
    }

    fn green_laps(&self) -> impl Iterator<Item = &LapRecord> {
        self.laps.iter().filter(|lap| !lap.is_safety_car())
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Driver {} ({})>", self.name, self.team)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
