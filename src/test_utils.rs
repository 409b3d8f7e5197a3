//! Test utilities for building laps, windows and sessions
//!
//! Shared by unit tests and the benchmarks.

#![cfg(any(test, feature = "benchmark"))]

use std::time::Duration;

use crate::driver::Driver;
use crate::types::{LapRecord, RaceControlMessage, SafetyCarWindow};

/// A short Silverstone session with one safety-car period around lap 6.
///
/// Lewis Hamilton has clean laps on both sides of the period. Max Verstappen's
/// lap 5 has no time, lap 8 has a zero time and lap 9 has no start time.
pub const SAMPLE_SNAPSHOT: &str = r#"
track_name: Silverstone
total_laps: 52
drivers:
  - code: HAM
    name: Lewis Hamilton
    team: Mercedes
    laps:
      - { lap_number: 4, lap_duration: 88.0, lap_start_time: 400.0 }
      - { lap_number: 5, lap_duration: 90.0, lap_start_time: 500.0 }
      - { lap_number: 6, lap_duration: 110.0, lap_start_time: 600.0 }
      - { lap_number: 7, lap_duration: 92.0, lap_start_time: 710.0 }
      - { lap_number: 8, lap_duration: 91.0, lap_start_time: 802.0 }
  - code: VER
    name: Max Verstappen
    team: Red Bull Racing
    laps:
      - { lap_number: 5, lap_start_time: 499.0 }
      - { lap_number: 6, lap_duration: 111.0, lap_start_time: 601.0 }
      - { lap_number: 7, lap_duration: 93.0, lap_start_time: 712.0 }
      - { lap_number: 8, lap_duration: 0.0, lap_start_time: 805.0 }
      - { lap_number: 9, lap_duration: 92.5 }
race_control:
  - { message: GREEN LIGHT - PIT EXIT OPEN, time: 10.0 }
  - { message: SAFETY CAR DEPLOYED, time: 595.0 }
  - { message: DRS DISABLED, time: 596.5 }
  - { message: SAFETY CAR IN THIS LAP, time: 650.0 }
  - { message: DRS ENABLED, time: 900.0 }
"#;

pub fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

pub fn message(text: &str, at_secs: u64) -> RaceControlMessage {
    RaceControlMessage::new(text, secs(at_secs))
}

/// Window between two whole seconds. Panics unless `start < end`.
pub fn window(start: u64, end: u64) -> SafetyCarWindow {
    SafetyCarWindow::new(secs(start), secs(end)).expect("test window must move forward in time")
}

/// Lap starting at `100 * lap_number` seconds with the given flag.
pub fn lap(lap_number: u32, duration: f64, is_safety_car: bool) -> LapRecord {
    LapRecord::new(lap_number, duration, Some(secs(100 * u64::from(lap_number))))
        .expect("test lap must be valid")
        .classified(is_safety_car)
}

/// Driver holding `(lap_number, duration, is_safety_car)` rows in the given order.
pub fn driver_with_laps(rows: &[(u32, f64, bool)]) -> Driver {
    let mut driver = Driver::new("Test Driver", "Test Team");
    for &(lap_number, duration, is_safety_car) in rows {
        driver.add_lap(lap(lap_number, duration, is_safety_car));
    }
    driver
}

/// Evenly spaced windows and lap start times for a session of `laps` laps.
pub fn synthetic_session(laps: u32, windows: usize) -> (Vec<SafetyCarWindow>, Vec<Duration>) {
    let lap_secs = 90;
    let session = u64::from(laps) * lap_secs;
    let stride = session / (windows as u64 + 1);

    let sc_windows = (1..=windows as u64)
        .map(|i| window(i * stride, i * stride + 2 * lap_secs))
        .collect();
    let starts = (0..u64::from(laps)).map(|n| secs(n * lap_secs)).collect();

    (sc_windows, starts)
}
