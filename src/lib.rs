//! Safety-car detection and pace analysis for race timing data.
//!
//! Safetycar takes one race session's lap timing and race-control messages,
//! works out when the safety car was on track, flags the laps it affected and
//! compares each driver's pace before and after every intervention.
//!
//! # Pipeline
//!
//! - [`WindowExtractor`] pairs race-control messages into [`SafetyCarWindow`]s
//! - [`SafetyCarLookup`] flags each [`LapRecord`] whose start time falls in a window
//! - [`Driver`] answers average-pace and before/after delta queries on green-flag laps
//! - [`Race`] collects drivers and the session-wide set of safety-car laps
//!
//! [`SessionAnalyzer`] runs the whole pipeline against any [`SessionProvider`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use safetycar::{AnalysisConfig, SessionAnalyzer, SnapshotProvider};
//!
//! fn main() -> safetycar::Result<()> {
//!     let mut provider = SnapshotProvider::open("silverstone-2023-race.yaml")?;
//!     let config = AnalysisConfig::default().with_drivers(["HAM", "VER"]);
//!
//!     let analysis = SessionAnalyzer::new(config)?.analyze(&mut provider)?;
//!     println!("{}", analysis.race());
//!     println!("Safety Car Laps (by lap number): {:?}", analysis.safety_car_laps());
//!     print!("{}", analysis.delta_report());
//!     Ok(())
//! }
//! ```
//!
//! # Building a session by hand
//!
//! ```rust
//! use safetycar::{Driver, LapRecord, Race, SafetyCarLookup, SafetyCarWindow};
//! use std::time::Duration;
//!
//! let windows = vec![
//!     SafetyCarWindow::new(Duration::from_secs(595), Duration::from_secs(650)).unwrap(),
//! ];
//!
//! let mut driver = Driver::new("Lewis Hamilton", "Mercedes");
//! for (lap, time, start) in [(5, 90.0, 500), (6, 110.0, 600), (7, 92.0, 710)] {
//!     let record = LapRecord::new(lap, time, Some(Duration::from_secs(start))).unwrap();
//!     driver.add_lap(windows.classify_lap(record));
//! }
//!
//! let mut race = Race::new("Silverstone", 52).unwrap();
//! race.add_driver(driver);
//!
//! assert_eq!(race.safety_car_laps().into_iter().collect::<Vec<_>>(), vec![6]);
//! assert_eq!(race.drivers()[0].lap_delta_around(6, 1), Some(2.0));
//! ```

mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Analysis pipeline
pub mod analysis;
pub mod classify;
pub mod config;
pub mod driver;
pub mod extract;
pub mod race;
pub mod report;

// Data sources
pub mod provider;
pub mod providers;

// Core exports
pub use error::*;
pub use types::{LapRecord, RaceControlMessage, RawLap, SafetyCarWindow};

// Pipeline exports
pub use analysis::{DroppedLap, IngestStats, SessionAnalysis, SessionAnalyzer};
pub use classify::{IndexedWindows, SafetyCarLookup};
pub use config::AnalysisConfig;
pub use driver::{DEFAULT_DELTA_WINDOW, Driver};
pub use extract::{MarkerConfig, PairingStrategy, RejectedWindow, WindowExtraction, WindowExtractor};
pub use race::Race;
pub use report::{DeltaOutcome, DeltaReport, DriverDeltas};

// Data source exports
pub use provider::{DriverEntry, SessionProvider, SessionSummary};
pub use providers::{SessionSnapshot, SnapshotProvider};
