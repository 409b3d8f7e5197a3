//! Session ingestion and analysis pipeline
//!
//! [`SessionAnalyzer::analyze`] pulls one session from a [`SessionProvider`],
//! extracts safety-car windows, classifies every lap and builds the [`Race`]
//! aggregate. Bad laps are excluded and counted in [`IngestStats`]; provider
//! errors abort the run.
//!
//! ```text
//! provider ──► race-control messages ──► WindowExtractor ──► windows
//!    │                                                          │
//!    └──────► raw laps ──► LapRecord::from_raw ──► classify ◄───┘
//!                                                     │
//!                                     Driver::add_lap ──► Race::add_driver
//! ```

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, warn};

use crate::classify::{IndexedWindows, SafetyCarLookup};
use crate::config::AnalysisConfig;
use crate::driver::Driver;
use crate::error::LapRejection;
use crate::extract::{WindowExtraction, WindowExtractor};
use crate::provider::{DriverEntry, SessionProvider};
use crate::race::Race;
use crate::report::DeltaReport;
use crate::types::{LapRecord, SafetyCarWindow};
use crate::{AnalysisError, Result};

/// A lap row that never reached a driver's lap list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedLap {
    pub driver: String,
    pub lap_number: u32,
    #[serde(serialize_with = "serialize_rejection")]
    pub reason: LapRejection,
}

fn serialize_rejection<S>(reason: &LapRejection, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(reason)
}

/// Data-quality counts gathered while ingesting laps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestStats {
    /// Laps stored on a driver
    pub laps_accepted: usize,
    /// Stored laps without a start time, classified as green-flag laps
    pub missing_start_time: usize,
    /// Every rejected row with its reason
    pub dropped: Vec<DroppedLap>,
}

impl IngestStats {
    pub fn laps_dropped(&self) -> usize {
        self.dropped.len()
    }

    /// Number of dropped rows for one rejection kind.
    pub fn dropped_for(&self, reason: LapRejection) -> usize {
        self.dropped
            .iter()
            .filter(|d| std::mem::discriminant(&d.reason) == std::mem::discriminant(&reason))
            .count()
    }
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionAnalysis {
    race: Race,
    extraction: WindowExtraction,
    stats: IngestStats,
    delta_window: u32,
}

impl SessionAnalysis {
    pub fn race(&self) -> &Race {
        &self.race
    }

    pub fn extraction(&self) -> &WindowExtraction {
        &self.extraction
    }

    pub fn windows(&self) -> &[SafetyCarWindow] {
        self.extraction.windows()
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn safety_car_laps(&self) -> BTreeSet<u32> {
        self.race.safety_car_laps()
    }

    /// Deltas around every safety-car lap using the configured window size.
    pub fn delta_report(&self) -> DeltaReport {
        self.race.delta_report(self.delta_window)
    }

    pub fn into_race(self) -> Race {
        self.race
    }
}

/// Runs the ingestion pipeline for one session.
#[derive(Debug, Clone)]
pub struct SessionAnalyzer {
    config: AnalysisConfig,
    extractor: WindowExtractor,
}

impl SessionAnalyzer {
    /// Create an analyzer, validating the configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let extractor = WindowExtractor::new(config.strategy, &config.markers)?;
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Fetch, classify and aggregate one session.
    pub fn analyze<P>(&self, provider: &mut P) -> Result<SessionAnalysis>
    where
        P: SessionProvider + ?Sized,
    {
        let summary = provider.session_summary()?;
        if summary.total_laps == 0 {
            return Err(AnalysisError::provider_failure(format!(
                "session at {} reports zero laps",
                summary.track_name
            )));
        }
        info!(track = %summary.track_name, total_laps = summary.total_laps, "Analyzing session");

        let messages = provider.race_control_messages()?;
        let extraction = self.extractor.extract(&messages);
        info!(
            strategy = ?extraction.strategy,
            windows = extraction.windows().len(),
            discarded = extraction.discarded_events(),
            "Extracted safety-car windows"
        );
        let lookup = IndexedWindows::new(extraction.windows());

        let codes = if self.config.drivers.is_empty() {
            provider.driver_codes()?
        } else {
            self.config.drivers.clone()
        };

        let mut race = Race::new(summary.track_name, summary.total_laps)?;
        let mut stats = IngestStats::default();
        let mut seen_codes = HashSet::with_capacity(codes.len());
        for code in &codes {
            if !seen_codes.insert(code.to_ascii_uppercase()) {
                warn!(code = %code, "Skipping repeated driver code");
                continue;
            }
            let entry = provider.driver_entry(code)?;
            race.add_driver(ingest_driver(entry, &lookup, &mut stats));
        }

        info!(
            drivers = race.drivers().len(),
            laps = stats.laps_accepted,
            dropped = stats.laps_dropped(),
            safety_car_laps = ?race.safety_car_laps(),
            "Session ingested"
        );

        Ok(SessionAnalysis { race, extraction, stats, delta_window: self.config.delta_window })
    }
}

fn ingest_driver<L>(entry: DriverEntry, lookup: &L, stats: &mut IngestStats) -> Driver
where
    L: SafetyCarLookup + ?Sized,
{
    let mut driver = Driver::new(entry.name, entry.team);
    let mut seen = HashSet::with_capacity(entry.laps.len());

    for raw in &entry.laps {
        let record = LapRecord::from_raw(raw).and_then(|lap| {
            if seen.insert(lap.lap_number()) { Ok(lap) } else { Err(LapRejection::DuplicateLapNumber) }
        });

        match record {
            Ok(lap) => {
                if lap.start_time().is_none() {
                    debug!(
                        driver = driver.name(),
                        lap = lap.lap_number(),
                        "{}",
                        AnalysisError::MissingData { lap_number: lap.lap_number(), field: "start time" }
                    );
                    stats.missing_start_time += 1;
                }
                driver.add_lap(lookup.classify_lap(lap));
                stats.laps_accepted += 1;
            }
            Err(reason) => {
                warn!(
                    driver = driver.name(),
                    "{}",
                    AnalysisError::InvalidLap { lap_number: raw.lap_number, reason }
                );
                stats.dropped.push(DroppedLap {
                    driver: driver.name().to_string(),
                    lap_number: raw.lap_number,
                    reason,
                });
            }
        }
    }

    debug!(
        driver = driver.name(),
        team = driver.team(),
        laps = driver.laps().len(),
        safety_car_laps = driver.safety_car_laps().count(),
        "Driver ingested"
    );
    driver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PairingStrategy;
    use crate::provider::SessionSummary;
    use crate::providers::{SessionSnapshot, SnapshotProvider};
    use crate::test_utils::{SAMPLE_SNAPSHOT, secs};
    use crate::types::{RaceControlMessage, RawLap};

    /// Provider that fails at a chosen call.
    struct FailingProvider {
        fail_messages: bool,
    }

    impl SessionProvider for FailingProvider {
        fn session_summary(&mut self) -> Result<SessionSummary> {
            Ok(SessionSummary { track_name: "Imola".to_string(), total_laps: 63 })
        }

        fn driver_codes(&mut self) -> Result<Vec<String>> {
            Ok(vec!["LEC".to_string()])
        }

        fn driver_entry(&mut self, _code: &str) -> Result<DriverEntry> {
            Err(AnalysisError::provider_failure_with_source(
                "lap timing request failed",
                Box::new(std::io::Error::other("connection reset")),
            ))
        }

        fn race_control_messages(&mut self) -> Result<Vec<RaceControlMessage>> {
            if self.fail_messages {
                Err(AnalysisError::provider_failure("race control feed unavailable"))
            } else {
                Ok(vec![])
            }
        }
    }

    fn analyze_sample(config: AnalysisConfig) -> SessionAnalysis {
        let _ = tracing_subscriber::fmt::try_init();
        let mut provider = SnapshotProvider::from_yaml_str(SAMPLE_SNAPSHOT).unwrap();
        SessionAnalyzer::new(config).unwrap().analyze(&mut provider).unwrap()
    }

    #[test]
    fn end_to_end_on_sample_snapshot() {
        let analysis = analyze_sample(AnalysisConfig::default());

        assert_eq!(analysis.race().track_name(), "Silverstone");
        assert_eq!(analysis.windows().len(), 1);
        assert_eq!(analysis.safety_car_laps().into_iter().collect::<Vec<_>>(), vec![6]);

        let ham = analysis.race().driver("Lewis Hamilton").unwrap();
        assert!(ham.lap(6).unwrap().is_safety_car());
        assert!(!ham.lap(5).unwrap().is_safety_car());
        assert_eq!(ham.lap_delta_around(6, 1), Some(2.0));
    }

    #[test]
    fn dropped_laps_are_recorded_with_reasons() {
        let analysis = analyze_sample(AnalysisConfig::default());
        let stats = analysis.stats();

        assert_eq!(stats.dropped_for(LapRejection::MissingDuration), 1);
        assert_eq!(stats.dropped_for(LapRejection::NonPositiveDuration(0.0)), 1);
        assert_eq!(stats.missing_start_time, 1);
        assert!(stats.dropped.iter().all(|d| d.driver == "Max Verstappen"));

        let ver = analysis.race().driver("Max Verstappen").unwrap();
        assert!(ver.laps().iter().all(|lap| lap.duration() > 0.0));
    }

    #[test]
    fn driver_selection_follows_config() {
        let analysis = analyze_sample(AnalysisConfig::default().with_drivers(["VER"]));
        assert_eq!(analysis.race().drivers().len(), 1);
        assert_eq!(analysis.race().drivers()[0].name(), "Max Verstappen");
    }

    #[test]
    fn report_lists_insufficient_pairs() {
        let analysis = analyze_sample(AnalysisConfig::default().with_delta_window(1));
        let report = analysis.delta_report();

        assert_eq!(report.window_size, 1);
        let missing: Vec<(&str, u32)> = report.insufficient().collect();
        assert_eq!(missing, vec![("Max Verstappen", 6)]);
    }

    #[test]
    fn duplicate_lap_numbers_keep_the_first_row() {
        let entry = DriverEntry {
            code: "NOR".to_string(),
            name: "Lando Norris".to_string(),
            team: "McLaren".to_string(),
            laps: vec![
                RawLap::new(4, Some(91.0), Some(secs(400))),
                RawLap::new(4, Some(99.0), Some(secs(500))),
            ],
        };
        let mut stats = IngestStats::default();
        let windows: Vec<SafetyCarWindow> = vec![];
        let driver = ingest_driver(entry, windows.as_slice(), &mut stats);

        assert_eq!(driver.laps().len(), 1);
        assert_eq!(driver.lap(4).unwrap().duration(), 91.0);
        assert_eq!(stats.dropped_for(LapRejection::DuplicateLapNumber), 1);
    }

    #[test]
    fn provider_failures_abort_the_run() {
        let analyzer = SessionAnalyzer::new(AnalysisConfig::default()).unwrap();

        let err = analyzer.analyze(&mut FailingProvider { fail_messages: true }).unwrap_err();
        assert!(matches!(err, AnalysisError::Provider { .. }));

        let err = analyzer.analyze(&mut FailingProvider { fail_messages: false }).unwrap_err();
        assert!(err.is_fatal());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn invalid_config_is_refused() {
        let err = SessionAnalyzer::new(AnalysisConfig::default().with_delta_window(0)).unwrap_err();
        assert!(matches!(err, AnalysisError::Config { .. }));
    }

    #[test]
    fn repeated_driver_codes_in_config_are_refused() {
        let config = AnalysisConfig::default().with_drivers(["HAM", "ham"]);
        let err = SessionAnalyzer::new(config).unwrap_err();
        assert!(matches!(err, AnalysisError::Config { .. }));
    }

    #[test]
    fn repeated_provider_codes_yield_one_driver() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut snapshot = SessionSnapshot::from_yaml_str(SAMPLE_SNAPSHOT).unwrap();
        let mut repeat = snapshot.drivers[0].clone();
        repeat.code = "ham".to_string();
        snapshot.drivers.push(repeat);

        let mut provider = SnapshotProvider::new(snapshot);
        let analysis =
            SessionAnalyzer::new(AnalysisConfig::default()).unwrap().analyze(&mut provider).unwrap();

        assert_eq!(analysis.race().drivers().len(), 2);
        let names: Vec<&str> = analysis.race().drivers().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Lewis Hamilton", "Max Verstappen"]);
        assert_eq!(analysis.delta_report().drivers.len(), 2);
    }

    #[test]
    fn keyed_strategy_on_sample() {
        let analysis = analyze_sample(AnalysisConfig::default().with_strategy(PairingStrategy::Keyed));
        assert_eq!(analysis.extraction().strategy, PairingStrategy::Keyed);
        assert_eq!(analysis.windows().len(), 1);
        assert_eq!(analysis.safety_car_laps().into_iter().collect::<Vec<_>>(), vec![6]);
    }
}
