//! End-to-end analysis of a recorded session
//!
//! Loads `test-data/safety_car_session.yaml` through the snapshot provider and
//! checks windows, lap flags, deltas and data-quality counts.

use std::path::PathBuf;
use std::time::Duration;

use safetycar::{
    AnalysisConfig, DeltaOutcome, Driver, LapRecord, LapRejection, PairingStrategy, Race,
    SafetyCarLookup, SafetyCarWindow, SessionAnalysis, SessionAnalyzer, SnapshotProvider,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data").join("safety_car_session.yaml")
}

fn analyze(config: AnalysisConfig) -> SessionAnalysis {
    let _ = tracing_subscriber::fmt::try_init();
    let mut provider = SnapshotProvider::open(fixture()).expect("fixture should load");
    SessionAnalyzer::new(config).expect("valid config").analyze(&mut provider).expect("analysis")
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("expected a computed delta");
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[test]
fn naive_pairing_discards_trailing_deploy() {
    let analysis = analyze(AnalysisConfig::default());
    let extraction = analysis.extraction();

    assert_eq!(extraction.matched_messages, 5);
    let related: Vec<&str> =
        extraction.safety_car_messages().iter().map(|m| m.message.as_str()).collect();
    assert_eq!(related[0], "SAFETY CAR DEPLOYED");
    assert_eq!(related[2], "VIRTUAL SAFETY CAR DEPLOYED");
    assert!(!related.contains(&"YELLOW IN TRACK SECTOR 7"));
    assert_eq!(extraction.windows().len(), 2);
    assert_eq!(extraction.unpaired_trailing, 1);
    assert_eq!(extraction.windows()[0].start(), Duration::from_secs(3770));
    assert_eq!(extraction.windows()[1].end(), Duration::from_secs(4420));
}

#[test]
fn keyed_pairing_reports_unmatched_deploy() {
    let analysis = analyze(AnalysisConfig::default().with_strategy(PairingStrategy::Keyed));
    let extraction = analysis.extraction();

    assert_eq!(extraction.windows().len(), 2);
    assert_eq!(extraction.discarded_deploys, 1);
    assert_eq!(extraction.discarded_withdrawals, 0);
}

#[test]
fn safety_car_laps_are_the_union_across_drivers() {
    let analysis = analyze(AnalysisConfig::default());
    let laps: Vec<u32> = analysis.safety_car_laps().into_iter().collect();
    assert_eq!(laps, vec![5, 6, 11]);

    let norris = analysis.race().driver("Lando Norris").unwrap();
    assert!(norris.lap(6).unwrap().is_safety_car());
    assert!(!norris.lap(7).unwrap().is_safety_car());
}

#[test]
fn deltas_and_missing_data_are_reported() {
    let analysis = analyze(AnalysisConfig::default());
    let report = analysis.delta_report();

    assert_eq!(report.window_size, 3);
    assert_eq!(report.safety_car_laps, vec![5, 6, 11]);

    let norris = report.driver("Lando Norris").unwrap();
    assert_close(norris.outcome(5).and_then(|o| o.value()), 0.3);
    assert_close(norris.outcome(11).and_then(|o| o.value()), 0.85);

    let piastri = report.driver("Oscar Piastri").unwrap();
    assert_close(piastri.outcome(5).and_then(|o| o.value()), 0.5);
    assert_close(piastri.outcome(6).and_then(|o| o.value()), 0.2);
    assert_eq!(piastri.outcome(11), Some(DeltaOutcome::InsufficientData));

    let missing: Vec<(&str, u32)> = report.insufficient().collect();
    assert_eq!(missing, vec![("Oscar Piastri", 11)]);

    let printed = report.to_string();
    assert!(printed.contains("SC Lap 11: Not enough data"));
}

#[test]
fn invalid_laps_never_reach_the_driver() {
    let analysis = analyze(AnalysisConfig::default());
    let stats = analysis.stats();

    assert_eq!(stats.laps_accepted, 22);
    assert_eq!(stats.laps_dropped(), 2);
    assert_eq!(stats.dropped_for(LapRejection::MissingDuration), 1);
    assert_eq!(stats.dropped_for(LapRejection::NonPositiveDuration(0.0)), 1);
    assert_eq!(stats.missing_start_time, 1);

    let piastri = analysis.race().driver("Oscar Piastri").unwrap();
    assert!(piastri.lap(3).is_none());
    assert!(piastri.lap(8).is_none());
    assert!(!piastri.lap(10).unwrap().is_safety_car());
}

#[test]
fn average_pace_excludes_safety_car_laps() {
    let analysis = analyze(AnalysisConfig::default());
    let norris = analysis.race().driver("Lando Norris").unwrap();

    // Laps 7..=10 are all green.
    assert_close(norris.average_lap_time(Some(11), Some(6)), 93.1);
    // Laps 5 and 6 are the only candidates, both behind the safety car.
    assert_eq!(norris.average_lap_time(Some(7), Some(4)), None);
}

#[test]
fn single_driver_scenario_with_tight_window() {
    let t5 = Duration::from_secs(500);
    let t6 = Duration::from_secs(600);
    let t7 = Duration::from_secs(700);
    let epsilon = Duration::from_millis(1);
    let windows = vec![SafetyCarWindow::new(t6 - epsilon, t6 + epsilon).unwrap()];

    let mut driver = Driver::new("Lewis Hamilton", "Mercedes");
    for (lap, time, start) in [(5, 90.0, t5), (6, 110.0, t6), (7, 92.0, t7)] {
        driver.add_lap(windows.classify_lap(LapRecord::new(lap, time, Some(start)).unwrap()));
    }

    let mut race = Race::new("Silverstone", 52).unwrap();
    race.add_driver(driver);

    assert_eq!(race.safety_car_laps().into_iter().collect::<Vec<_>>(), vec![6]);
    assert_eq!(race.drivers()[0].lap_delta_around(6, 1), Some(2.0));
}
