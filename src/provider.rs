//! Provider trait for session data sources

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::{RaceControlMessage, RawLap};

/// Session-level facts the provider knows before any lap is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub track_name: String,
    pub total_laps: u32,
}

/// One driver's identity and raw lap rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEntry {
    /// Short driver code, e.g. `HAM`
    pub code: String,
    /// Full name, e.g. `Lewis Hamilton`
    pub name: String,
    pub team: String,
    /// Lap rows in the provider's order
    #[serde(default)]
    pub laps: Vec<RawLap>,
}

/// Trait for timing data sources
///
/// Providers abstract over where a session comes from (a web API, a local
/// cache, a recorded snapshot). Calls are blocking and are expected to apply
/// their own timeout and retry policy. Any error returned here aborts the
/// analysis run; the analyzer never retries.
pub trait SessionProvider {
    /// Track name and scheduled race distance
    fn session_summary(&mut self) -> Result<SessionSummary>;

    /// Codes of every driver that took part, in classification order
    fn driver_codes(&mut self) -> Result<Vec<String>>;

    /// Identity and lap rows for one driver
    ///
    /// Returns an error when the provider does not know the driver.
    fn driver_entry(&mut self, code: &str) -> Result<DriverEntry>;

    /// Race-control messages ordered by time
    fn race_control_messages(&mut self) -> Result<Vec<RaceControlMessage>>;
}
