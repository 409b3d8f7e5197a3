//! Snapshot provider for recorded sessions

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::provider::{DriverEntry, SessionProvider, SessionSummary};
use crate::types::RaceControlMessage;
use crate::{AnalysisError, Result};

/// A whole session as a YAML document.
///
/// ```yaml
/// track_name: Silverstone
/// total_laps: 52
/// drivers:
///   - code: HAM
///     name: Lewis Hamilton
///     team: Mercedes
///     laps:
///       - { lap_number: 1, lap_duration: 98.2, lap_start_time: 3412.0 }
/// race_control:
///   - { message: SAFETY CAR DEPLOYED, time: 5120.4 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub track_name: String,
    pub total_laps: u32,
    #[serde(default)]
    pub drivers: Vec<DriverEntry>,
    /// Race-control messages ordered by time
    #[serde(default)]
    pub race_control: Vec<RaceControlMessage>,
}

impl SessionSnapshot {
    /// Parse a snapshot document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let snapshot: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| AnalysisError::parse_error("session snapshot", e.to_string()))?;

        if snapshot.total_laps == 0 {
            return Err(AnalysisError::parse_error(
                "session snapshot",
                "total_laps must be at least 1",
            ));
        }

        Ok(snapshot)
    }
}

/// Provider that serves a recorded [`SessionSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: SessionSnapshot,
    source: Option<PathBuf>,
}

impl SnapshotProvider {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self { snapshot, source: None }
    }

    /// Load a snapshot file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::file_error(path.to_path_buf(), e))?;
        let snapshot = SessionSnapshot::from_yaml_str(&yaml)?;

        info!(
            path = %path.display(),
            track = %snapshot.track_name,
            drivers = snapshot.drivers.len(),
            messages = snapshot.race_control.len(),
            "Opened session snapshot"
        );

        Ok(Self { snapshot, source: Some(path.to_path_buf()) })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(Self::new(SessionSnapshot::from_yaml_str(yaml)?))
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// File the snapshot was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl SessionProvider for SnapshotProvider {
    fn session_summary(&mut self) -> Result<SessionSummary> {
        Ok(SessionSummary {
            track_name: self.snapshot.track_name.clone(),
            total_laps: self.snapshot.total_laps,
        })
    }

    fn driver_codes(&mut self) -> Result<Vec<String>> {
        Ok(self.snapshot.drivers.iter().map(|d| d.code.clone()).collect())
    }

    fn driver_entry(&mut self, code: &str) -> Result<DriverEntry> {
        let entry = self
            .snapshot
            .drivers
            .iter()
            .find(|d| d.code.eq_ignore_ascii_case(code))
            .cloned()
            .ok_or_else(|| {
                AnalysisError::provider_failure(format!(
                    "driver {} not found in {} snapshot",
                    code, self.snapshot.track_name
                ))
            })?;

        debug!(code, laps = entry.laps.len(), "Served driver entry from snapshot");
        Ok(entry)
    }

    fn race_control_messages(&mut self) -> Result<Vec<RaceControlMessage>> {
        Ok(self.snapshot.race_control.clone())
    }
}
