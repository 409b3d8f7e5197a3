//! Safety-car time windows

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use super::session_time;
use crate::{AnalysisError, Result};

/// Interval of session time during which the safety car was deployed.
///
/// `start` is strictly before `end`; both are inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetyCarWindow {
    #[serde(serialize_with = "session_time::serialize")]
    start: Duration,
    #[serde(serialize_with = "session_time::serialize")]
    end: Duration,
}

impl SafetyCarWindow {
    /// Create a window, failing with [`AnalysisError::MalformedWindow`] unless `start < end`.
    pub fn new(start: Duration, end: Duration) -> Result<Self> {
        if end <= start {
            return Err(AnalysisError::MalformedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn end(&self) -> Duration {
        self.end
    }

    /// Whether `time` lies inside the window, bounds included.
    pub fn contains(&self, time: Duration) -> bool {
        self.start <= time && time <= self.end
    }

    /// Whether the two windows share at least one instant.
    pub fn overlaps(&self, other: &SafetyCarWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for SafetyCarWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "From {:.3}s to {:.3}s", self.start.as_secs_f64(), self.end.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn bounds_are_inclusive() {
        let window = SafetyCarWindow::new(secs(100), secs(200)).unwrap();
        assert!(window.contains(secs(100)));
        assert!(window.contains(secs(150)));
        assert!(window.contains(secs(200)));
        assert!(!window.contains(secs(99)));
        assert!(!window.contains(secs(201)));
        assert_eq!(window.length(), secs(100));
    }

    #[test]
    fn end_before_start_is_malformed() {
        let err = SafetyCarWindow::new(secs(200), secs(100)).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedWindow { .. }));
    }

    #[test]
    fn zero_length_window_is_malformed() {
        let err = SafetyCarWindow::new(secs(100), secs(100)).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedWindow { .. }));
    }

    #[test]
    fn overlap_detection() {
        let a = SafetyCarWindow::new(secs(100), secs(200)).unwrap();
        let b = SafetyCarWindow::new(secs(200), secs(300)).unwrap();
        let c = SafetyCarWindow::new(secs(301), secs(400)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!b.overlaps(&c));
    }

    #[test]
    fn display_in_seconds() {
        let window = SafetyCarWindow::new(Duration::from_millis(1500), secs(3)).unwrap();
        assert_eq!(window.to_string(), "From 1.500s to 3.000s");
    }
}
