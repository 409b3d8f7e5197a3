//! Lap classification against safety-car windows
//!
//! A lap is safety-car-affected when its start time falls inside any window,
//! bounds included. A lap without a start time cannot be placed on the session
//! clock and is treated as unaffected.
//!
//! [`SafetyCarLookup`] is implemented for a plain window slice (linear scan)
//! and for [`IndexedWindows`], which answers in O(log windows).

use std::time::Duration;
use tracing::trace;

use crate::types::{LapRecord, SafetyCarWindow};

/// Answers whether a point in session time is covered by a safety car.
pub trait SafetyCarLookup {
    /// Whether `time` lies inside any window.
    fn covers(&self, time: Duration) -> bool;

    /// Classify a lap start time. Absent start times are never safety-car laps.
    fn classify(&self, start_time: Option<Duration>) -> bool {
        start_time.is_some_and(|time| self.covers(time))
    }

    /// Return the lap with its safety-car flag assigned.
    fn classify_lap(&self, lap: LapRecord) -> LapRecord {
        let is_safety_car = self.classify(lap.start_time());
        trace!(lap = lap.lap_number(), is_safety_car, "Classified lap");
        lap.classified(is_safety_car)
    }
}

impl SafetyCarLookup for [SafetyCarWindow] {
    fn covers(&self, time: Duration) -> bool {
        self.iter().any(|window| window.contains(time))
    }
}

/// Windows sorted by start and merged where they overlap.
///
/// Built once per session; lookups are a binary search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedWindows {
    spans: Vec<(Duration, Duration)>,
}

impl IndexedWindows {
    pub fn new(windows: &[SafetyCarWindow]) -> Self {
        let mut sorted: Vec<(Duration, Duration)> =
            windows.iter().map(|w| (w.start(), w.end())).collect();
        sorted.sort_unstable();

        let mut spans: Vec<(Duration, Duration)> = Vec::with_capacity(sorted.len());
        for (start, end) in sorted {
            match spans.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => spans.push((start, end)),
            }
        }

        Self { spans }
    }

    /// Number of disjoint spans after merging.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl SafetyCarLookup for IndexedWindows {
    fn covers(&self, time: Duration) -> bool {
        // First span starting after `time`; the one before it is the only candidate.
        let idx = self.spans.partition_point(|(start, _)| *start <= time);
        idx > 0 && time <= self.spans[idx - 1].1
    }
}
