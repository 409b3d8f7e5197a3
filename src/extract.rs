//! Safety-car window extraction from race-control messages
//!
//! Race control announces a safety car with a deploy message and announces its
//! return with an "in this lap" or "ending" message. Two vocabularies show up
//! in practice, so two pairing strategies are supported:
//!
//! - [`PairingStrategy::Naive`] treats every safety-car message as alternately
//!   opening and closing a window.
//! - [`PairingStrategy::Keyed`] matches deploy messages with withdrawal messages
//!   by position and reports whatever is left over.
//!
//! Messages must arrive ordered by time. The extractor never sorts; an
//! out-of-order pair surfaces as a rejected window.
//!
//! ```rust
//! use safetycar::{PairingStrategy, RaceControlMessage, WindowExtractor};
//! use std::time::Duration;
//!
//! let messages = vec![
//!     RaceControlMessage::new("SAFETY CAR DEPLOYED", Duration::from_secs(1200)),
//!     RaceControlMessage::new("SAFETY CAR IN THIS LAP", Duration::from_secs(1420)),
//! ];
//!
//! let extractor = WindowExtractor::with_strategy(PairingStrategy::Keyed);
//! let extraction = extractor.extract(&messages);
//! assert_eq!(extraction.windows().len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::types::{RaceControlMessage, SafetyCarWindow, session_time};
use crate::{AnalysisError, Result};

/// How safety-car messages are paired into windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStrategy {
    /// Message `2i` opens a window, message `2i + 1` closes it.
    #[default]
    Naive,
    /// The k-th deploy message pairs with the k-th withdrawal message.
    Keyed,
}

/// Text markers used to recognise safety-car messages.
///
/// Matching is a case-insensitive substring test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Marker every safety-car message contains
    pub safety_car: String,
    /// Marker of a deploy message (keyed pairing)
    pub deployed: String,
    /// Markers of a withdrawal message (keyed pairing)
    pub withdrawn: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            safety_car: "SAFETY CAR".to_string(),
            deployed: "DEPLOYED".to_string(),
            withdrawn: vec!["ENDING".to_string(), "IN THIS LAP".to_string()],
        }
    }
}

impl MarkerConfig {
    /// Check that no marker is blank.
    pub fn validate(&self) -> Result<()> {
        if self.safety_car.trim().is_empty() {
            return Err(AnalysisError::config_error("safety-car marker is empty"));
        }
        if self.deployed.trim().is_empty() {
            return Err(AnalysisError::config_error("deploy marker is empty"));
        }
        if self.withdrawn.is_empty() || self.withdrawn.iter().any(|m| m.trim().is_empty()) {
            return Err(AnalysisError::config_error("withdrawal markers must be non-empty"));
        }
        Ok(())
    }

    fn normalized(&self) -> Self {
        Self {
            safety_car: self.safety_car.to_uppercase(),
            deployed: self.deployed.to_uppercase(),
            withdrawn: self.withdrawn.iter().map(|m| m.to_uppercase()).collect(),
        }
    }
}

/// A message pair that could not form a window because it did not move forward in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RejectedWindow {
    #[serde(serialize_with = "session_time::serialize")]
    pub start: Duration,
    #[serde(serialize_with = "session_time::serialize")]
    pub end: Duration,
}

/// Outcome of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowExtraction {
    /// Accepted windows, in message order
    pub windows: Vec<SafetyCarWindow>,
    /// Strategy that produced the windows
    pub strategy: PairingStrategy,
    /// Safety-car messages that matched the filter
    pub matched_messages: usize,
    /// The matched messages themselves, in input order
    pub matched: Vec<RaceControlMessage>,
    /// Trailing message left without a partner (naive pairing)
    pub unpaired_trailing: usize,
    /// Deploy messages without a matching withdrawal (keyed pairing)
    pub discarded_deploys: usize,
    /// Withdrawal messages without a matching deploy (keyed pairing)
    pub discarded_withdrawals: usize,
    /// Pairs whose end did not follow their start
    pub rejected: Vec<RejectedWindow>,
    /// Accepted windows that overlap the previously accepted window
    pub overlapping: usize,
}

impl WindowExtraction {
    fn empty(strategy: PairingStrategy) -> Self {
        Self { strategy, ..Self::default() }
    }

    pub fn windows(&self) -> &[SafetyCarWindow] {
        &self.windows
    }

    /// Race-control messages related to the safety car.
    pub fn safety_car_messages(&self) -> &[RaceControlMessage] {
        &self.matched
    }

    /// Total number of messages that did not end up in a window.
    pub fn discarded_events(&self) -> usize {
        self.unpaired_trailing
            + self.discarded_deploys
            + self.discarded_withdrawals
            + 2 * self.rejected.len()
    }

    /// True when every matched message ended up in an accepted, non-overlapping window.
    pub fn is_clean(&self) -> bool {
        self.discarded_events() == 0 && self.overlapping == 0
    }

    fn push_pair(&mut self, start: Duration, end: Duration) {
        match SafetyCarWindow::new(start, end) {
            Ok(window) => {
                if self.windows.last().is_some_and(|previous| previous.overlaps(&window)) {
                    warn!(%window, "Safety-car window overlaps the previous window");
                    self.overlapping += 1;
                }
                debug!(%window, "Safety-car window accepted");
                self.windows.push(window);
            }
            Err(e) => {
                warn!("Rejecting safety-car window: {}", e);
                self.rejected.push(RejectedWindow { start, end });
            }
        }
    }
}

/// Derives safety-car windows from race-control messages.
#[derive(Debug, Clone)]
pub struct WindowExtractor {
    strategy: PairingStrategy,
    markers: MarkerConfig,
}

impl Default for WindowExtractor {
    fn default() -> Self {
        Self::with_strategy(PairingStrategy::default())
    }
}

impl WindowExtractor {
    /// Create an extractor with custom markers.
    pub fn new(strategy: PairingStrategy, markers: &MarkerConfig) -> Result<Self> {
        markers.validate()?;
        Ok(Self { strategy, markers: markers.normalized() })
    }

    /// Create an extractor with the default markers.
    pub fn with_strategy(strategy: PairingStrategy) -> Self {
        Self { strategy, markers: MarkerConfig::default().normalized() }
    }

    pub fn strategy(&self) -> PairingStrategy {
        self.strategy
    }

    /// Extract windows from messages ordered by time.
    pub fn extract(&self, messages: &[RaceControlMessage]) -> WindowExtraction {
        if let Some(pos) = messages.windows(2).position(|pair| pair[1].time < pair[0].time) {
            warn!(
                index = pos + 1,
                "Race-control messages are not ordered by time; windows may be rejected"
            );
        }

        let matched: Vec<&RaceControlMessage> =
            messages.iter().filter(|m| m.mentions(&self.markers.safety_car)).collect();

        debug!(
            strategy = ?self.strategy,
            total = messages.len(),
            matched = matched.len(),
            "Filtered safety-car messages"
        );

        let mut extraction = match self.strategy {
            PairingStrategy::Naive => self.pair_naive(&matched),
            PairingStrategy::Keyed => self.pair_keyed(&matched),
        };
        extraction.matched_messages = matched.len();
        extraction.matched = matched.into_iter().cloned().collect();
        extraction
    }

    fn pair_naive(&self, matched: &[&RaceControlMessage]) -> WindowExtraction {
        let mut extraction = WindowExtraction::empty(PairingStrategy::Naive);

        let pairs = matched.chunks_exact(2);
        let trailing = pairs.remainder();
        for pair in pairs {
            extraction.push_pair(pair[0].time, pair[1].time);
        }

        if let Some(last) = trailing.first() {
            warn!(message = %last.message, "Discarding unpaired trailing safety-car message");
            extraction.unpaired_trailing = trailing.len();
        }

        extraction
    }

    fn pair_keyed(&self, matched: &[&RaceControlMessage]) -> WindowExtraction {
        let mut extraction = WindowExtraction::empty(PairingStrategy::Keyed);

        let (deploys, rest): (Vec<&RaceControlMessage>, Vec<&RaceControlMessage>) =
            matched.iter().copied().partition(|m| m.mentions(&self.markers.deployed));
        let withdrawals: Vec<&RaceControlMessage> = rest
            .into_iter()
            .filter(|m| self.markers.withdrawn.iter().any(|marker| m.mentions(marker)))
            .collect();

        for (deploy, withdrawal) in deploys.iter().zip(withdrawals.iter()) {
            extraction.push_pair(deploy.time, withdrawal.time);
        }

        let paired = deploys.len().min(withdrawals.len());
        extraction.discarded_deploys = deploys.len() - paired;
        extraction.discarded_withdrawals = withdrawals.len() - paired;

        if extraction.discarded_deploys > 0 || extraction.discarded_withdrawals > 0 {
            warn!(
                deploys = deploys.len(),
                withdrawals = withdrawals.len(),
                discarded_deploys = extraction.discarded_deploys,
                discarded_withdrawals = extraction.discarded_withdrawals,
                "Unbalanced safety-car messages"
            );
        }

        extraction
    }
}
