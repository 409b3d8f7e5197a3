//! Race-control messages

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::session_time;

/// A race-control message as published during the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceControlMessage {
    /// Free-text message, e.g. `SAFETY CAR DEPLOYED`
    pub message: String,
    /// Offset from session start
    #[serde(with = "session_time")]
    pub time: Duration,
}

impl RaceControlMessage {
    pub fn new(message: impl Into<String>, time: Duration) -> Self {
        Self { message: message.into(), time }
    }

    /// Case-insensitive substring test against the message text.
    ///
    /// `marker` must already be uppercase.
    pub(crate) fn mentions(&self, marker: &str) -> bool {
        self.message.to_uppercase().contains(marker)
    }
}
