//! Core value types for session timing data.
//!
//! This module holds the data model the analysis runs over:
//! - [`RawLap`] is a lap row exactly as the timing provider delivers it, with optional fields
//! - [`LapRecord`] is a validated lap that can be stored on a driver
//! - [`RaceControlMessage`] is a timestamped race-control text message
//! - [`SafetyCarWindow`] is an interval of session time during which the safety car was out
//!
//! All timestamps are offsets from the start of the session, represented as
//! [`std::time::Duration`]. In serialized form they are plain seconds.
//!
//! ## Usage Example
//!
//! ```rust
//! use safetycar::types::{LapRecord, RawLap, SafetyCarWindow};
//! use std::time::Duration;
//!
//! let raw = RawLap::new(12, Some(91.4), Some(Duration::from_secs_f64(1130.2)));
//! let lap = LapRecord::from_raw(&raw).unwrap();
//!
//! let window =
//!     SafetyCarWindow::new(Duration::from_secs(1100), Duration::from_secs(1300)).unwrap();
//! assert!(window.contains(lap.start_time().unwrap()));
//! ```

mod lap;
mod message;
pub mod session_time;
mod window;

pub use lap::{LapRecord, RawLap};
pub use message::RaceControlMessage;
pub use window::SafetyCarWindow;
