//! Session data provider implementations

pub mod snapshot;

pub use snapshot::{SessionSnapshot, SnapshotProvider};
