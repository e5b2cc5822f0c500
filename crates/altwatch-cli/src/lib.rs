//! Altwatch CLI - command line tools for the altitude monitor.
//!
//! Binaries:
//! - send_position: report a descending aircraft track
//! - alerts: inspect active alerts, history and per-aircraft status

pub mod client;
pub mod track;

pub use client::AltwatchClient;
pub use track::DescendingTrack;
