//! Low-altitude hazard monitor.
//!
//! Scans tracked aircraft on a fixed period, raises alerts for anything
//! flying below the minimum safe altitude outside airport zones, and serves
//! the results over a REST API.

pub mod alerts;
pub mod api;
pub mod backoff;
pub mod config;
pub mod error;
pub mod loops;
pub mod monitor;
pub mod persistence;
pub mod query;
pub mod state;
pub mod zones;
