//! Persistence layer for the alert monitor.
//!
//! Provides SQLite-backed storage for expiring alerts and the capped active list.

pub mod alerts;
pub mod db;

pub use db::{init_database, Database};
