//! Background loops for continuous processing.

pub mod altitude_loop;
pub mod zone_refresh_loop;

pub use altitude_loop::MonitorLoop;
