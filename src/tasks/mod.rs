//! Background Tasks Module
//!
//! Periodic sweeps that reclaim memory from stale and excess entries.

mod sweep;

pub use sweep::{spawn_capacity_sweep, spawn_expiry_sweep};
