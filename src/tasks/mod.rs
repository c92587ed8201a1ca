//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the host is up.
//!
//! # Tasks
//! - Sweep: removes expired cache entries and stale rate windows at
//!   configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
