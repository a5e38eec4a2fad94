//! Background Tasks Module
//!
//! Contains background tasks that run during server operation.
//!
//! # Tasks
//! - Sweeper: drives the memory tier's TTL expiry and size-cap eviction

mod sweeper;

pub use sweeper::{spawn_sweeper, SWEEP_INTERVAL};
