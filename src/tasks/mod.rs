//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the engine is up.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
