//! Resource State Manager
//!
//! Materialized view of everything fetched so far, keyed by
//! (resource kind, scope). The presentation layer renders from here and
//! never talks to fetchers directly.

mod manager;
mod preload;

pub use manager::ResourceState;
pub use preload::{PreloadFailure, PreloadSummary, ProgressFn};
