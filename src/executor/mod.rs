//! Resilient Call Executor
//!
//! Wraps one remote operation with a per-attempt timeout, classifies its
//! failures, retries transient ones with exponential backoff and fails fast
//! on everything else.

mod classify;
mod retry;

pub use classify::{classify, describe_failure, RemoteCode, RemoteError};
pub use retry::{RetryExecutor, RetryPolicy};
