//! Cloudscope - cached, retrying resource browser engine
//!
//! Lists cloud resources across many projects through a TTL + size-bounded
//! LRU cache, a resilient call executor and a per-scope state manager.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod models;
pub mod state;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{Cache, CacheStats};
pub use config::Config;
pub use context::AppContext;
pub use error::{CallError, FailureKind, StateError};
pub use executor::{RetryExecutor, RetryPolicy};
pub use fetch::{FetcherRegistry, ResourceFetcher};
pub use models::{Resource, ResourceKind, Scope};
pub use state::{PreloadSummary, ResourceState};
