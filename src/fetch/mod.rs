//! Fetcher seam
//!
//! A fetcher turns one remote listing into [`Resource`] records. The state
//! manager only sees the [`ResourceFetcher`] trait; concrete adapters are
//! registered per kind in a [`FetcherRegistry`].

mod inventory;
mod read_through;
mod serialized;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Resource, ResourceKind, Scope};

pub use inventory::{Inventory, InventoryFetcher};
pub use read_through::FetchSupport;
pub use serialized::SerializedClient;

// == Resource Fetcher ==
/// Lists the resources of one kind under a scope.
///
/// Implementations must be idempotent and should swallow remote failures
/// (log, return an empty collection) once their own retry policy is spent.
/// An `Err` is reserved for failures the caller must see.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn list(&self, scope: &Scope, use_cache: bool) -> anyhow::Result<Vec<Resource>>;
}

// == Fetcher Registry ==
/// One fetcher per resource kind.
#[derive(Clone, Default)]
pub struct FetcherRegistry {
    fetchers: HashMap<ResourceKind, Arc<dyn ResourceFetcher>>,
}

impl FetcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `fetcher` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: ResourceKind, fetcher: Arc<dyn ResourceFetcher>) {
        self.fetchers.insert(kind, fetcher);
    }

    pub fn get(&self, kind: ResourceKind) -> Option<Arc<dyn ResourceFetcher>> {
        self.fetchers.get(&kind).cloned()
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.fetchers.contains_key(&kind)
    }

    /// Registered kinds, in declaration order.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut kinds: Vec<ResourceKind> = self.fetchers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}

impl fmt::Debug for FetcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetcherRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
