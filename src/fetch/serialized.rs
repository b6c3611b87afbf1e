//! Client handles that must not be used concurrently.
//!
//! Some regional list calls corrupt each other when issued concurrently on
//! the same client handle. Fetchers route those calls through
//! [`SerializedClient::call`], which admits one call at a time, while the
//! state manager above remains free to fan out.

use std::future::Future;

use tokio::sync::Mutex;

// == Serialized Client ==
#[derive(Debug)]
pub struct SerializedClient<C> {
    client: C,
    gate: Mutex<()>,
}

impl<C> SerializedClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            gate: Mutex::new(()),
        }
    }

    /// Runs `f` against the client once every earlier call has finished.
    pub async fn call<'a, T, F, Fut>(&'a self, f: F) -> T
    where
        F: FnOnce(&'a C) -> Fut,
        Fut: Future<Output = T>,
    {
        let _turn = self.gate.lock().await;
        f(&self.client).await
    }

    /// Direct access for calls that are safe to overlap.
    pub fn get_ref(&self) -> &C {
        &self.client
    }
}
