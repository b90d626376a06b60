//! Read-through caching client
//!
//! `RcfgClient` serves `get` from memory while an entry is inside its freshness
//! window and refetches it from the remote store otherwise. Every other operation
//! goes straight to the store.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::time::Instant;

use super::entry::{CacheEntry, CacheKey};
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::StoreError;
use crate::gateway::{HttpGateway, Operation, RemoteStore};

/// Client for the configuration service with a local read-through cache
///
/// The cache is unbounded: entries are created on the first successful fetch of a
/// key and replaced on refresh, never removed. Writes through [`set`](Self::set) and
/// [`set_with_ttl`](Self::set_with_ttl) do not invalidate the cached value, so a
/// `get` right after a `set` can return the old value until the window elapses.
///
/// Concurrent misses on the same key are not deduplicated. Each one fetches and
/// writes back; a fetch that completed earlier than the stored one is discarded.
pub struct RcfgClient<S = HttpGateway, C = SystemClock> {
    config: ClientConfig,
    store: S,
    clock: C,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl RcfgClient {
    /// Creates a client talking HTTP to `config.base_url`
    ///
    /// # Returns
    /// * `Err(StoreError::InvalidBaseUrl)` if the base URL is unusable
    pub fn new(config: ClientConfig) -> Result<Self, StoreError> {
        let store = HttpGateway::new(&config.base_url, config.request_timeout)?;
        Ok(Self::with_store(config, store))
    }
}

impl<S: RemoteStore> RcfgClient<S> {
    /// Creates a client over a custom remote store, using the system clock
    pub fn with_store(config: ClientConfig, store: S) -> Self {
        Self::with_store_and_clock(config, store, SystemClock)
    }
}

impl<S: RemoteStore, C: Clock> RcfgClient<S, C> {
    /// Creates a client over a custom remote store and clock
    pub fn with_store_and_clock(config: ClientConfig, store: S, clock: C) -> Self {
        Self {
            config,
            store,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Configuration the client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Reads a value, serving it from the cache while fresh
    ///
    /// # Returns
    /// * `Ok(String)` - the cached value on a hit, or the freshly fetched body
    /// * `Err(StoreError)` - the fetch failed; any existing entry is left as it was
    pub async fn get(&self, namespace: &str, key: &str) -> Result<String, StoreError> {
        let cache_key = CacheKey::new(namespace, key);

        if let Some(value) = self.fresh_value(&cache_key) {
            tracing::debug!(namespace, key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(namespace, key, "cache miss");
        let value = self.store.call(&Operation::Get { namespace, key }).await?;
        tracing::trace!(namespace, key, bytes = value.len(), "fetched value");

        self.store_entry(cache_key, value.clone(), self.clock.now(), self.clock.instant());
        Ok(value)
    }

    /// Writes a value. The cached entry for the key is not touched.
    pub async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<String, StoreError> {
        self.forward(Operation::Set {
            namespace,
            key,
            value,
        })
        .await
    }

    /// Writes a value with a server-side expiry. The cached entry is not touched.
    ///
    /// `ttl` is passed to the server as-is.
    pub async fn set_with_ttl(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
        ttl: &str,
    ) -> Result<String, StoreError> {
        self.forward(Operation::SetWithTtl {
            namespace,
            key,
            value,
            ttl,
        })
        .await
    }

    /// Creates a namespace
    pub async fn add(&self, namespace: &str) -> Result<String, StoreError> {
        self.forward(Operation::Add { namespace }).await
    }

    /// Direct dependencies of `key`
    pub async fn deps(&self, namespace: &str, key: &str) -> Result<String, StoreError> {
        self.forward(Operation::Deps { namespace, key }).await
    }

    /// All dependencies of `key`, transitively
    pub async fn all_deps(&self, namespace: &str, key: &str) -> Result<String, StoreError> {
        self.forward(Operation::AllDeps { namespace, key }).await
    }

    /// Adds the edge `key -> dep` without cycle checking
    pub async fn add_dep(&self, namespace: &str, key: &str, dep: &str) -> Result<String, StoreError> {
        self.forward(Operation::AddDep {
            namespace,
            key,
            dep,
        })
        .await
    }

    /// Adds the edge `key -> dep`; the server rejects it if it would form a cycle
    pub async fn add_dep_ok(
        &self,
        namespace: &str,
        key: &str,
        dep: &str,
    ) -> Result<String, StoreError> {
        self.forward(Operation::AddDepOk {
            namespace,
            key,
            dep,
        })
        .await
    }

    /// Removes the edge `key -> dep`
    pub async fn remove_dep(
        &self,
        namespace: &str,
        key: &str,
        dep: &str,
    ) -> Result<String, StoreError> {
        self.forward(Operation::RemoveDep {
            namespace,
            key,
            dep,
        })
        .await
    }

    /// Keys that depend directly on `key`
    pub async fn dep_on_by(&self, namespace: &str, key: &str) -> Result<String, StoreError> {
        self.forward(Operation::DepOnBy { namespace, key }).await
    }

    /// Keys that depend on `key`, transitively
    pub async fn all_dep_on_by(&self, namespace: &str, key: &str) -> Result<String, StoreError> {
        self.forward(Operation::AllDepOnBy { namespace, key }).await
    }

    /// Snapshot of the cached entry for a key, fresh or not
    pub fn cached(&self, namespace: &str, key: &str) -> Option<CacheEntry> {
        self.entries
            .lock()
            .get(&CacheKey::new(namespace, key))
            .cloned()
    }

    /// Number of keys held in the cache
    pub fn cached_len(&self) -> usize {
        self.entries.lock().len()
    }

    async fn forward(&self, op: Operation<'_>) -> Result<String, StoreError> {
        tracing::debug!(endpoint = op.endpoint(), namespace = op.namespace(), "forwarding");
        self.store.call(&op).await
    }

    fn fresh_value(&self, key: &CacheKey) -> Option<String> {
        let now = self.clock.instant();
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.config.freshness_window))
            .map(|entry| entry.value.clone())
    }

    fn store_entry(
        &self,
        key: CacheKey,
        value: String,
        fetched_at: DateTime<Utc>,
        fetched_instant: Instant,
    ) {
        let mut entries = self.entries.lock();
        match entries.entry(key) {
            Entry::Occupied(mut existing) => {
                if existing.get().fetched_instant <= fetched_instant {
                    // Wall time can step backwards; the recorded timestamp never does
                    let fetched_at = fetched_at.max(existing.get().fetched_at);
                    existing.insert(CacheEntry {
                        value,
                        fetched_at,
                        fetched_instant,
                    });
                } else {
                    tracing::trace!("discarding fetch older than cached entry");
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(CacheEntry {
                    value,
                    fetched_at,
                    fetched_instant,
                });
            }
        }
    }
}

impl<S, C> std::fmt::Debug for RcfgClient<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RcfgClient")
            .field("config", &self.config)
            .field("cached", &self.entries.lock().len())
            .finish_non_exhaustive()
    }
}
