//! Read-through cache in front of the remote store
//!
//! Values returned by `get` are kept in memory per (namespace, key) and served
//! until their freshness window elapses. Nothing is evicted; entries are only
//! replaced by a later successful fetch.

mod client;
mod entry;

pub use client::RcfgClient;
pub use entry::{CacheEntry, CacheKey};
