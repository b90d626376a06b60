//! Client library for the rcfg key/value configuration service
//!
//! [`RcfgClient`] wraps the service's HTTP API with an in-memory read-through cache
//! for `get` and forwards namespace, write and dependency-graph operations as-is.

pub mod cache;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod gateway;

pub use cache::{CacheEntry, CacheKey, RcfgClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ClientConfig, ConfigError, ConfigFile};
pub use error::StoreError;
pub use gateway::{HttpGateway, Operation, RemoteStore};
