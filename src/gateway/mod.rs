//! Remote store gateway
//!
//! Every call the client makes against the configuration service is described by
//! an [`Operation`] and executed by a [`RemoteStore`]. The HTTP implementation lives
//! in [`HttpGateway`]; tests substitute their own stores.

mod http;

pub use http::HttpGateway;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;

/// A single logical request against the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    /// Create a namespace
    Add { namespace: &'a str },
    /// Read a value
    Get { namespace: &'a str, key: &'a str },
    /// Write a value
    Set {
        namespace: &'a str,
        key: &'a str,
        value: &'a str,
    },
    /// Write a value with a server-side expiry
    SetWithTtl {
        namespace: &'a str,
        key: &'a str,
        value: &'a str,
        ttl: &'a str,
    },
    /// Direct dependencies of a key
    Deps { namespace: &'a str, key: &'a str },
    /// Transitive dependencies of a key
    AllDeps { namespace: &'a str, key: &'a str },
    /// Add a dependency edge without cycle checking
    AddDep {
        namespace: &'a str,
        key: &'a str,
        dep: &'a str,
    },
    /// Add a dependency edge, rejected by the server if it would create a cycle
    AddDepOk {
        namespace: &'a str,
        key: &'a str,
        dep: &'a str,
    },
    /// Remove a dependency edge
    RemoveDep {
        namespace: &'a str,
        key: &'a str,
        dep: &'a str,
    },
    /// Keys that depend directly on a key
    DepOnBy { namespace: &'a str, key: &'a str },
    /// Keys that depend on a key, transitively
    AllDepOnBy { namespace: &'a str, key: &'a str },
}

impl<'a> Operation<'a> {
    /// Namespace the operation targets
    pub fn namespace(&self) -> &'a str {
        match *self {
            Operation::Add { namespace }
            | Operation::Get { namespace, .. }
            | Operation::Set { namespace, .. }
            | Operation::SetWithTtl { namespace, .. }
            | Operation::Deps { namespace, .. }
            | Operation::AllDeps { namespace, .. }
            | Operation::AddDep { namespace, .. }
            | Operation::AddDepOk { namespace, .. }
            | Operation::RemoveDep { namespace, .. }
            | Operation::DepOnBy { namespace, .. }
            | Operation::AllDepOnBy { namespace, .. } => namespace,
        }
    }

    /// Endpoint name under the namespace path
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Get { .. } => "get",
            Operation::Set { .. } => "set",
            Operation::SetWithTtl { .. } => "setttl",
            Operation::Deps { .. } => "deps",
            Operation::AllDeps { .. } => "alldeps",
            Operation::AddDep { .. } => "adddep",
            Operation::AddDepOk { .. } => "adddepok",
            Operation::RemoveDep { .. } => "removedep",
            Operation::DepOnBy { .. } => "deponby",
            Operation::AllDepOnBy { .. } => "alldeponby",
        }
    }

    /// Query parameters in wire order
    pub fn query(&self) -> Vec<(&'static str, &'a str)> {
        match *self {
            Operation::Add { .. } => Vec::new(),
            Operation::Get { key, .. }
            | Operation::Deps { key, .. }
            | Operation::AllDeps { key, .. }
            | Operation::DepOnBy { key, .. }
            | Operation::AllDepOnBy { key, .. } => vec![("k", key)],
            Operation::Set { key, value, .. } => vec![("k", key), ("v", value)],
            Operation::SetWithTtl { key, value, ttl, .. } => {
                vec![("k", key), ("v", value), ("ttl", ttl)]
            }
            Operation::AddDep { key, dep, .. }
            | Operation::AddDepOk { key, dep, .. }
            | Operation::RemoveDep { key, dep, .. } => vec![("k", key), ("d", dep)],
        }
    }
}

/// Executes operations against the remote store
///
/// Implementations issue exactly one request per call and return the response body
/// untouched. They never retry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Performs one operation and returns the response body
    async fn call(&self, op: &Operation<'_>) -> Result<String, StoreError>;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Arc<S> {
    async fn call(&self, op: &Operation<'_>) -> Result<String, StoreError> {
        (**self).call(op).await
    }
}
