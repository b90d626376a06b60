//! Command-line interface parsing for the rcfg tool
//!
//! Every client operation is a subcommand. Connection settings come from flags,
//! then `RCFG_*` environment variables, then the JSON config file, then defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::RcfgClient;
use crate::clock::Clock;
use crate::config::{ClientConfig, ConfigError, ConfigFile};
use crate::error::StoreError;
use crate::gateway::RemoteStore;

/// Error types for running a CLI command
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// rcfg - query and update a remote configuration service
#[derive(Parser, Debug)]
#[command(name = "rcfg")]
#[command(about = "Query and update an rcfg key/value configuration service")]
#[command(version)]
pub struct Cli {
    /// Base URL of the configuration service
    #[arg(long, value_name = "URL", env = "RCFG_URL", global = true)]
    pub url: Option<String>,

    /// Seconds a fetched value is served from the local cache
    #[arg(long, value_name = "SECS", env = "RCFG_CACHE_FOR", global = true)]
    pub cache_for: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", env = "RCFG_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Path to a JSON config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations against the configuration service
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a namespace
    Add { namespace: String },
    /// Read a value
    Get { namespace: String, key: String },
    /// Write a value
    Set {
        namespace: String,
        key: String,
        value: String,
    },
    /// Write a value that the server expires after TTL
    SetTtl {
        namespace: String,
        key: String,
        value: String,
        ttl: String,
    },
    /// List direct dependencies of a key
    Deps { namespace: String, key: String },
    /// List all dependencies of a key, transitively
    AllDeps { namespace: String, key: String },
    /// Add a dependency edge without cycle checking
    AddDep {
        namespace: String,
        key: String,
        dep: String,
    },
    /// Add a dependency edge, refused if it would create a cycle
    AddDepOk {
        namespace: String,
        key: String,
        dep: String,
    },
    /// Remove a dependency edge
    RemoveDep {
        namespace: String,
        key: String,
        dep: String,
    },
    /// List keys that depend directly on a key
    DepOnBy { namespace: String, key: String },
    /// List keys that depend on a key, transitively
    AllDepOnBy { namespace: String, key: String },
}

impl Cli {
    /// Resolves the client configuration from flags, config file and defaults
    ///
    /// An explicit `--config` path must exist; the default path is optional.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let file = match &self.config {
            Some(path) => Some(ConfigFile::load(path)?),
            None => match ConfigFile::default_path() {
                Some(path) => ConfigFile::load_if_exists(&path)?,
                None => None,
            },
        };

        let mut config = ClientConfig::default();
        if let Some(file) = file {
            config = file.apply(config);
        }
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.cache_for {
            config.freshness_window = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Runs one command against a client and returns the response body
pub async fn execute<S: RemoteStore, C: Clock>(
    client: &RcfgClient<S, C>,
    command: &Command,
) -> Result<String, StoreError> {
    match command {
        Command::Add { namespace } => client.add(namespace).await,
        Command::Get { namespace, key } => client.get(namespace, key).await,
        Command::Set {
            namespace,
            key,
            value,
        } => client.set(namespace, key, value).await,
        Command::SetTtl {
            namespace,
            key,
            value,
            ttl,
        } => client.set_with_ttl(namespace, key, value, ttl).await,
        Command::Deps { namespace, key } => client.deps(namespace, key).await,
        Command::AllDeps { namespace, key } => client.all_deps(namespace, key).await,
        Command::AddDep {
            namespace,
            key,
            dep,
        } => client.add_dep(namespace, key, dep).await,
        Command::AddDepOk {
            namespace,
            key,
            dep,
        } => client.add_dep_ok(namespace, key, dep).await,
        Command::RemoveDep {
            namespace,
            key,
            dep,
        } => client.remove_dep(namespace, key, dep).await,
        Command::DepOnBy { namespace, key } => client.dep_on_by(namespace, key).await,
        Command::AllDepOnBy { namespace, key } => client.all_dep_on_by(namespace, key).await,
    }
}

/// Builds an HTTP client from the parsed arguments and runs the command
pub async fn run(cli: &Cli) -> Result<String, CliError> {
    let config = cli.client_config()?;
    tracing::debug!(?config, "resolved configuration");

    let client = RcfgClient::new(config)?;
    Ok(execute(&client, &cli.command).await?)
}
