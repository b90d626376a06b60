//! rcfg - command-line client for the rcfg configuration service
//!
//! Prints the response body on success. Errors go to stderr with a non-zero exit
//! status. Set `RUST_LOG=rcfg=debug` to see cache and request activity.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rcfg::cli::{self, Cli};

/// Sends log output to stderr so stdout carries only response bodies
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli::run(&cli).await {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
