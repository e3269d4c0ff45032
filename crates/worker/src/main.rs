//! # Fax job worker
//!
//! The fax job worker is responsible for the slow half of the fax
//! lifecycle: talking to the telephony provider and moving fax media
//! in and out of object storage.
//!
//! # CLI subcommands
//!
//! Currently, the worker provides just one command - [`serve`],
//! which starts processing pending fax jobs from the database.
//!
//! [`serve`]: commands::serve
//!
//! # Job processing
//!
//! The API server enqueues a job row in the same transaction as the
//! fax record mutation that requires it. Workers claim pending jobs
//! with a skip-locked row lock, so multiple workers and multiple
//! worker processes can run against the same database without
//! processing a job twice. See the [`jobs`] module for the individual
//! job implementations.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

/// CLI configuration and available subcommands.
mod cli;

/// Subcommand implementations.
mod commands;

/// Fax job claim loop and job implementations.
mod jobs;

/// Seams between jobs and the provider and storage clients.
mod provider;

/// Test-only fake provider and storage implementations.
#[cfg(test)]
mod testing;

use clap::Parser;
use cli::{Cli, Command};
use common::{config::Config, logging};
use db::Database;
use tracing::info;

/// Fax job worker entrypoint.
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let config = Config::new(cli.config)?;

    logging::init(&config);

    let Some(worker_config) = config.worker else {
        return Err(anyhow::Error::msg("unable to load worker config"));
    };

    info!("connecting to database");
    let database = Database::connect(&config.database.url).await?;
    info!("database connection established");

    match cli.command {
        Command::Serve => {
            commands::serve(worker_config, config.storage, config.twilio, database).await
        }
    }

    Ok(())
}
