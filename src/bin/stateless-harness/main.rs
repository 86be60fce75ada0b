//! stateless-harness CLI
//!
//! Thin command-line front end over the harness library, handy for poking
//! at a test cluster by hand:
//!
//! ```bash
//! export HARNESS_JOBMGR_URL=http://localhost:5292
//! stateless-harness create --spec job.yaml
//! stateless-harness wait --job-id <id> --goal RUNNING
//! ```

mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{
    handle_create, handle_get, handle_pod_status, handle_start, handle_stop, handle_wait,
};
use stateless_harness::{client::Client, config::HarnessConfig, prelude::*};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = HarnessConfig::load(cli.config.as_deref())?;
    let client = Arc::new(Client::new(&config)?);

    let result = match cli.command {
        Commands::Create { spec, pool } => {
            handle_create(client, config, &spec, pool.as_deref()).await
        }
        Commands::Start { pods } => handle_start(client, config, pods).await,
        Commands::Stop { pods } => handle_stop(client, config, pods).await,
        Commands::Wait {
            job_id,
            goal,
            failed,
        } => handle_wait(client, config, job_id, goal, failed).await,
        Commands::Get { job_id } => handle_get(client, config, job_id).await,
        Commands::PodStatus { job_id, instance } => {
            handle_pod_status(client, config, job_id, instance).await
        }
    };

    if let Err(ref e) = result {
        tracing::error!("Error: {}", e);
    }

    result
}
