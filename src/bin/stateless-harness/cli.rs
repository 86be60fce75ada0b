//! Command-line interface definitions for stateless-harness.

use clap::{Args, Parser, Subcommand};
use stateless_harness::{pod::api::InstanceRange, state::JobState};
use std::path::PathBuf;

/// Drive stateless jobs on the orchestrator from the command line.
#[derive(Parser)]
#[command(name = "stateless-harness")]
#[command(about = "Create, start, stop and wait on stateless jobs for integration testing")]
pub struct Cli {
    /// Path to a TOML harness config (HARNESS_* variables override it)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a job from a YAML job spec and print its id
    Create {
        /// Path to the YAML job spec
        #[arg(short, long)]
        spec: PathBuf,

        /// Optional YAML resource pool config
        #[arg(long)]
        pool: Option<PathBuf>,
    },

    /// Start pods of a job
    Start {
        #[command(flatten)]
        pods: PodArgs,
    },

    /// Stop pods of a job
    Stop {
        #[command(flatten)]
        pods: PodArgs,
    },

    /// Wait for a job to reach a state
    Wait {
        #[arg(long)]
        job_id: String,

        /// State to wait for, e.g. RUNNING or JOB_STATE_RUNNING
        #[arg(long, default_value = "SUCCEEDED")]
        goal: JobState,

        /// State that aborts the wait
        #[arg(long, default_value = "FAILED")]
        failed: JobState,
    },

    /// Print the runtime status of a job
    Get {
        #[arg(long)]
        job_id: String,
    },

    /// Print the status of a single pod
    PodStatus {
        #[arg(long)]
        job_id: String,

        #[arg(long)]
        instance: u32,
    },
}

/// Pods of a job, selected by instance ranges.
#[derive(Args)]
pub struct PodArgs {
    #[arg(long)]
    pub job_id: String,

    /// Instance range as from:to (end exclusive); every instance when omitted
    #[arg(long = "range")]
    pub ranges: Vec<InstanceRange>,
}
