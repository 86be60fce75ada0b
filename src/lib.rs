//! Integration test helpers for a job orchestrator's stateless job API.
//!
//! The helpers create jobs, start and stop their pods by instance range,
//! read job and pod status, and poll until a goal state is reached. All the
//! scheduling work happens in the orchestrator; this crate only issues RPCs
//! and waits.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use stateless_harness::prelude::*;
//! use stateless_harness::{
//!     client::Client, config::HarnessConfig, job::StatelessJob, state::JobState,
//! };
//!
//! # async fn example() -> Result<()> {
//! let config = HarnessConfig::from_env()?;
//! let client = Arc::new(Client::new(&config)?);
//! let mut job = StatelessJob::from_file(client, config, "job.yaml".as_ref())?;
//!
//! job.create().await?;
//! job.wait_for_state(JobState::Running, JobState::Failed).await?;
//! job.stop(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod job;
pub mod pod;
pub mod poll;
pub mod prelude;
pub mod respool;
pub mod state;

#[cfg(test)]
mod testing;
