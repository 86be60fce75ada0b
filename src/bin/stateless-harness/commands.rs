use std::{path::Path, sync::Arc};

use stateless_harness::{
    client::Client,
    config::HarnessConfig,
    job::{StatelessJob, api::JobId},
    pod::api::InstanceRange,
    prelude::*,
    respool::Pool,
    state::JobState,
};

use crate::cli::PodArgs;

pub async fn handle_create(
    client: Arc<Client>,
    config: HarnessConfig,
    spec: &Path,
    pool: Option<&Path>,
) -> Result<()> {
    let mut job = match pool {
        Some(pool) => {
            let pool = Pool::from_file(client.clone(), config.clone(), pool)?;
            let contents = std::fs::read_to_string(spec)?;
            let job_spec = serde_yaml::from_str(&contents)?;
            StatelessJob::with_pool(client, config, pool, job_spec)
        }
        None => StatelessJob::from_file(client, config, spec)?,
    };
    let job_id = job.create().await?.clone();
    match job.entity_version() {
        Some(version) => println!("Created job {} (entity version {})", job_id, version),
        None => println!("Created job {}", job_id),
    }
    Ok(())
}

fn ranges(pods: &PodArgs) -> Option<&[InstanceRange]> {
    (!pods.ranges.is_empty()).then_some(pods.ranges.as_slice())
}

pub async fn handle_start(client: Arc<Client>, config: HarnessConfig, pods: PodArgs) -> Result<()> {
    let job = StatelessJob::load(client, config, JobId::new(&pods.job_id)).await?;
    job.start(ranges(&pods)).await?;
    println!("Started pods of job {}", pods.job_id);
    Ok(())
}

pub async fn handle_stop(client: Arc<Client>, config: HarnessConfig, pods: PodArgs) -> Result<()> {
    let job = StatelessJob::load(client, config, JobId::new(&pods.job_id)).await?;
    job.stop(ranges(&pods)).await?;
    println!("Stopped pods of job {}", pods.job_id);
    Ok(())
}

pub async fn handle_wait(
    client: Arc<Client>,
    config: HarnessConfig,
    job_id: String,
    goal: JobState,
    failed: JobState,
) -> Result<()> {
    let job = StatelessJob::load(client, config, JobId::new(job_id)).await?;
    job.wait_for_state(goal, failed).await?;
    println!("Job {} reached {}", job.job_id()?, goal);
    Ok(())
}

pub async fn handle_get(client: Arc<Client>, config: HarnessConfig, job_id: String) -> Result<()> {
    let job = StatelessJob::load(client, config, JobId::new(job_id)).await?;
    let status = job.get_status().await?;
    println!("Job {} {}", job.job_id()?, status);
    Ok(())
}

pub async fn handle_pod_status(
    client: Arc<Client>,
    config: HarnessConfig,
    job_id: String,
    instance: u32,
) -> Result<()> {
    let job = StatelessJob::load(client, config, JobId::new(job_id)).await?;
    let pod = job.get_pod(instance)?;
    let status = pod.get_status().await?;
    println!("Pod {} {}", pod.name()?, status);
    Ok(())
}
