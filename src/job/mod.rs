//! Stateless job helper.

pub mod api;

use std::{future::Future, path::Path, sync::Arc};

use tracing::info;

use crate::{
    client::OrchestratorApi,
    config::HarnessConfig,
    pod::{
        Pod,
        api::{
            GetPodRequest, InstanceRange, PodName, PodStatus, StartPodRequest, StartPodResponse,
            StopPodRequest, StopPodResponse,
        },
    },
    poll,
    prelude::*,
    respool::Pool,
    state::JobState,
};

use api::{
    CreateJobRequest, EntityVersion, GetJobRequest, GetJobResponse, JobId, JobInfo, JobSpec,
    JobStatus,
};

/// A stateless job driven through the orchestrator's API.
pub struct StatelessJob<C> {
    config: HarnessConfig,
    client: Arc<C>,
    pool: Pool<C>,
    job_id: Option<JobId>,
    entity_version: Option<EntityVersion>,
    job_spec: JobSpec,
}

impl<C: OrchestratorApi> StatelessJob<C> {
    /// Job to be created from `job_spec` in the configured test pool.
    pub fn new(client: Arc<C>, config: HarnessConfig, job_spec: JobSpec) -> Self {
        let pool = Pool::new(client.clone(), config.clone());
        Self::with_pool(client, config, pool, job_spec)
    }

    pub fn with_pool(
        client: Arc<C>,
        config: HarnessConfig,
        pool: Pool<C>,
        job_spec: JobSpec,
    ) -> Self {
        Self {
            config,
            client,
            pool,
            job_id: None,
            entity_version: None,
            job_spec,
        }
    }

    /// Job to be created from a YAML job spec file.
    pub fn from_file(client: Arc<C>, config: HarnessConfig, file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        let job_spec: JobSpec = serde_yaml::from_str(&contents)?;
        Ok(Self::new(client, config, job_spec))
    }

    /// Attach to a job that already exists.
    pub async fn load(client: Arc<C>, config: HarnessConfig, job_id: JobId) -> Result<Self> {
        let request = GetJobRequest {
            job_id: job_id.clone(),
            summary_only: false,
        };
        let info = client.get_job(request).await?.job_info;
        let job_spec = info
            .spec
            .ok_or_else(|| Error::MissingJobSpec(job_id.value.clone()))?;
        let mut job = Self::new(client, config, job_spec);
        job.entity_version = info.status.version;
        job.job_id = Some(job_id);
        Ok(job)
    }

    pub fn job_id(&self) -> Result<&JobId> {
        self.job_id.as_ref().ok_or(Error::JobNotCreated)
    }

    pub fn entity_version(&self) -> Option<&EntityVersion> {
        self.entity_version.as_ref()
    }

    pub fn spec(&self) -> &JobSpec {
        &self.job_spec
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    /// Create the job in the test pool and remember its id and version.
    pub async fn create(&mut self) -> Result<&JobId> {
        let respool_id = self.pool.ensure_exists().await?;
        self.job_spec.respool_id = Some(respool_id);

        let request = CreateJobRequest {
            spec: self.job_spec.clone(),
        };
        let response = self.client.create_job(request).await?;
        if response.job_id.value.is_empty() {
            return Err(Error::EmptyJobId);
        }
        info!(
            "created job {} with entity version {}",
            response.job_id, response.version
        );
        self.entity_version = Some(response.version);
        Ok(&*self.job_id.insert(response.job_id))
    }

    fn ranges_or_all(&self, ranges: Option<&[InstanceRange]>) -> Vec<InstanceRange> {
        match ranges {
            Some(ranges) => ranges.to_vec(),
            None => vec![InstanceRange::all(self.job_spec.instance_count)],
        }
    }

    /// Start the pods in `ranges`, one StartPod call per pod. `None` starts
    /// every instance.
    pub async fn start(&self, ranges: Option<&[InstanceRange]>) -> Result<StartPodResponse> {
        let job_id = self.job_id()?;
        let ranges = self.ranges_or_all(ranges);
        for range in &ranges {
            for instance_id in range.instances() {
                let request = StartPodRequest {
                    pod_name: PodName::new(job_id, instance_id),
                };
                self.client.start_pod(request).await?;
            }
        }
        info!("starting pods in job {} with ranges {:?}", job_id, ranges);
        Ok(StartPodResponse {})
    }

    /// Stop the pods in `ranges`, one StopPod call per pod. `None` stops
    /// every instance.
    pub async fn stop(&self, ranges: Option<&[InstanceRange]>) -> Result<StopPodResponse> {
        let job_id = self.job_id()?;
        let ranges = self.ranges_or_all(ranges);
        for range in &ranges {
            for instance_id in range.instances() {
                let request = StopPodRequest {
                    pod_name: PodName::new(job_id, instance_id),
                };
                self.client.stop_pod(request).await?;
            }
        }
        info!("stopping pods in job {} with ranges {:?}", job_id, ranges);
        Ok(StopPodResponse {})
    }

    /// Poll the job until it reaches `goal_state`.
    pub async fn wait_for_state(
        &self,
        goal_state: JobState,
        failed_state: JobState,
    ) -> Result<()> {
        let job_id = self.job_id()?;
        poll::wait_for_state(
            &job_id.value,
            goal_state,
            failed_state,
            &self.config,
            move || async move { self.get_status().await.map(|status| status.state) },
        )
        .await?;
        Ok(())
    }

    /// Wait for the job to succeed, failing early if it fails.
    pub async fn wait_for_success(&self) -> Result<()> {
        self.wait_for_state(JobState::Succeeded, JobState::Failed).await
    }

    /// Poll `condition` until it holds, labelled with the job id.
    pub async fn wait_for_condition<F, Fut>(&self, condition: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let job_id = self.job_id()?;
        poll::wait_for_condition(&job_id.value, &self.config, condition).await
    }

    /// Same as [`StatelessJob::get_pod`], named for parity with batch job
    /// helpers so shared tests can call either.
    pub fn get_task(&self, instance_id: u32) -> Result<Pod<'_, C>> {
        self.get_pod(instance_id)
    }

    pub fn get_pod(&self, instance_id: u32) -> Result<Pod<'_, C>> {
        self.job_id()?;
        Ok(Pod::new(self, instance_id))
    }

    pub async fn get_pod_status(&self, instance_id: u32) -> Result<PodStatus> {
        let request = GetPodRequest {
            pod_name: PodName::new(self.job_id()?, instance_id),
            status_only: true,
        };
        Ok(self.client.get_pod(request).await?.current.status)
    }

    /// Configuration and runtime status of the job.
    pub async fn get_job(&self) -> Result<GetJobResponse> {
        let request = GetJobRequest {
            job_id: self.job_id()?.clone(),
            summary_only: false,
        };
        self.client.get_job(request).await
    }

    pub async fn get_info(&self) -> Result<JobInfo> {
        Ok(self.get_job().await?.job_info)
    }

    pub async fn get_status(&self) -> Result<JobStatus> {
        Ok(self.get_info().await?.status)
    }
}
