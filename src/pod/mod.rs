//! Handle on a single pod of a stateless job.

pub mod api;

use tracing::info;

use crate::{
    client::OrchestratorApi,
    job::StatelessJob,
    poll,
    prelude::*,
    state::PodState,
};

use api::{GetPodRequest, GetPodResponse, PodName, PodStatus, StartPodRequest, StopPodRequest};

pub struct Pod<'a, C> {
    job: &'a StatelessJob<C>,
    instance_id: u32,
}

impl<'a, C: OrchestratorApi> Pod<'a, C> {
    pub(crate) fn new(job: &'a StatelessJob<C>, instance_id: u32) -> Self {
        Self { job, instance_id }
    }

    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    pub fn name(&self) -> Result<PodName> {
        Ok(PodName::new(self.job.job_id()?, self.instance_id))
    }

    /// Current pod info and its previous runs.
    pub async fn get_info(&self) -> Result<GetPodResponse> {
        let request = GetPodRequest {
            pod_name: self.name()?,
            status_only: false,
        };
        self.job.client().get_pod(request).await
    }

    pub async fn get_status(&self) -> Result<PodStatus> {
        self.job.get_pod_status(self.instance_id).await
    }

    pub async fn start(&self) -> Result<()> {
        let pod_name = self.name()?;
        info!("starting pod {}", pod_name);
        self.job.client().start_pod(StartPodRequest { pod_name }).await?;
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        let pod_name = self.name()?;
        info!("stopping pod {}", pod_name);
        self.job.client().stop_pod(StopPodRequest { pod_name }).await?;
        Ok(())
    }

    /// Poll the pod until it reaches `goal_state`.
    pub async fn wait_for_state(
        &self,
        goal_state: PodState,
        failed_state: PodState,
    ) -> Result<()> {
        let name = self.name()?;
        poll::wait_for_state(
            &name.value,
            goal_state,
            failed_state,
            self.job.config(),
            move || async move { self.get_status().await.map(|status| status.state) },
        )
        .await?;
        Ok(())
    }
}
