//! In-process orchestrator used by the unit tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{
    client::OrchestratorApi,
    job::api::{
        CreateJobRequest, CreateJobResponse, EntityVersion, GetJobRequest, GetJobResponse, JobId,
        JobInfo, JobSpec, JobStatus,
    },
    pod::api::{
        GetPodRequest, GetPodResponse, PodInfo, PodStatus, StartPodRequest, StartPodResponse,
        StopPodRequest, StopPodResponse,
    },
    prelude::*,
    respool::api::{
        CreatePoolRequest, CreatePoolResponse, DeletePoolRequest, DeletePoolResponse,
        LookupPoolRequest, LookupPoolResponse, ResourcePoolConfig, ResourcePoolId,
    },
    state::{JobState, PodState},
};

fn not_found(procedure: &str, what: &str) -> Error {
    Error::Rpc {
        procedure: procedure.to_string(),
        status: "not-found".to_string(),
        message: format!("{what} not found"),
    }
}

/// Scripted orchestrator.
///
/// `job_states` is consumed one entry per `get_job`, the last entry sticks.
/// `None` entries make the call fail with an `unavailable` status.
#[derive(Default)]
pub struct FakeOrchestrator {
    pub pools: Mutex<Vec<(String, ResourcePoolConfig, ResourcePoolId)>>,
    pub jobs: Mutex<Vec<(JobId, JobSpec)>>,
    pub job_states: Mutex<VecDeque<Option<JobState>>>,
    pub pod_states: Mutex<HashMap<String, PodState>>,
    pub started: Mutex<Vec<String>>,
    pub stopped: Mutex<Vec<String>>,
    pub get_job_calls: Mutex<u32>,
    pub empty_job_id: bool,
}

impl FakeOrchestrator {
    pub fn with_job_states(states: impl IntoIterator<Item = Option<JobState>>) -> Self {
        Self {
            job_states: Mutex::new(states.into_iter().collect()),
            ..Default::default()
        }
    }

    fn next_job_state(&self) -> Option<JobState> {
        let mut states = self.job_states.lock().unwrap();
        if states.len() > 1 {
            states.pop_front().unwrap_or_default()
        } else {
            states.front().copied().unwrap_or(Some(JobState::Initialized))
        }
    }
}

#[async_trait]
impl OrchestratorApi for FakeOrchestrator {
    async fn create_job(&self, request: CreateJobRequest) -> Result<CreateJobResponse> {
        let mut jobs = self.jobs.lock().unwrap();
        let job_id = if self.empty_job_id {
            JobId::default()
        } else {
            JobId::new(format!("job{}", jobs.len() + 1))
        };
        jobs.push((job_id.clone(), request.spec));
        Ok(CreateJobResponse {
            job_id,
            version: EntityVersion::new("1-0-0"),
        })
    }

    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse> {
        *self.get_job_calls.lock().unwrap() += 1;
        let spec = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| *id == request.job_id)
            .map(|(_, spec)| spec.clone())
            .ok_or_else(|| not_found("GetJob", &request.job_id.value))?;
        let state = self.next_job_state().ok_or_else(|| Error::Rpc {
            procedure: "GetJob".to_string(),
            status: "unavailable".to_string(),
            message: "leader changed".to_string(),
        })?;
        Ok(GetJobResponse {
            job_info: JobInfo {
                job_id: Some(request.job_id),
                spec: Some(spec),
                status: JobStatus {
                    state,
                    version: Some(EntityVersion::new("1-0-0")),
                    ..Default::default()
                },
            },
        })
    }

    async fn start_pod(&self, request: StartPodRequest) -> Result<StartPodResponse> {
        self.pod_states
            .lock()
            .unwrap()
            .insert(request.pod_name.value.clone(), PodState::Running);
        self.started.lock().unwrap().push(request.pod_name.value);
        Ok(StartPodResponse {})
    }

    async fn stop_pod(&self, request: StopPodRequest) -> Result<StopPodResponse> {
        self.pod_states
            .lock()
            .unwrap()
            .insert(request.pod_name.value.clone(), PodState::Killed);
        self.stopped.lock().unwrap().push(request.pod_name.value);
        Ok(StopPodResponse {})
    }

    async fn get_pod(&self, request: GetPodRequest) -> Result<GetPodResponse> {
        let state = self
            .pod_states
            .lock()
            .unwrap()
            .get(&request.pod_name.value)
            .copied()
            .ok_or_else(|| not_found("GetPod", &request.pod_name.value))?;
        Ok(GetPodResponse {
            current: PodInfo {
                spec: None,
                status: PodStatus {
                    state,
                    host: "host-1".to_string(),
                    ..Default::default()
                },
            },
            previous: Vec::new(),
        })
    }

    async fn lookup_pool(&self, request: LookupPoolRequest) -> Result<LookupPoolResponse> {
        self.pools
            .lock()
            .unwrap()
            .iter()
            .find(|(path, _, _)| *path == request.path.value)
            .map(|(_, _, id)| LookupPoolResponse { id: Some(id.clone()) })
            .ok_or_else(|| not_found("LookupResourcePoolID", &request.path.value))
    }

    async fn create_pool(&self, request: CreatePoolRequest) -> Result<CreatePoolResponse> {
        let mut pools = self.pools.lock().unwrap();
        let id = ResourcePoolId::new(format!("respool{}", pools.len() + 1));
        pools.push((format!("/{}", request.config.name), request.config, id.clone()));
        Ok(CreatePoolResponse { result: Some(id) })
    }

    async fn delete_pool(&self, request: DeletePoolRequest) -> Result<DeletePoolResponse> {
        self.pools
            .lock()
            .unwrap()
            .retain(|(path, _, _)| *path != request.path.value);
        Ok(DeletePoolResponse {})
    }
}
