//! Remote job, pod and resource pool API.
//!
//! [`OrchestratorApi`] is what the helpers talk to. [`Client`] implements it
//! over the RPC transport; tests can swap in an in-process fake.

pub mod rpc;

use async_trait::async_trait;

use crate::{
    config::HarnessConfig,
    job::api::{CreateJobRequest, CreateJobResponse, GetJobRequest, GetJobResponse},
    pod::api::{
        GetPodRequest, GetPodResponse, StartPodRequest, StartPodResponse, StopPodRequest,
        StopPodResponse,
    },
    prelude::*,
    respool::api::{
        CreatePoolRequest, CreatePoolResponse, DeletePoolRequest, DeletePoolResponse,
        LookupPoolRequest, LookupPoolResponse,
    },
};

use rpc::RpcClient;

pub const PROCEDURE_CREATE_JOB: &str = "peloton.api.v1alpha.job.stateless.svc.JobService::CreateJob";
pub const PROCEDURE_GET_JOB: &str = "peloton.api.v1alpha.job.stateless.svc.JobService::GetJob";
pub const PROCEDURE_START_POD: &str = "peloton.api.v1alpha.pod.svc.PodService::StartPod";
pub const PROCEDURE_STOP_POD: &str = "peloton.api.v1alpha.pod.svc.PodService::StopPod";
pub const PROCEDURE_GET_POD: &str = "peloton.api.v1alpha.pod.svc.PodService::GetPod";
pub const PROCEDURE_LOOKUP_POOL: &str = "peloton.api.v0.respool.ResourceManager::LookupResourcePoolID";
pub const PROCEDURE_CREATE_POOL: &str = "peloton.api.v0.respool.ResourceManager::CreateResourcePool";
pub const PROCEDURE_DELETE_POOL: &str = "peloton.api.v0.respool.ResourceManager::DeleteResourcePool";

/// Calls the harness makes against the orchestrator.
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    async fn create_job(&self, request: CreateJobRequest) -> Result<CreateJobResponse>;

    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse>;

    async fn start_pod(&self, request: StartPodRequest) -> Result<StartPodResponse>;

    async fn stop_pod(&self, request: StopPodRequest) -> Result<StopPodResponse>;

    async fn get_pod(&self, request: GetPodRequest) -> Result<GetPodResponse>;

    async fn lookup_pool(&self, request: LookupPoolRequest) -> Result<LookupPoolResponse>;

    async fn create_pool(&self, request: CreatePoolRequest) -> Result<CreatePoolResponse>;

    async fn delete_pool(&self, request: DeletePoolRequest) -> Result<DeletePoolResponse>;
}

/// Orchestrator client: job and pod calls go to the job manager, pool
/// calls to the resource manager.
#[derive(Debug, Clone)]
pub struct Client {
    jobmgr: RpcClient,
    resmgr: RpcClient,
}

impl Client {
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        let jobmgr = RpcClient::new(
            &config.jobmgr_url,
            &config.jobmgr_service,
            &config.caller,
            config.rpc_timeout,
        )?;
        let resmgr = RpcClient::new(
            &config.resmgr_url,
            &config.resmgr_service,
            &config.caller,
            config.rpc_timeout,
        )?;
        Ok(Self { jobmgr, resmgr })
    }
}

#[async_trait]
impl OrchestratorApi for Client {
    async fn create_job(&self, request: CreateJobRequest) -> Result<CreateJobResponse> {
        self.jobmgr.call(PROCEDURE_CREATE_JOB, &request).await
    }

    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse> {
        self.jobmgr.call(PROCEDURE_GET_JOB, &request).await
    }

    async fn start_pod(&self, request: StartPodRequest) -> Result<StartPodResponse> {
        self.jobmgr.call(PROCEDURE_START_POD, &request).await
    }

    async fn stop_pod(&self, request: StopPodRequest) -> Result<StopPodResponse> {
        self.jobmgr.call(PROCEDURE_STOP_POD, &request).await
    }

    async fn get_pod(&self, request: GetPodRequest) -> Result<GetPodResponse> {
        self.jobmgr.call(PROCEDURE_GET_POD, &request).await
    }

    async fn lookup_pool(&self, request: LookupPoolRequest) -> Result<LookupPoolResponse> {
        self.resmgr.call(PROCEDURE_LOOKUP_POOL, &request).await
    }

    async fn create_pool(&self, request: CreatePoolRequest) -> Result<CreatePoolResponse> {
        self.resmgr.call(PROCEDURE_CREATE_POOL, &request).await
    }

    async fn delete_pool(&self, request: DeletePoolRequest) -> Result<DeletePoolResponse> {
        self.resmgr.call(PROCEDURE_DELETE_POOL, &request).await
    }
}
