use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use stateless_harness::client::rpc::{
    HEADER_CALLER, HEADER_ENCODING, HEADER_PROCEDURE, HEADER_SERVICE, HEADER_STATUS,
    HEADER_TTL_MS,
};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Headers of one received call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub caller: String,
    pub service: String,
    pub procedure: String,
    pub encoding: String,
    pub ttl_ms: String,
    pub body: Value,
}

#[derive(Default)]
struct StubState {
    pools: HashMap<String, String>,
    jobs: HashMap<String, StubJob>,
    pods: HashMap<String, &'static str>,
    job_script: Vec<&'static str>,
    unavailable_get_jobs: u32,
    bare_failures: VecDeque<StatusCode>,
    calls: Vec<RecordedCall>,
}

struct StubJob {
    spec: Value,
    states: VecDeque<&'static str>,
}

impl StubJob {
    fn next_state(&mut self) -> &'static str {
        if self.states.len() > 1 {
            self.states.pop_front().unwrap_or("JOB_STATE_INVALID")
        } else {
            self.states.front().copied().unwrap_or("JOB_STATE_INITIALIZED")
        }
    }
}

/// In-process orchestrator serving the job manager and resource manager
/// procedures on one HTTP endpoint.
pub struct StubOrchestrator {
    pub url: String,
    state: Arc<Mutex<StubState>>,
    handle: JoinHandle<()>,
}

impl StubOrchestrator {
    /// Every job created on this stub walks through `job_script`, one state
    /// per GetJob, staying on the last one.
    pub async fn start(job_script: &[&'static str]) -> Self {
        let state = Arc::new(Mutex::new(StubState {
            job_script: job_script.to_vec(),
            ..Default::default()
        }));
        let app = Router::new().route("/", post(rpc)).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    /// Fail the next `count` GetJob calls with an `unavailable` status.
    pub fn fail_get_jobs(&self, count: u32) {
        self.state.lock().unwrap().unavailable_get_jobs = count;
    }

    /// Answer the next `count` calls with `status` and no `Rpc-Status`
    /// header, the way a proxy in front of the service would.
    pub fn fail_bare(&self, status: StatusCode, count: usize) {
        let mut state = self.state.lock().unwrap();
        state.bare_failures.extend(std::iter::repeat_n(status, count));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn procedures(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| short_procedure(&call.procedure).to_string())
            .collect()
    }

    pub fn pod_state(&self, pod_name: &str) -> Option<&'static str> {
        self.state.lock().unwrap().pods.get(pod_name).copied()
    }

    pub fn pool_id(&self, path: &str) -> Option<String> {
        self.state.lock().unwrap().pools.get(path).cloned()
    }

    pub fn job_spec(&self, job_id: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .jobs
            .get(job_id)
            .map(|job| job.spec.clone())
    }
}

impl Drop for StubOrchestrator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn short_procedure(procedure: &str) -> &str {
    procedure.rsplit("::").next().unwrap_or(procedure)
}

fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn rpc_error(status: StatusCode, rpc_status: &'static str, message: String) -> Response {
    (status, [(HEADER_STATUS, rpc_status)], message).into_response()
}

async fn rpc(
    State(state): State<Arc<Mutex<StubState>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let procedure = header(&headers, HEADER_PROCEDURE);
    let mut state = state.lock().unwrap();
    state.calls.push(RecordedCall {
        caller: header(&headers, HEADER_CALLER),
        service: header(&headers, HEADER_SERVICE),
        procedure: procedure.clone(),
        encoding: header(&headers, HEADER_ENCODING),
        ttl_ms: header(&headers, HEADER_TTL_MS),
        body: body.clone(),
    });

    if let Some(status) = state.bare_failures.pop_front() {
        return (status, "down").into_response();
    }

    match short_procedure(&procedure) {
        "LookupResourcePoolID" => {
            let path = body["path"]["value"].as_str().unwrap_or_default();
            match state.pools.get(path) {
                Some(id) => Json(json!({ "id": { "value": id } })).into_response(),
                None => rpc_error(
                    StatusCode::NOT_FOUND,
                    "not-found",
                    format!("respool {path} not found"),
                ),
            }
        }
        "CreateResourcePool" => {
            let name = body["config"]["name"].as_str().unwrap_or_default();
            let id = Uuid::new_v4().to_string();
            state.pools.insert(format!("/{name}"), id.clone());
            Json(json!({ "result": { "value": id } })).into_response()
        }
        "DeleteResourcePool" => {
            let path = body["path"]["value"].as_str().unwrap_or_default();
            state.pools.remove(path);
            Json(json!({})).into_response()
        }
        "CreateJob" => {
            let job_id = Uuid::new_v4().to_string();
            let job = StubJob {
                spec: body["spec"].clone(),
                states: state.job_script.iter().copied().collect(),
            };
            state.jobs.insert(job_id.clone(), job);
            Json(json!({ "job_id": { "value": job_id }, "version": { "value": "1-0-0" } }))
                .into_response()
        }
        "GetJob" => {
            if state.unavailable_get_jobs > 0 {
                state.unavailable_get_jobs -= 1;
                return rpc_error(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    "no leader".to_string(),
                );
            }
            let job_id = body["job_id"]["value"].as_str().unwrap_or_default().to_string();
            match state.jobs.get_mut(&job_id) {
                Some(job) => {
                    let job_state = job.next_state();
                    Json(json!({
                        "job_info": {
                            "job_id": { "value": job_id },
                            "spec": job.spec,
                            "status": {
                                "state": job_state,
                                "desired_state": "JOB_STATE_RUNNING",
                                "version": { "value": "1-0-0" },
                                "creation_time": "2024-03-01T10:00:00Z"
                            }
                        }
                    }))
                    .into_response()
                }
                None => rpc_error(
                    StatusCode::NOT_FOUND,
                    "not-found",
                    format!("job {job_id} not found"),
                ),
            }
        }
        "StartPod" | "StopPod" => {
            let pod_name = body["pod_name"]["value"].as_str().unwrap_or_default().to_string();
            let pod_state = if short_procedure(&procedure) == "StartPod" {
                "POD_STATE_RUNNING"
            } else {
                "POD_STATE_KILLED"
            };
            state.pods.insert(pod_name, pod_state);
            Json(json!({})).into_response()
        }
        "GetPod" => {
            let pod_name = body["pod_name"]["value"].as_str().unwrap_or_default();
            match state.pods.get(pod_name) {
                Some(pod_state) => Json(json!({
                    "current": {
                        "status": {
                            "state": pod_state,
                            "desired_state": "POD_STATE_RUNNING",
                            "host": "192.168.0.10",
                            "failure_count": 0
                        }
                    }
                }))
                .into_response(),
                None => rpc_error(
                    StatusCode::NOT_FOUND,
                    "not-found",
                    format!("pod {pod_name} not found"),
                ),
            }
        }
        other => rpc_error(
            StatusCode::BAD_REQUEST,
            "unimplemented",
            format!("unknown procedure {other}"),
        ),
    }
}
