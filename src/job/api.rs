//! Stateless job wire types.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    respool::api::ResourcePoolId,
    state::{JobState, PodState},
};

/// Opaque job identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId {
    pub value: String,
}

/// Opaque optimistic-concurrency token handed out by the job manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityVersion {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

/// Stateless job specification.
///
/// Only the fields the harness reads or writes are typed, everything else
/// (pod spec, SLA, update policy...) is kept in `extra` and sent back as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub instance_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respool_id: Option<ResourcePoolId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Runtime status of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub state: JobState,
    #[serde(default)]
    pub desired_state: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<EntityVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    /// Number of pods per pod state.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pod_stats: BTreeMap<PodState, u32>,
}

/// Configuration and runtime status of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<JobSpec>,
    #[serde(default)]
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub spec: JobSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJobResponse {
    #[serde(default)]
    pub job_id: JobId,
    #[serde(default)]
    pub version: EntityVersion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetJobRequest {
    pub job_id: JobId,
    #[serde(default)]
    pub summary_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetJobResponse {
    #[serde(default)]
    pub job_info: JobInfo,
}

impl JobId {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl EntityVersion {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Display for EntityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state: {} desired: {}", self.state, self.desired_state)?;
        if let Some(version) = &self.version {
            write!(f, " version: {}", version)?;
        }
        for (state, count) in &self.pod_stats {
            write!(f, "\n  {}: {}", state.short_name(), count)?;
        }
        Ok(())
    }
}
