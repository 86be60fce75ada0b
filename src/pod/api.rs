//! Pod wire types.

use std::{fmt, ops::Range, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    job::api::{EntityVersion, JobId},
    prelude::*,
    state::PodState,
};

/// Pod name, `<job id>-<instance id>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodName {
    pub value: String,
}

impl PodName {
    pub fn new(job_id: &JobId, instance_id: u32) -> Self {
        Self {
            value: format!("{}-{}", job_id.value, instance_id),
        }
    }

    /// Split the name back into its job id and instance id.
    pub fn parse(&self) -> Result<(JobId, u32)> {
        let invalid = || Error::InvalidPodName(self.value.clone());
        let (job_id, instance) = self.value.rsplit_once('-').ok_or_else(invalid)?;
        let digits = !instance.is_empty() && instance.bytes().all(|b| b.is_ascii_digit());
        if job_id.is_empty() || !digits {
            return Err(invalid());
        }
        let instance = instance.parse().map_err(|_| invalid())?;
        Ok((JobId::new(job_id), instance))
    }
}

impl fmt::Display for PodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Half-open range of instance ids, `[from, to)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRange {
    #[serde(default)]
    pub from: u32,
    pub to: u32,
}

impl InstanceRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// Every instance of a job with `instance_count` instances.
    pub fn all(instance_count: u32) -> Self {
        Self::new(0, instance_count)
    }

    /// Instance ids covered by the range. Empty when `from >= to`.
    pub fn instances(&self) -> Range<u32> {
        self.from..self.to
    }
}

impl FromStr for InstanceRange {
    type Err = Error;

    /// Parses `from:to`; a bare number `n` means `0:n`.
    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidInstanceRange(value.to_string());
        let parse = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());
        match value.split_once(':') {
            Some((from, to)) => Ok(Self::new(parse(from)?, parse(to)?)),
            None => Ok(Self::all(parse(value)?)),
        }
    }
}

impl fmt::Display for InstanceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

/// Runtime status of a pod.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodStatus {
    #[serde(default)]
    pub state: PodState,
    #[serde(default)]
    pub desired_state: PodState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default)]
    pub failure_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<EntityVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodInfo {
    /// Pod spec, left opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<serde_json::Value>,
    #[serde(default)]
    pub status: PodStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPodRequest {
    pub pod_name: PodName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPodResponse {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopPodRequest {
    pub pod_name: PodName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopPodResponse {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPodRequest {
    pub pod_name: PodName,
    #[serde(default)]
    pub status_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetPodResponse {
    #[serde(default)]
    pub current: PodInfo,
    /// Earlier runs of the pod, newest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previous: Vec<PodInfo>,
}

impl fmt::Display for PodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state: {} desired: {}", self.state, self.desired_state)?;
        if !self.host.is_empty() {
            write!(f, " host: {}", self.host)?;
        }
        if !self.reason.is_empty() {
            write!(f, " reason: {}", self.reason)?;
        }
        if !self.message.is_empty() {
            write!(f, " message: {}", self.message)?;
        }
        Ok(())
    }
}
