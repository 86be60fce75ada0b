//! Main Crate Error

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /* Rpc Errors */
    #[error("RPC {procedure} failed with status '{status}': {message}")]
    Rpc {
        procedure: String,
        status: String,
        message: String,
    },

    /* Job Errors */
    #[error("Job has not been created")]
    JobNotCreated,
    #[error("Create job returned an empty job id")]
    EmptyJobId,
    #[error("Job {0} has no spec")]
    MissingJobSpec(String),
    #[error("Resource pool '{0}' not found")]
    PoolNotFound(String),

    /* Parse Errors */
    #[error("Invalid pod name '{0}'")]
    InvalidPodName(String),
    #[error("Invalid instance range '{0}'")]
    InvalidInstanceRange(String),
    #[error("Invalid state '{0}'")]
    InvalidState(String),
    #[error("Invalid config value for {key}: '{value}'")]
    InvalidConfigValue { key: String, value: String },

    /* Wait Errors */
    #[error("{subject} reached failure state {current} while waiting for {goal} (attempts: {attempts})")]
    StateTransitionFailure {
        subject: String,
        goal: String,
        current: String,
        attempts: u32,
    },
    #[error("{subject} max attempts reached waiting for {goal}, current state '{current}' (attempts: {attempts})")]
    MaxAttemptsReached {
        subject: String,
        goal: String,
        current: String,
        attempts: u32,
    },
    #[error("Condition '{message}' not met after {attempts} attempts")]
    ConditionNotMet { message: String, attempts: u32 },
}

impl Error {
    /// Whether the remote side reported the entity as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Rpc { status, .. } if status == "not-found" || status == "404")
    }
}
