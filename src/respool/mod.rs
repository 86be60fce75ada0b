//! Resource pool used by the test jobs.

pub mod api;

use std::{path::Path, sync::Arc};

use tracing::info;

use crate::{
    client::OrchestratorApi,
    config::HarnessConfig,
    prelude::*,
};

use api::{
    CreatePoolRequest, DeletePoolRequest, LookupPoolRequest, ResourceConfig, ResourcePoolConfig,
    ResourcePoolId, ResourcePoolPath,
};

/// Test resource pool, created on first use.
pub struct Pool<C> {
    client: Arc<C>,
    config: HarnessConfig,
    pool_config: ResourcePoolConfig,
    id: Option<ResourcePoolId>,
}

impl<C: OrchestratorApi> Pool<C> {
    /// Pool named after the configured pool name with a small default
    /// reservation.
    pub fn new(client: Arc<C>, config: HarnessConfig) -> Self {
        let pool_config = default_pool_config(&config.pool_name);
        Self::with_config(client, config, pool_config)
    }

    pub fn with_config(
        client: Arc<C>,
        config: HarnessConfig,
        pool_config: ResourcePoolConfig,
    ) -> Self {
        Self {
            client,
            config,
            pool_config,
            id: None,
        }
    }

    /// Pool described by a YAML file. The file's `name` wins over the
    /// configured pool name.
    pub fn from_file(client: Arc<C>, mut config: HarnessConfig, file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        let pool_config: ResourcePoolConfig = serde_yaml::from_str(&contents)?;
        if !pool_config.name.is_empty() {
            config.pool_name = pool_config.name.clone();
        }
        Ok(Self::with_config(client, config, pool_config))
    }

    pub fn id(&self) -> Option<&ResourcePoolId> {
        self.id.as_ref()
    }

    pub fn path(&self) -> ResourcePoolPath {
        ResourcePoolPath::new(self.config.pool_path())
    }

    /// Return the pool id, creating the pool when it does not exist yet.
    pub async fn ensure_exists(&mut self) -> Result<ResourcePoolId> {
        if let Some(id) = &self.id {
            return Ok(id.clone());
        }
        let id = match self.lookup().await? {
            Some(id) => id,
            None => self.create().await?,
        };
        self.id = Some(id.clone());
        Ok(id)
    }

    /// Look the pool up by path.
    pub async fn lookup(&self) -> Result<Option<ResourcePoolId>> {
        let request = LookupPoolRequest { path: self.path() };
        match self.client.lookup_pool(request).await {
            Ok(response) => Ok(response.id.filter(|id| !id.value.is_empty())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create(&mut self) -> Result<ResourcePoolId> {
        let request = CreatePoolRequest {
            config: self.pool_config.clone(),
        };
        let response = self.client.create_pool(request).await?;
        let id = response
            .result
            .filter(|id| !id.value.is_empty())
            .ok_or_else(|| Error::PoolNotFound(self.config.pool_path()))?;
        info!("created respool {} with id {}", self.config.pool_path(), id);
        self.id = Some(id.clone());
        Ok(id)
    }

    pub async fn delete(&mut self) -> Result<()> {
        let request = DeletePoolRequest { path: self.path() };
        self.client.delete_pool(request).await?;
        info!("deleted respool {}", self.config.pool_path());
        self.id = None;
        Ok(())
    }
}

fn default_pool_config(name: &str) -> ResourcePoolConfig {
    let resource = |kind: &str, amount: f64| ResourceConfig {
        kind: kind.to_string(),
        reservation: amount,
        limit: amount,
        share: 1.0,
    };
    ResourcePoolConfig {
        name: name.to_string(),
        owning_team: "testteam".to_string(),
        ldap_groups: vec!["testgroup".to_string()],
        description: "Resource pool for integration tests".to_string(),
        resources: vec![
            resource("cpu", 4.0),
            resource("memory", 1024.0),
            resource("disk", 1024.0),
            resource("gpu", 0.0),
        ],
        ..Default::default()
    }
}
