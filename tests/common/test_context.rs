use std::{sync::Arc, time::Duration};

use stateless_harness::{client::Client, config::HarnessConfig};

use super::stub_orchestrator::StubOrchestrator;

pub struct TestContext {
    pub stub: StubOrchestrator,
    pub config: HarnessConfig,
    pub client: Arc<Client>,
}

impl TestContext {
    pub async fn new(job_script: &[&'static str]) -> Self {
        let stub = StubOrchestrator::start(job_script).await;
        let config = HarnessConfig {
            jobmgr_url: stub.url.clone(),
            resmgr_url: stub.url.clone(),
            rpc_timeout: Duration::from_secs(5),
            max_retry_attempts: 20,
            sleep_time: Duration::from_millis(10),
            ..Default::default()
        };
        let client = Arc::new(Client::new(&config).expect("Failed to build client"));
        Self {
            stub,
            config,
            client,
        }
    }
}
