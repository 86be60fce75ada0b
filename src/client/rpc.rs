//! JSON over HTTP RPC transport.
//!
//! Every call is a `POST` of the JSON encoded request to the service URL,
//! with the RPC metadata carried in headers. Failures are reported with an
//! `Rpc-Status` header and the error message as body.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::prelude::*;

pub const HEADER_CALLER: &str = "Rpc-Caller";
pub const HEADER_SERVICE: &str = "Rpc-Service";
pub const HEADER_PROCEDURE: &str = "Rpc-Procedure";
pub const HEADER_ENCODING: &str = "Rpc-Encoding";
pub const HEADER_TTL_MS: &str = "Context-TTL-MS";
pub const HEADER_STATUS: &str = "Rpc-Status";

/// RPC client bound to a single remote service.
#[derive(Debug, Clone)]
pub struct RpcClient {
    url: String,
    service: String,
    caller: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl RpcClient {
    pub fn new(
        url: impl Into<String>,
        service: impl Into<String>,
        caller: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(HEADER_ENCODING, HeaderValue::from_static("json"));
        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url: url.into(),
            service: service.into(),
            caller: caller.into(),
            timeout,
            client,
        })
    }

    /// Call `procedure` and decode its response.
    pub async fn call<Req, Resp>(&self, procedure: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        debug!("{} calling {} {}", self.caller, self.service, procedure);
        let response = self
            .client
            .post(&self.url)
            .header(HEADER_CALLER, &self.caller)
            .header(HEADER_SERVICE, &self.service)
            .header(HEADER_PROCEDURE, procedure)
            .header(HEADER_TTL_MS, self.timeout.as_millis().to_string())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let rpc_status = response
                .headers()
                .get(HEADER_STATUS)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Rpc {
                procedure: procedure.to_string(),
                status: rpc_status,
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
