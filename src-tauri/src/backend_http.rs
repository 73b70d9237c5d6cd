use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};

use crate::backend_config::BackendEndpoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProbeOutcome {
    Healthy,
    Unhealthy(String),
}

/// HTTP surface of the worker that the supervisor relies on.
pub(crate) trait BackendHttp: Send + Sync + 'static {
    fn check_health(&self) -> impl Future<Output = ProbeOutcome> + Send;

    /// Resolves with the response status; any status counts as delivered.
    fn request_shutdown(&self) -> impl Future<Output = Result<u16, String>> + Send;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestBackendHttp {
    client: Client,
    health_url: String,
    shutdown_url: String,
}

impl ReqwestBackendHttp {
    pub(crate) fn new(endpoint: &BackendEndpoint, request_timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout)
            .no_proxy()
            .build()
            .map_err(|error| format!("Failed to build backend HTTP client: {error}"))?;
        Ok(Self {
            client,
            health_url: endpoint.health_url(),
            shutdown_url: endpoint.shutdown_url(),
        })
    }
}

pub(crate) fn classify_health_status(status: StatusCode) -> ProbeOutcome {
    if status == StatusCode::OK {
        ProbeOutcome::Healthy
    } else {
        ProbeOutcome::Unhealthy(format!("health endpoint answered {status}"))
    }
}

impl BackendHttp for ReqwestBackendHttp {
    async fn check_health(&self) -> ProbeOutcome {
        match self.client.get(&self.health_url).send().await {
            Ok(response) => classify_health_status(response.status()),
            Err(error) if error.is_timeout() => {
                ProbeOutcome::Unhealthy("health request timed out".to_string())
            }
            Err(error) => ProbeOutcome::Unhealthy(format!("health request failed: {error}")),
        }
    }

    async fn request_shutdown(&self) -> Result<u16, String> {
        self.client
            .post(&self.shutdown_url)
            .send()
            .await
            .map(|response| response.status().as_u16())
            .map_err(|error| {
                if error.is_timeout() {
                    "shutdown request timed out".to_string()
                } else {
                    format!("shutdown request failed: {error}")
                }
            })
    }
}
