//! HTTP client implementation of the iWF workflow service.
//!
//! Every operation is a JSON `POST` against the server's `/api/v1` routes.
//! The configured request timeout is never applied to get-with-wait, which
//! is expected to block at the server until the workflow completes.

use std::time::Duration;

use async_trait::async_trait;
use iwf_core::TransportError;
use iwf_proto::*;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::options::ClientOptions;

pub const START_WORKFLOW_PATH: &str = "/api/v1/workflow/start";
pub const GET_WITH_WAIT_PATH: &str = "/api/v1/workflow/getWithWait";
pub const SIGNAL_WORKFLOW_PATH: &str = "/api/v1/workflow/signal";
pub const RESET_WORKFLOW_PATH: &str = "/api/v1/workflow/reset";
pub const GET_QUERY_ATTRIBUTES_PATH: &str = "/api/v1/workflow/queryattributes/get";

/// HTTP-based workflow service client
#[derive(Debug, Clone)]
pub struct HttpWorkflowServiceClient {
    http: Client,
    base_url: String,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl HttpWorkflowServiceClient {
    /// Create a client for the server at `server_url`
    pub fn new(options: &ClientOptions) -> Result<Self, TransportError> {
        let base_url = options.server_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TransportError::InvalidEndpoint(options.server_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| TransportError::connection(&base_url, e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            connect_timeout: options.connect_timeout,
            request_timeout: options.request_timeout,
        })
    }

    /// Get the server URL this client is configured for
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<Req: Serialize>(
        &self,
        path: &str,
        request: &Req,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "sending iWF request");

        let mut builder = self.http.post(&url).json(request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder.send().await.map_err(|e| {
            self.timeout_error(&e, timeout)
                .unwrap_or_else(|| TransportError::connection(&url, e.to_string()))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(%url, error = %e, "failed to read error response body");
                String::new()
            }
        };
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or(body);
        debug!(%url, status = status.as_u16(), %message, "iWF request failed");
        Err(TransportError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn post<Req, Resp>(
        &self,
        path: &str,
        request: &Req,
        timeout: Option<Duration>,
    ) -> Result<Resp, TransportError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let response = self.send(path, request, timeout).await?;
        let body = response.bytes().await.map_err(|e| {
            self.timeout_error(&e, timeout)
                .unwrap_or_else(|| TransportError::Decode(e.to_string()))
        })?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// Map a reqwest timeout to the limit that expired
    fn timeout_error(
        &self,
        error: &reqwest::Error,
        request_timeout: Option<Duration>,
    ) -> Option<TransportError> {
        if !error.is_timeout() {
            return None;
        }
        let limit = if error.is_connect() {
            self.connect_timeout
        } else {
            request_timeout
        };
        limit.map(TransportError::Timeout)
    }
}

#[async_trait]
impl WorkflowService for HttpWorkflowServiceClient {
    type Error = TransportError;

    async fn start_workflow(
        &self,
        request: WorkflowStartRequest,
    ) -> Result<WorkflowStartResponse, Self::Error> {
        self.post(START_WORKFLOW_PATH, &request, self.request_timeout)
            .await
    }

    async fn get_workflow_with_wait(
        &self,
        request: WorkflowGetRequest,
    ) -> Result<WorkflowGetResponse, Self::Error> {
        self.post(GET_WITH_WAIT_PATH, &request, None).await
    }

    async fn signal_workflow(&self, request: WorkflowSignalRequest) -> Result<(), Self::Error> {
        // ack only, the body is ignored
        self.send(SIGNAL_WORKFLOW_PATH, &request, self.request_timeout)
            .await?;
        Ok(())
    }

    async fn reset_workflow(
        &self,
        request: WorkflowResetRequest,
    ) -> Result<WorkflowResetResponse, Self::Error> {
        self.post(RESET_WORKFLOW_PATH, &request, self.request_timeout)
            .await
    }

    async fn get_query_attributes(
        &self,
        request: WorkflowGetQueryAttributesRequest,
    ) -> Result<WorkflowGetQueryAttributesResponse, Self::Error> {
        self.post(GET_QUERY_ATTRIBUTES_PATH, &request, self.request_timeout)
            .await
    }
}
