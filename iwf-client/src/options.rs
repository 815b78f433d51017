//! Client options.

use std::time::Duration;

/// Default iWF server address for local development
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8801";
/// Default worker address for local development
pub const DEFAULT_WORKER_URL: &str = "http://localhost:8802";

/// Environment variable overriding the server address
pub const SERVER_URL_ENV: &str = "IWF_SERVER_URL";
/// Environment variable overriding the worker address
pub const WORKER_URL_ENV: &str = "IWF_WORKER_URL";

/// Client configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Base URL of the iWF server
    pub server_url: String,
    /// URL the server calls back to execute workflow states
    pub worker_url: String,
    /// Connection establishment timeout
    pub connect_timeout: Option<Duration>,
    /// Per-request timeout for start, signal, reset and query calls.
    /// Get-with-wait never carries one, since it blocks at the server until
    /// the workflow completes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            worker_url: DEFAULT_WORKER_URL.to_string(),
            connect_timeout: Some(Duration::from_secs(10)),
            request_timeout: None,
        }
    }
}

impl ClientOptions {
    pub fn new(server_url: impl Into<String>, worker_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            worker_url: worker_url.into(),
            ..Self::default()
        }
    }

    /// Local defaults, overridden by `IWF_SERVER_URL` and `IWF_WORKER_URL`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_url: std::env::var(SERVER_URL_ENV).unwrap_or(defaults.server_url),
            worker_url: std::env::var(WORKER_URL_ENV).unwrap_or(defaults.worker_url),
            ..defaults
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// Options for starting a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowStartOptions {
    pub workflow_timeout_seconds: i32,
}

impl WorkflowStartOptions {
    /// Options with nothing but the workflow timeout set
    pub fn minimum(workflow_timeout_seconds: i32) -> Self {
        Self {
            workflow_timeout_seconds,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::minimum(i32::try_from(timeout.as_secs()).unwrap_or(i32::MAX))
    }
}
