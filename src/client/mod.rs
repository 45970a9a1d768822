//! Presentation client for the directory API.
//!
//! [`PortfolioApi`] wraps the public read endpoints, [`AdminApi`] the
//! key-gated admin endpoints. [`Browser`] and [`AdminConsole`] hold the
//! view state a UI renders from.

pub mod admin;
pub mod api;
pub mod state;

pub use admin::{AdminApi, AdminConsole, AdminCredential, ImageUpload, Resource};
pub use api::{HealthStatus, PortfolioApi};
pub use state::{Browser, BrowserEvent, BrowserState, View};

/// Client-side settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root including `/api`, without a trailing slash.
    pub api_base_url: String,
    pub app_name: String,
    pub app_version: String,
    /// Probe `/health` before the first load and log the outcome.
    pub debug: bool,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            app_name: "Portfolio Directory".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Join an endpoint path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

/// Errors surfaced by the client. Nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server could not be reached at all (DNS, refused connection, TLS).
    #[error("Cannot reach server at {base}. Make sure the API is running.")]
    Unreachable {
        base: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {reason}")]
    Status {
        status: u16,
        reason: String,
        /// `message` from the error body, when there was one.
        message: Option<String>,
    },

    /// The body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// An envelope came back with `success: false`.
    #[error("{0}")]
    Api(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Turn a response into `T`, mapping transport, status and decode failures.
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned));
        return Err(ClientError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}
