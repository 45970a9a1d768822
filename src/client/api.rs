use chrono::{DateTime, Utc};

use super::{ClientConfig, ClientError, decode};
use crate::models::portfolio::{PortfolioDetail, PortfolioStats};
use crate::models::{ApiResponse, Paginated};

/// Outcome of a `/health` probe. Failures are reported here rather than raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// HTTP client for the public read API.
#[derive(Debug, Clone)]
pub struct PortfolioApi {
    http: reqwest::Client,
    config: ClientConfig,
}

impl PortfolioApi {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Paginated<PortfolioDetail>, ClientError> {
        self.get_envelope(
            "portfolios",
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        )
        .await
    }

    /// `Ok(None)` when the portfolio does not exist.
    pub async fn get(&self, id: i32) -> Result<Option<PortfolioDetail>, ClientError> {
        match self.get_envelope(&format!("portfolios/{id}"), &[]).await {
            Ok(detail) => Ok(Some(detail)),
            Err(ClientError::Status { status: 404, .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    pub async fn search(
        &self,
        query: &str,
        per_page: u64,
    ) -> Result<Paginated<PortfolioDetail>, ClientError> {
        self.get_envelope(
            "portfolios/search",
            &[("q", query.to_string()), ("per_page", per_page.to_string())],
        )
        .await
    }

    pub async fn filter_by_skill(
        &self,
        skill: &str,
        per_page: u64,
    ) -> Result<Paginated<PortfolioDetail>, ClientError> {
        self.get_envelope(
            "portfolios/filter",
            &[("skill", skill.to_string()), ("per_page", per_page.to_string())],
        )
        .await
    }

    pub async fn stats(&self) -> Result<PortfolioStats, ClientError> {
        self.get_envelope("portfolios/stats", &[]).await
    }

    pub async fn popular_skills(&self) -> Result<Vec<String>, ClientError> {
        self.get_envelope("skills/popular", &[]).await
    }

    pub async fn all_skills(&self) -> Result<Vec<String>, ClientError> {
        self.get_envelope("skills", &[]).await
    }

    pub async fn health_check(&self) -> HealthStatus {
        let result = match self.http.get(self.config.url("health")).send().await {
            Ok(response) => decode::<serde_json::Value>(response).await,
            Err(source) => Err(self.unreachable(source)),
        };

        let (is_healthy, message) = match result {
            Ok(body) => {
                let status = body
                    .get("status")
                    .and_then(|s| s.as_str())
                    .unwrap_or("unknown");
                (status == "OK", format!("API status: {status}"))
            }
            Err(err) => (false, err.user_message()),
        };

        HealthStatus {
            is_healthy,
            message,
            timestamp: Utc::now(),
        }
    }

    async fn get_envelope<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(self.config.url(path))
            .query(query)
            .send()
            .await
            .map_err(|source| self.unreachable(source))?;

        unwrap_envelope(decode::<ApiResponse<T>>(response).await?)
    }

    fn unreachable(&self, source: reqwest::Error) -> ClientError {
        ClientError::Unreachable {
            base: self.config.api_base_url.clone(),
            source,
        }
    }
}

/// Pull `data` out of a `{success, data, message}` envelope.
pub fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> Result<T, ClientError> {
    match envelope {
        ApiResponse {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        ApiResponse {
            success: true,
            data: None,
            ..
        } => Err(ClientError::Decode("response has no data".to_string())),
        ApiResponse { message, .. } => Err(ClientError::Api(
            message.unwrap_or_else(|| "Request failed".to_string()),
        )),
    }
}
