//! BrickyardBytes REST client.
//!
//! Thin wrappers over the backend endpoints the scout consumes. Every call
//! is authenticated with a bearer token; failures carry the backend's
//! detail message and HTTP status.

use crate::models::{
    parse_run_list, DescriptionSuggestion, LoadEstimate, PeakForecast, Run,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Detail used when the backend gives no usable error body.
const GENERIC_DETAIL: &str = "Request failed";

/// Errors returned by the backend client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("{detail} ({status})")]
    Api { detail: String, status: u16 },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to the BrickyardBytes API at {0}")]
    Connect(String),

    #[error("Unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_seconds: u64,
}

/// Order line sent with a load estimate request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub items: Option<String>,
    pub amount: f64,
}

/// Body of `POST /ai/run-load`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunLoadRequest {
    pub restaurant: Option<String>,
    pub drop_point: Option<String>,
    pub eta: Option<String>,
    pub capacity: i64,
    pub seats_remaining: i64,
    pub orders: Vec<OrderLine>,
}

impl From<&Run> for RunLoadRequest {
    fn from(run: &Run) -> Self {
        Self {
            restaurant: run.restaurant.clone(),
            drop_point: run.drop_point.clone(),
            eta: run.eta.clone(),
            capacity: run.capacity,
            seats_remaining: run.seats_remaining,
            orders: run
                .orders
                .iter()
                .map(|o| OrderLine {
                    items: o.items.clone(),
                    amount: o.amount,
                })
                .collect(),
        }
    }
}

/// Body of `POST /ai/run-description`.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptionRequest {
    pub restaurant: String,
    pub drop_point: String,
    pub eta: String,
}

/// Authenticated client for the BrickyardBytes API.
pub struct ApiClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create a client. Fails only if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        info!("Using BrickyardBytes API at {}", config.base_url);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Runs currently open for joining.
    pub async fn list_available_runs(&self) -> Result<Vec<Run>, ClientError> {
        let value: Option<Value> = self.send(Method::GET, "/runs/available", None::<&()>).await?;
        Ok(value.map(parse_run_list).unwrap_or_default())
    }

    /// A single run with its orders.
    pub async fn get_run(&self, run_id: &str) -> Result<Run, ClientError> {
        let path = format!("/runs/id/{}", run_id);
        self.send_expecting(Method::GET, &path, None::<&()>).await
    }

    /// Backend load assessment for a run.
    pub async fn run_load_estimate(&self, run: &Run) -> Result<LoadEstimate, ClientError> {
        let body = RunLoadRequest::from(run);
        self.send_expecting(Method::POST, "/ai/run-load", Some(&body))
            .await
    }

    /// Backend-written description for a prospective run.
    pub async fn run_description_suggestion(
        &self,
        request: &DescriptionRequest,
    ) -> Result<DescriptionSuggestion, ClientError> {
        self.send_expecting(Method::POST, "/ai/run-description", Some(request))
            .await
    }

    /// Forecast peak hours for runner bonuses.
    pub async fn peak_forecast(&self) -> Result<PeakForecast, ClientError> {
        let forecast: Option<PeakForecast> = self
            .send(Method::GET, "/analytics/peak-forecast", None::<&()>)
            .await?;
        Ok(forecast.unwrap_or_default())
    }

    /// Send a request whose response must have a body.
    async fn send_expecting<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(method, path, body)
            .await?
            .ok_or_else(|| ClientError::Decode {
                path: path.to_string(),
                reason: "empty response".to_string(),
            })
    }

    /// Send an authenticated request. `204 No Content` yields `None`.
    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self
            .config
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ClientError::NotAuthenticated)?;

        let url = join_url(&self.config.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method, &url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.config.timeout_seconds)
            } else if e.is_connect() {
                ClientError::Connect(self.config.base_url.clone())
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                detail: error_detail(&text),
                status: status.as_u16(),
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let parsed = response.json::<T>().await.map_err(|e| ClientError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(parsed))
    }
}

/// Join the base URL and an absolute API path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Extract the error message from a failed response body.
///
/// Uses `detail`, then `error`; non-string values are rendered as JSON.
pub fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return GENERIC_DETAIL.to_string();
    };

    let field = value
        .get("detail")
        .filter(|v| !v.is_null())
        .or_else(|| value.get("error").filter(|v| !v.is_null()));

    match field {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => GENERIC_DETAIL.to_string(),
    }
}
