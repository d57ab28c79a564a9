//! reqwest implementation of the legal API client

use super::types::{
    FeedbackRequest, QueryRequest, QueryResponse, ReflectRequest, ReflectionResponse,
    StatsResponse,
};
use super::{ApiError, LegalApi};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// HTTP client for the backend. One attempt per call, no retries.
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post<B>(&self, path: &str, body: &B, expected: StatusCode) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let started = Instant::now();
        let result = match self.client.post(self.endpoint(path)).json(body).send().await {
            Ok(response) => expect_status(response, expected).await,
            Err(e) => Err(ApiError::from_reqwest(&e)),
        };
        log_outcome("POST", path, started, result.as_ref().err());
        result
    }

    async fn get(&self, path: &str) -> Result<Response, ApiError> {
        let started = Instant::now();
        let result = match self.client.get(self.endpoint(path)).send().await {
            Ok(response) => expect_status(response, StatusCode::OK).await,
            Err(e) => Err(ApiError::from_reqwest(&e)),
        };
        log_outcome("GET", path, started, result.as_ref().err());
        result
    }
}

async fn expect_status(response: Response, expected: StatusCode) -> Result<Response, ApiError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::status(status.as_u16(), &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError::from_reqwest(&e))
}

fn log_outcome(method: &str, path: &str, started: Instant, error: Option<&ApiError>) {
    let duration_ms = started.elapsed().as_millis();
    match error {
        None => tracing::info!(method, path, duration_ms = %duration_ms, "Legal API request completed"),
        Some(e) => tracing::warn!(
            method,
            path,
            duration_ms = %duration_ms,
            kind = ?e.kind,
            error = %e.message,
            "Legal API request failed"
        ),
    }
}

#[async_trait]
impl LegalApi for HttpApiClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        let response = self.post("query", request, StatusCode::OK).await?;
        decode(response).await
    }

    async fn feedback(&self, request: &FeedbackRequest) -> Result<(), ApiError> {
        self.post("feedback", request, StatusCode::CREATED).await?;
        Ok(())
    }

    async fn reflect(&self, query_id: &str) -> Result<ReflectionResponse, ApiError> {
        let response = self
            .post("reflect", &ReflectRequest { query_id }, StatusCode::OK)
            .await?;
        decode(response).await
    }

    async fn stats(&self) -> Result<StatsResponse, ApiError> {
        let response = self.get("stats").await?;
        decode(response).await
    }
}
