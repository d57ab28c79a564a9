//! Legal API client abstraction
//!
//! Typed access to the question-answering backend: queries, feedback,
//! on-demand reflection and service statistics.

mod error;
mod http;
mod types;

pub use error::{ApiError, ApiErrorKind};
pub use http::HttpApiClient;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for the backend. Every call is a single independent
/// request; implementations never retry.
#[async_trait]
pub trait LegalApi: Send + Sync {
    /// `POST /query`
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError>;

    /// `POST /feedback`
    async fn feedback(&self, request: &FeedbackRequest) -> Result<(), ApiError>;

    /// `POST /reflect`
    async fn reflect(&self, query_id: &str) -> Result<ReflectionResponse, ApiError>;

    /// `GET /stats`
    async fn stats(&self) -> Result<StatsResponse, ApiError>;
}

#[async_trait]
impl<T: LegalApi + ?Sized> LegalApi for Arc<T> {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        (**self).query(request).await
    }

    async fn feedback(&self, request: &FeedbackRequest) -> Result<(), ApiError> {
        (**self).feedback(request).await
    }

    async fn reflect(&self, query_id: &str) -> Result<ReflectionResponse, ApiError> {
        (**self).reflect(query_id).await
    }

    async fn stats(&self) -> Result<StatsResponse, ApiError> {
        (**self).stats().await
    }
}
