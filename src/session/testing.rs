//! Mock implementations for testing
//!
//! Scripted stand-in for the legal API so sessions and routes can be
//! exercised without a backend.

use crate::api_client::{
    ApiError, FeedbackRequest, FeedbackStats, LegalApi, QueryRequest, QueryResponse,
    ReferenceDocument, ReflectionResponse, StatsResponse,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Mock API that returns queued outcomes and records every request
#[derive(Default)]
pub struct MockApi {
    queries: Mutex<VecDeque<Result<QueryResponse, ApiError>>>,
    feedback: Mutex<VecDeque<Result<(), ApiError>>>,
    reflections: Mutex<VecDeque<Result<String, ApiError>>>,
    stats: Mutex<Option<Result<StatsResponse, ApiError>>>,
    delay: Option<Duration>,
    recorded_queries: Mutex<Vec<QueryRequest>>,
    recorded_feedback: Mutex<Vec<FeedbackRequest>>,
    recorded_reflections: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, to observe in-flight state
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_query(&self, outcome: Result<QueryResponse, ApiError>) {
        self.queries.lock().unwrap().push_back(outcome);
    }

    pub fn queue_feedback(&self, outcome: Result<(), ApiError>) {
        self.feedback.lock().unwrap().push_back(outcome);
    }

    pub fn queue_reflection(&self, outcome: Result<String, ApiError>) {
        self.reflections.lock().unwrap().push_back(outcome);
    }

    pub fn set_stats(&self, outcome: Result<StatsResponse, ApiError>) {
        *self.stats.lock().unwrap() = Some(outcome);
    }

    pub fn recorded_queries(&self) -> Vec<QueryRequest> {
        self.recorded_queries.lock().unwrap().clone()
    }

    pub fn recorded_feedback(&self) -> Vec<FeedbackRequest> {
        self.recorded_feedback.lock().unwrap().clone()
    }

    pub fn recorded_reflections(&self) -> Vec<String> {
        self.recorded_reflections.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl LegalApi for MockApi {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        self.recorded_queries.lock().unwrap().push(request.clone());
        self.pause().await;
        self.queries
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock query response queued")))
    }

    async fn feedback(&self, request: &FeedbackRequest) -> Result<(), ApiError> {
        self.recorded_feedback.lock().unwrap().push(request.clone());
        self.pause().await;
        self.feedback
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock feedback response queued")))
    }

    async fn reflect(&self, query_id: &str) -> Result<ReflectionResponse, ApiError> {
        self.recorded_reflections
            .lock()
            .unwrap()
            .push(query_id.to_string());
        self.pause().await;
        self.reflections
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock reflection queued")))
            .map(|reflection| ReflectionResponse { reflection })
    }

    async fn stats(&self) -> Result<StatsResponse, ApiError> {
        self.stats
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ApiError::network("API offline")))
    }
}

pub fn sample_response(query_id: &str) -> QueryResponse {
    QueryResponse {
        query_id: query_id.to_string(),
        answer: "Article 5 guarantees **freedom of belief**.".to_string(),
        retrieved_documents: vec![ReferenceDocument {
            text: "Article 5 - The State guarantees freedom of belief.".to_string(),
            score: 0.92,
            metadata: None,
        }],
        reflection: None,
    }
}

pub fn sample_stats() -> StatsResponse {
    StatsResponse {
        queries_processed: 42,
        documents_loaded: BTreeMap::from([
            ("constitution".to_string(), 149),
            ("criminal".to_string(), 340),
        ]),
        feedback_stats: FeedbackStats {
            positive: 7,
            negative: 2,
            corrections: 1,
        },
    }
}
