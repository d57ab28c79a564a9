//! Events that can occur in a session

use super::state::SettingsPatch;
use crate::api_client::{ApiError, FeedbackType, Language, LegalField, QueryResponse};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User actions
    SubmitQuery {
        text: String,
        field: LegalField,
        language: Language,
    },
    SubmitFeedback {
        kind: FeedbackType,
        correction_text: Option<String>,
        comments: Option<String>,
    },
    RequestReflection,
    Clear,
    UpdateSettings(SettingsPatch),
    SelectDocuments {
        field: Option<LegalField>,
        language: Option<Language>,
    },

    // Backend outcomes
    QueryAnswered {
        response: QueryResponse,
    },
    QueryFailed {
        error: ApiError,
    },
    FeedbackAccepted {
        query_id: String,
        kind: FeedbackType,
        correction_text: Option<String>,
    },
    FeedbackFailed {
        query_id: String,
        error: ApiError,
    },
    ReflectionReceived {
        query_id: String,
        reflection: String,
    },
    ReflectionFailed {
        query_id: String,
        error: ApiError,
    },
}

impl Event {
    /// Actions that start a backend exchange or reset the conversation.
    /// Only one of these may run at a time.
    pub fn is_exclusive_action(&self) -> bool {
        matches!(
            self,
            Event::SubmitQuery { .. }
                | Event::SubmitFeedback { .. }
                | Event::RequestReflection
                | Event::Clear
        )
    }

    /// The backend error carried by a failure outcome
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Event::QueryFailed { error }
            | Event::FeedbackFailed { error, .. }
            | Event::ReflectionFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}
