//! Effects produced by state transitions

use crate::api_client::{FeedbackRequest, QueryRequest};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the backend to answer a question
    SendQuery(QueryRequest),

    /// Submit feedback on an answer
    SendFeedback(FeedbackRequest),

    /// Ask the backend to critique its answer
    RequestReflection { query_id: String },

    /// Show a message to the user
    Notify(Notice),
}

impl Effect {
    pub fn notify_success(message: impl Into<String>) -> Self {
        Effect::Notify(Notice::new(NoticeLevel::Success, message))
    }

    pub fn notify_error(message: impl Into<String>) -> Self {
        Effect::Notify(Notice::new(NoticeLevel::Error, message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// User-visible flash message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }
}
