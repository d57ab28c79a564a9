//! Session state types

use crate::api_client::{FeedbackType, Language, LegalField, QueryResponse, ReferenceDocument};
use std::collections::HashMap;
use std::ops::RangeInclusive;

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.1..=1.0;
pub const MAX_TOKENS_RANGE: RangeInclusive<u16> = 50..=500;
pub const TOP_K_RANGE: RangeInclusive<u8> = 1..=5;

// ============================================================================
// Conversation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One rendered chat message
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Ranking order from the backend; empty for user turns
    pub sources: Vec<ReferenceDocument>,
    pub reflection: Option<String>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: vec![],
            reflection: None,
        }
    }

    pub fn assistant(response: &QueryResponse) -> Self {
        Self {
            role: Role::Assistant,
            content: response.answer.clone(),
            sources: response.retrieved_documents.clone(),
            reflection: response.reflection.clone(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Generation parameters sent with every query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuerySettings {
    pub temperature: f32,
    pub max_tokens: u16,
    pub top_k: u8,
    pub enable_reflection: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 150,
            top_k: 3,
            enable_reflection: true,
        }
    }
}

impl QuerySettings {
    /// Merge a partial update, clamping every field into its range.
    /// Non-finite temperatures are ignored.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(temperature) = patch.temperature.filter(|t| t.is_finite()) {
            self.temperature =
                temperature.clamp(*TEMPERATURE_RANGE.start(), *TEMPERATURE_RANGE.end());
        }
        if let Some(max_tokens) = patch.max_tokens {
            let clamped = max_tokens.clamp(
                u32::from(*MAX_TOKENS_RANGE.start()),
                u32::from(*MAX_TOKENS_RANGE.end()),
            );
            self.max_tokens = u16::try_from(clamped).unwrap_or(*MAX_TOKENS_RANGE.end());
        }
        if let Some(top_k) = patch.top_k {
            let clamped = top_k.clamp(u32::from(*TOP_K_RANGE.start()), u32::from(*TOP_K_RANGE.end()));
            self.top_k = u8::try_from(clamped).unwrap_or(*TOP_K_RANGE.end());
        }
        if let Some(enable_reflection) = patch.enable_reflection {
            self.enable_reflection = enable_reflection;
        }
    }
}

/// Partial settings update. Values may be out of range; they are clamped on apply.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SettingsPatch {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_k: Option<u32>,
    pub enable_reflection: Option<bool>,
}

/// Which documents to search and which language to answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentSelection {
    pub field: LegalField,
    pub language: Language,
}

// ============================================================================
// Feedback and activity
// ============================================================================

/// Feedback recorded for a query id. An entry is created when the feedback
/// action is dispatched, not when the backend confirms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStatus {
    Pending(FeedbackType),
    Submitted(FeedbackType),
}

impl FeedbackStatus {
    pub fn kind(self) -> FeedbackType {
        match self {
            FeedbackStatus::Pending(kind) | FeedbackStatus::Submitted(kind) => kind,
        }
    }
}

/// The single user action currently awaiting the backend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Querying,
    SubmittingFeedback {
        query_id: String,
    },
    Reflecting {
        query_id: String,
    },
}

impl Activity {
    pub fn is_idle(&self) -> bool {
        matches!(self, Activity::Idle)
    }
}

// ============================================================================
// Session
// ============================================================================

/// Everything the page renders. Owned by exactly one session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub conversation: Vec<ConversationTurn>,
    pub current_query_id: Option<String>,
    pub last_response: Option<QueryResponse>,
    pub feedback_given: HashMap<String, FeedbackStatus>,
    pub settings: QuerySettings,
    pub selection: DocumentSelection,
    pub activity: Activity,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query id of the latest successful response, if it carries one
    pub fn active_query_id(&self) -> Option<&str> {
        self.last_response
            .as_ref()
            .map(|r| r.query_id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn feedback_for(&self, query_id: &str) -> Option<FeedbackStatus> {
        self.feedback_given.get(query_id).copied()
    }

    pub fn last_assistant_turn_mut(&mut self) -> Option<&mut ConversationTurn> {
        self.conversation.iter_mut().rev().find(|t| t.is_assistant())
    }

    /// Feedback controls are offered when the newest turn is an answer that
    /// has not been rated yet and nothing is in flight.
    pub fn accepts_feedback(&self) -> bool {
        let Some(query_id) = self.active_query_id() else {
            return false;
        };
        self.activity.is_idle()
            && self.conversation.last().is_some_and(ConversationTurn::is_assistant)
            && !self.feedback_given.contains_key(query_id)
    }
}
