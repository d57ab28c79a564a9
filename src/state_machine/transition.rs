//! Pure state transition function
//!
//! Given the same state and event this always produces the same new state and
//! effects. Backend calls are described by effects and their outcomes come
//! back in as events.

use super::state::{Activity, ConversationTurn, FeedbackStatus, SessionState};
use super::{Effect, Event};
use crate::api_client::{FeedbackRequest, FeedbackType, QueryRequest};
use thiserror::Error;

/// Minimum question length, in characters, after trimming
pub const MIN_QUERY_CHARS: usize = 3;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition. None of them mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{0}")]
    Validation(String),
    #[error("No active query to provide feedback on or reflect about")]
    NoActiveQuery,
    #[error("Feedback was already given for query {0}")]
    FeedbackAlreadyGiven(String),
    #[error("Another request is still in progress")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
#[allow(clippy::too_many_lines)]
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    if event.is_exclusive_action() && !state.activity.is_idle() {
        return Err(TransitionError::Busy);
    }

    match (&state.activity, event) {
        // ============================================================
        // Configuration (allowed at any time)
        // ============================================================
        (_, Event::UpdateSettings(patch)) => {
            let mut next = state.clone();
            next.settings.apply(&patch);
            Ok(TransitionResult::new(next))
        }

        (_, Event::SelectDocuments { field, language }) => {
            let mut next = state.clone();
            if let Some(field) = field {
                next.selection.field = field;
            }
            if let Some(language) = language {
                next.selection.language = language;
            }
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // Queries
        // ============================================================

        // Idle + SubmitQuery -> Querying. The user turn is appended before
        // the backend is asked and stays there if the query fails.
        (Activity::Idle, Event::SubmitQuery { text, field, language }) => {
            if text.trim().chars().count() < MIN_QUERY_CHARS {
                return Err(TransitionError::Validation(format!(
                    "Please enter a meaningful question (at least {MIN_QUERY_CHARS} characters)"
                )));
            }

            let settings = state.settings;
            let request = QueryRequest {
                query: text.clone(),
                field,
                language,
                top_k: settings.top_k,
                max_tokens: settings.max_tokens,
                temperature: settings.temperature,
                enable_reflection: settings.enable_reflection,
            };

            let mut next = state.clone();
            next.conversation.push(ConversationTurn::user(text));
            next.activity = Activity::Querying;
            Ok(TransitionResult::new(next).with_effect(Effect::SendQuery(request)))
        }

        // Querying + QueryAnswered -> Idle with the answer appended
        (Activity::Querying, Event::QueryAnswered { response }) => {
            let mut next = state.clone();
            next.conversation.push(ConversationTurn::assistant(&response));
            next.current_query_id = Some(response.query_id.clone());
            next.last_response = Some(response);
            next.activity = Activity::Idle;
            Ok(TransitionResult::new(next))
        }

        // Querying + QueryFailed -> Idle, user turn kept without a reply
        (Activity::Querying, Event::QueryFailed { error }) => {
            let mut next = state.clone();
            next.activity = Activity::Idle;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::notify_error(format!("API Error: {error}"))))
        }

        // ============================================================
        // Feedback
        // ============================================================

        // Idle + SubmitFeedback -> SubmittingFeedback. The id is marked at
        // dispatch so a duplicate arriving before the reply is rejected.
        (
            Activity::Idle,
            Event::SubmitFeedback {
                kind,
                correction_text,
                comments,
            },
        ) => {
            let correction_text = non_blank(correction_text);
            if kind == FeedbackType::Correction && correction_text.is_none() {
                return Err(TransitionError::Validation(
                    "Please provide a corrected answer".to_string(),
                ));
            }

            let query_id = state
                .active_query_id()
                .ok_or(TransitionError::NoActiveQuery)?
                .to_string();
            if state.feedback_given.contains_key(&query_id) {
                return Err(TransitionError::FeedbackAlreadyGiven(query_id));
            }

            let request = FeedbackRequest {
                query_id: query_id.clone(),
                feedback_type: kind,
                correction_text: if kind == FeedbackType::Correction {
                    correction_text
                } else {
                    None
                },
                comments: non_blank(comments),
            };

            let mut next = state.clone();
            next.feedback_given
                .insert(query_id.clone(), FeedbackStatus::Pending(kind));
            next.activity = Activity::SubmittingFeedback { query_id };
            Ok(TransitionResult::new(next).with_effect(Effect::SendFeedback(request)))
        }

        // SubmittingFeedback + FeedbackAccepted -> Idle, feedback recorded
        (
            Activity::SubmittingFeedback { query_id: pending },
            Event::FeedbackAccepted {
                query_id,
                kind,
                correction_text,
            },
        ) if *pending == query_id => {
            let mut next = state.clone();
            if kind == FeedbackType::Correction {
                if let (Some(text), Some(turn)) = (correction_text, next.last_assistant_turn_mut()) {
                    turn.content = text;
                }
            }
            next.feedback_given
                .insert(query_id, FeedbackStatus::Submitted(kind));
            next.activity = Activity::Idle;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::notify_success("Feedback submitted successfully!")))
        }

        // SubmittingFeedback + FeedbackFailed -> Idle, id released for retry
        (
            Activity::SubmittingFeedback { query_id: pending },
            Event::FeedbackFailed { query_id, error },
        ) if *pending == query_id => {
            let mut next = state.clone();
            next.feedback_given.remove(&query_id);
            next.activity = Activity::Idle;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::notify_error(format!("Feedback Error: {error}"))))
        }

        // ============================================================
        // Reflection
        // ============================================================
        (Activity::Idle, Event::RequestReflection) => {
            let query_id = state
                .active_query_id()
                .ok_or(TransitionError::NoActiveQuery)?
                .to_string();

            let mut next = state.clone();
            next.activity = Activity::Reflecting {
                query_id: query_id.clone(),
            };
            Ok(TransitionResult::new(next).with_effect(Effect::RequestReflection { query_id }))
        }

        // Reflecting + ReflectionReceived -> Idle, last answer annotated in place
        (
            Activity::Reflecting { query_id: pending },
            Event::ReflectionReceived {
                query_id,
                reflection,
            },
        ) if *pending == query_id => {
            let mut next = state.clone();
            if let Some(turn) = next.last_assistant_turn_mut() {
                turn.reflection = Some(reflection);
            }
            next.activity = Activity::Idle;
            Ok(TransitionResult::new(next))
        }

        (
            Activity::Reflecting { query_id: pending },
            Event::ReflectionFailed { query_id, error },
        ) if *pending == query_id => {
            let mut next = state.clone();
            next.activity = Activity::Idle;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::notify_error(format!("Reflection Error: {error}"))))
        }

        // ============================================================
        // Clear: feedback history and settings survive
        // ============================================================
        (Activity::Idle, Event::Clear) => {
            let mut next = state.clone();
            next.conversation.clear();
            next.current_query_id = None;
            next.last_response = None;
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (activity, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {activity:?} with event {event:?}"
        ))),
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
