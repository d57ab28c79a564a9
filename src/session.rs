//! Session runtime
//!
//! Owns one `SessionState`, feeds user actions through the pure transition
//! function and executes the effects it returns against the legal API. Backend
//! outcomes are dispatched back in as events.

#[cfg(test)]
pub mod testing;

use crate::api_client::{
    ApiError, FeedbackType, Language, LegalApi, LegalField, StatsResponse,
};
use crate::state_machine::{
    transition, Effect, Event, Notice, SessionState, SettingsPatch, TransitionError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Why a user action did not complete
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("Session task failed: {0}")]
    Task(String),
}

#[derive(Debug, Default)]
struct SessionCore {
    state: SessionState,
    notices: Vec<Notice>,
}

/// A single user's chat session.
///
/// The lock is held only while a transition is applied, never across a
/// backend call. Concurrent actions are serialized by the state machine's
/// activity marker instead. Backend calls run on their own task, so an
/// action always settles even when its caller stops waiting.
pub struct Session<A: LegalApi> {
    core: Arc<Mutex<SessionCore>>,
    api: Arc<A>,
}

impl<A: LegalApi + 'static> Session<A> {
    pub fn new(api: A) -> Self {
        Self {
            core: Arc::new(Mutex::new(SessionCore::default())),
            api: Arc::new(api),
        }
    }

    // ==================== User actions ====================

    pub async fn submit_query(
        &self,
        text: &str,
        field: LegalField,
        language: Language,
    ) -> Result<(), SessionError> {
        self.dispatch(Event::SubmitQuery {
            text: text.to_string(),
            field,
            language,
        })
        .await
    }

    pub async fn submit_feedback(
        &self,
        kind: FeedbackType,
        correction_text: Option<String>,
        comments: Option<String>,
    ) -> Result<(), SessionError> {
        self.dispatch(Event::SubmitFeedback {
            kind,
            correction_text,
            comments,
        })
        .await
    }

    pub async fn request_reflection(&self) -> Result<(), SessionError> {
        self.dispatch(Event::RequestReflection).await
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        self.dispatch(Event::Clear).await
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<(), SessionError> {
        self.dispatch(Event::UpdateSettings(patch)).await
    }

    pub async fn select_documents(
        &self,
        field: Option<LegalField>,
        language: Option<Language>,
    ) -> Result<(), SessionError> {
        self.dispatch(Event::SelectDocuments { field, language }).await
    }

    /// Service statistics for display. Never touches session state.
    pub async fn stats(&self) -> Result<StatsResponse, ApiError> {
        self.api.stats().await
    }

    // ==================== Rendering support ====================

    pub async fn snapshot(&self) -> SessionState {
        self.core.lock().await.state.clone()
    }

    /// Drain flash messages queued since the last render
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.core.lock().await.notices)
    }

    pub async fn push_notice(&self, notice: Notice) {
        self.core.lock().await.notices.push(notice);
    }

    /// Surface a rejected action to the user. Backend failures were already
    /// announced by the transition that handled them.
    pub async fn report(&self, result: Result<(), SessionError>) {
        if let Err(SessionError::Rejected(e)) = result {
            tracing::debug!(reason = %e, "Session action rejected");
            self.push_notice(Notice::warning(e.to_string())).await;
        }
    }

    // ==================== Dispatch ====================

    /// Apply an event, then run the remote effects it produces on a spawned
    /// task that applies their outcomes. Returns the backend error if one of
    /// the calls failed.
    pub async fn dispatch(&self, event: Event) -> Result<(), SessionError> {
        let effects = apply(&self.core, event).await?;
        if effects.is_empty() {
            return Ok(());
        }

        let core = Arc::clone(&self.core);
        let api = Arc::clone(&self.api);
        let task = tokio::spawn(async move { settle(&core, api.as_ref(), effects).await });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Effect task failed");
                Err(SessionError::Task(e.to_string()))
            }
        }
    }
}

/// Execute remote effects in order and apply each outcome
async fn settle<A: LegalApi>(
    core: &Mutex<SessionCore>,
    api: &A,
    effects: Vec<Effect>,
) -> Result<(), SessionError> {
    let mut failure = None;
    for effect in effects {
        let Some(outcome) = execute(api, effect).await else {
            continue;
        };
        if let Some(error) = outcome.api_error() {
            failure = Some(error.clone());
        }
        apply(core, outcome).await?;
    }

    match failure {
        Some(error) => Err(SessionError::Api(error)),
        None => Ok(()),
    }
}

/// Run one transition under the lock. Notices are queued; remote effects
/// are returned for execution after the lock is released.
async fn apply(core: &Mutex<SessionCore>, event: Event) -> Result<Vec<Effect>, TransitionError> {
    let mut core = core.lock().await;
    let result = transition(&core.state, event)?;
    core.state = result.new_state;

    let mut remote = Vec::new();
    for effect in result.effects {
        match effect {
            Effect::Notify(notice) => core.notices.push(notice),
            other => remote.push(other),
        }
    }
    Ok(remote)
}

async fn execute<A: LegalApi>(api: &A, effect: Effect) -> Option<Event> {
    let outcome = match effect {
        Effect::SendQuery(request) => {
            tracing::info!(
                field = %request.field,
                language = %request.language,
                top_k = request.top_k,
                "Submitting legal query"
            );
            match api.query(&request).await {
                Ok(response) => Event::QueryAnswered { response },
                Err(error) => Event::QueryFailed { error },
            }
        }
        Effect::SendFeedback(request) => {
            tracing::info!(
                query_id = %request.query_id,
                feedback_type = %request.feedback_type,
                "Submitting feedback"
            );
            match api.feedback(&request).await {
                Ok(()) => Event::FeedbackAccepted {
                    query_id: request.query_id,
                    kind: request.feedback_type,
                    correction_text: request.correction_text,
                },
                Err(error) => Event::FeedbackFailed {
                    query_id: request.query_id,
                    error,
                },
            }
        }
        Effect::RequestReflection { query_id } => {
            tracing::info!(query_id = %query_id, "Requesting reflection");
            match api.reflect(&query_id).await {
                Ok(response) => Event::ReflectionReceived {
                    query_id,
                    reflection: response.reflection,
                },
                Err(error) => Event::ReflectionFailed { query_id, error },
            }
        }
        Effect::Notify(_) => return None,
    };
    Some(outcome)
}
