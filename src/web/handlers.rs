//! HTTP request handlers

use super::forms::{FeedbackForm, QueryForm, SettingsForm};
use super::render::{render_page, PageView, StatsView};
use super::AppState;
use crate::state_machine::Notice;
use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use chrono::Local;

/// Create the page router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/query", post(submit_query))
        .route("/feedback", post(submit_feedback))
        .route("/reflect", post(request_reflection))
        .route("/clear", post(clear_conversation))
        .route("/settings", post(update_settings))
        .route("/health", get(health))
        .with_state(state)
}

// ============================================================
// Page
// ============================================================

async fn index(State(state): State<AppState>) -> Html<String> {
    let stats = StatsView::from(state.session.stats().await);
    let snapshot = state.session.snapshot().await;
    let notices = state.session.take_notices().await;

    Html(render_page(&PageView {
        state: &snapshot,
        notices: &notices,
        stats: &stats,
        now: Local::now(),
    }))
}

async fn health() -> &'static str {
    "ok"
}

// ============================================================
// Actions (post/redirect/get)
// ============================================================

async fn submit_query(State(state): State<AppState>, Form(form): Form<QueryForm>) -> Redirect {
    let selection = state.session.snapshot().await.selection;
    let result = state
        .session
        .submit_query(&form.query, selection.field, selection.language)
        .await;
    state.session.report(result).await;
    Redirect::to("/")
}

async fn submit_feedback(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> Redirect {
    let result = state
        .session
        .submit_feedback(form.feedback_type, form.correction_text, form.comments)
        .await;
    state.session.report(result).await;
    Redirect::to("/")
}

async fn request_reflection(State(state): State<AppState>) -> Redirect {
    let result = state.session.request_reflection().await;
    state.session.report(result).await;
    Redirect::to("/")
}

async fn clear_conversation(State(state): State<AppState>) -> Redirect {
    match state.session.clear().await {
        Ok(()) => {
            tracing::info!("Conversation cleared");
            state.session.push_notice(Notice::info("Conversation cleared.")).await;
        }
        result => state.session.report(result).await,
    }
    Redirect::to("/")
}

async fn update_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Redirect {
    let result = state.session.update_settings(form.patch()).await;
    state.session.report(result).await;
    let result = state
        .session
        .select_documents(form.field, form.language)
        .await;
    state.session.report(result).await;
    Redirect::to("/")
}
