//! HTML rendering
//!
//! `render_page` is a pure projection of a `PageView`; it performs no I/O and
//! reads no clock.

use crate::api_client::{
    ApiError, DocumentMetadata, Language, LegalField, ReferenceDocument, StatsResponse,
};
use crate::state_machine::{Activity, ConversationTurn, Notice, QuerySettings, SessionState};
use chrono::{DateTime, Local};
use pulldown_cmark::{html, Event as MdEvent, Options, Parser, Tag, TagEnd};

const PAGE_STYLE: &str = r"
body { margin: 0; font-family: system-ui, sans-serif; display: flex; min-height: 100vh; }
aside { width: 300px; padding: 16px; background: #f5f5f5; box-sizing: border-box; }
main { flex: 1; padding: 24px 32px; max-width: 960px; }
.turn { padding: 12px; border-radius: 8px; margin-bottom: 12px; }
.turn.user { background: #f0f2f6; }
.turn.assistant { background: #e6f7ff; }
.reference { padding: 12px; margin-bottom: 15px; border-left: 3px solid #4e8cff;
  background: #f8f9fa; border-radius: 0 8px 8px 0; }
.reference h4 { margin-top: 0; }
.caption { color: #666; font-size: 0.85em; margin-right: 16px; }
.notice { padding: 10px 12px; border-radius: 6px; margin-bottom: 12px; }
.notice.success { background: #e7f6e7; }
.notice.info { background: #e8f0fe; }
.notice.warning { background: #fff4e0; }
.notice.error { background: #fde8e8; }
.feedback { background: #f9f9f9; padding: 15px; border-radius: 8px; margin-top: 20px; }
.busy { font-style: italic; color: #555; }
.status.connected { color: #1b7f1b; }
.status.issues { color: #b36b00; }
.status.offline { color: #b00020; }
button { width: 100%; margin-top: 6px; }
";

/// Outcome of the statistics fetch for the sidebar
#[derive(Debug, Clone)]
pub enum StatsView {
    Available(StatsResponse),
    Unavailable { reason: String, reachable: bool },
}

impl From<Result<StatsResponse, ApiError>> for StatsView {
    fn from(result: Result<StatsResponse, ApiError>) -> Self {
        match result {
            Ok(stats) => StatsView::Available(stats),
            Err(e) => {
                tracing::warn!(error = %e, "Statistics unavailable");
                StatsView::Unavailable {
                    reason: e.message,
                    reachable: e.kind.is_reachable(),
                }
            }
        }
    }
}

impl StatsView {
    fn status(&self) -> (&'static str, &'static str) {
        match self {
            StatsView::Available(_) => ("connected", "🟢 API Connected"),
            StatsView::Unavailable {
                reachable: true, ..
            } => ("issues", "🟠 API Connection Issues"),
            StatsView::Unavailable { .. } => ("offline", "🔴 API Offline"),
        }
    }
}

/// Everything needed to draw one page
pub struct PageView<'a> {
    pub state: &'a SessionState,
    pub notices: &'a [Notice],
    pub stats: &'a StatsView,
    pub now: DateTime<Local>,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Tunisian Legal Assistant</title>\n<style>");
    out.push_str(PAGE_STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    render_sidebar(&mut out, view);

    out.push_str("<main>\n<h1>🇹🇳 Tunisian Legal Assistant</h1>\n");
    out.push_str("<p>Ask questions about Tunisian criminal law or constitution</p>\n");

    for notice in view.notices {
        out.push_str(&format!(
            "<div class=\"notice {}\">{}</div>\n",
            notice.level.as_str(),
            escape(&notice.message)
        ));
    }

    let show_reflection = view.state.settings.enable_reflection;
    for turn in &view.state.conversation {
        render_turn(&mut out, turn, show_reflection);
    }

    if let Some(label) = busy_label(&view.state.activity) {
        out.push_str(&format!("<p class=\"busy\">{label}</p>\n"));
    }

    if view.state.accepts_feedback() {
        render_feedback(&mut out);
    }

    out.push_str(
        "<form method=\"post\" action=\"/query\">\n\
         <input type=\"text\" name=\"query\" placeholder=\"Ask a legal question...\" \
         style=\"width:100%\" autofocus required>\n\
         <button type=\"submit\">Send</button>\n</form>\n",
    );
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn busy_label(activity: &Activity) -> Option<&'static str> {
    match activity {
        Activity::Idle => None,
        Activity::Querying => Some("🔍 Searching legal documents..."),
        Activity::SubmittingFeedback { .. } => Some("Submitting feedback..."),
        Activity::Reflecting { .. } => Some("🤔 Reflecting on the answer..."),
    }
}

fn render_turn(out: &mut String, turn: &ConversationTurn, show_reflection: bool) {
    out.push_str(&format!(
        "<div class=\"turn {}\">\n{}",
        turn.role.as_str(),
        markdown(&turn.content)
    ));

    if !turn.sources.is_empty() {
        out.push_str("<h3>📚 Reference Documents</h3>\n");
        for (index, doc) in turn.sources.iter().enumerate() {
            render_document(out, doc, index);
        }
    }

    if let Some(reflection) = turn.reflection.as_deref().filter(|_| show_reflection) {
        out.push_str(&format!(
            "<details>\n<summary>🤔 Model Self-Reflection</summary>\n{}</details>\n",
            markdown(reflection)
        ));
    }
    out.push_str("</div>\n");
}

fn render_document(out: &mut String, doc: &ReferenceDocument, index: usize) {
    out.push_str(&format!(
        "<div class=\"reference\">\n<h4>Reference {} (Score: {:.2})</h4>\n<p>{}</p>\n",
        index + 1,
        doc.score,
        escape(&doc.text)
    ));
    if let Some(meta) = doc.metadata.as_ref().filter(|m| !m.is_empty()) {
        render_metadata(out, meta);
    }
    out.push_str("</div>\n");
}

fn render_metadata(out: &mut String, meta: &DocumentMetadata) {
    out.push_str("<div>");
    if let Some(source) = &meta.source {
        out.push_str(&format!("<span class=\"caption\">📄 {}</span>", escape(source)));
    }
    if let Some(page) = &meta.page {
        out.push_str(&format!("<span class=\"caption\">📖 Page {}</span>", escape(page)));
    }
    if let Some(article) = &meta.article {
        out.push_str(&format!(
            "<span class=\"caption\">⚖️ Article {}</span>",
            escape(article)
        ));
    }
    out.push_str("</div>\n");
}

fn render_feedback(out: &mut String) {
    out.push_str(
        "<section class=\"feedback\">\n<h3>💬 Provide Feedback</h3>\n\
         <form method=\"post\" action=\"/feedback\">\
         <button name=\"feedback_type\" value=\"positive\" \
         title=\"The response was accurate and helpful\">👍 Positive</button>\
         <button name=\"feedback_type\" value=\"negative\" \
         title=\"The response was inaccurate or unhelpful\">👎 Negative</button>\
         </form>\n\
         <form method=\"post\" action=\"/reflect\">\
         <button type=\"submit\" title=\"Get the model's self-assessment\">🔄 Reflect</button>\
         </form>\n\
         <form method=\"post\" action=\"/feedback\">\n\
         <input type=\"hidden\" name=\"feedback_type\" value=\"correction\">\n\
         <label>✏️ Provide a corrected answer<br>\
         <textarea name=\"correction_text\" rows=\"4\" style=\"width:100%\"></textarea></label>\n\
         <label>💬 Additional comments (optional)<br>\
         <input type=\"text\" name=\"comments\" style=\"width:100%\"></label>\n\
         <button type=\"submit\">Submit Correction</button>\n</form>\n</section>\n",
    );
}

fn render_sidebar(out: &mut String, view: &PageView<'_>) {
    let state = view.state;
    out.push_str("<aside>\n<h2>⚙️ Settings</h2>\n<form method=\"post\" action=\"/settings\">\n");
    render_settings_inputs(out, &state.settings);

    out.push_str("<h4>Document Selection</h4>\n<label>Legal Domain<br><select name=\"field\">");
    for field in LegalField::ALL {
        out.push_str(&option(field.as_str(), field == state.selection.field));
    }
    out.push_str("</select></label><br>\n<label>Response Language<br><select name=\"language\">");
    for language in Language::ALL {
        out.push_str(&option(language.as_str(), language == state.selection.language));
    }
    out.push_str("</select></label>\n<button type=\"submit\">Apply</button>\n</form>\n");

    out.push_str(
        "<form method=\"post\" action=\"/clear\">\
         <button type=\"submit\">Clear Conversation</button></form>\n<hr>\n",
    );

    out.push_str("<h2>📊 Statistics</h2>\n");
    match view.stats {
        StatsView::Available(stats) => {
            out.push_str(&format!(
                "<p>Total Queries: <b>{}</b><br>Documents Loaded: <b>{}</b></p>\n\
                 <h4>Feedback</h4>\n<p>👍 Positive: {}<br>👎 Negative: {}<br>✏️ Corrections: {}</p>\n",
                stats.queries_processed,
                stats.total_documents(),
                stats.feedback_stats.positive,
                stats.feedback_stats.negative,
                stats.feedback_stats.corrections
            ));
        }
        StatsView::Unavailable { reason, .. } => {
            out.push_str(&format!(
                "<div class=\"notice warning\">Couldn't load statistics: {}</div>\n",
                escape(reason)
            ));
        }
    }

    let (class, label) = view.stats.status();
    out.push_str(&format!(
        "<hr>\n<p class=\"status {class}\">{label}</p>\n<small>v{} | {}</small>\n</aside>\n",
        env!("CARGO_PKG_VERSION"),
        view.now.format("%Y-%m-%d %H:%M")
    ));
}

fn render_settings_inputs(out: &mut String, settings: &QuerySettings) {
    out.push_str(&format!(
        "<label>Temperature ({:.1})<br><input type=\"range\" name=\"temperature\" \
         min=\"0.1\" max=\"1.0\" step=\"0.1\" value=\"{:.1}\"></label><br>\n\
         <label>Max Response Length ({})<br><input type=\"range\" name=\"max_tokens\" \
         min=\"50\" max=\"500\" step=\"50\" value=\"{}\"></label><br>\n\
         <label>Reference Documents ({})<br><input type=\"range\" name=\"top_k\" \
         min=\"1\" max=\"5\" step=\"1\" value=\"{}\"></label><br>\n\
         <label><input type=\"checkbox\" name=\"enable_reflection\"{}> \
         Enable Self-Reflection</label>\n",
        settings.temperature,
        settings.temperature,
        settings.max_tokens,
        settings.max_tokens,
        settings.top_k,
        settings.top_k,
        if settings.enable_reflection { " checked" } else { "" }
    ));
}

fn option(value: &str, selected: bool) -> String {
    let selected = if selected { " selected" } else { "" };
    format!("<option value=\"{value}\"{selected}>{value}</option>")
}

/// Markdown to HTML with embedded raw HTML shown as text. Links and images
/// pointing anywhere but web or mail addresses are reduced to their text.
fn markdown(text: &str) -> String {
    let mut kept = Vec::new();
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .filter_map(move |event| {
            let link_target = match &event {
                MdEvent::Start(Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. }) => {
                    Some(is_safe_url(dest_url))
                }
                _ => None,
            };
            if let Some(safe) = link_target {
                kept.push(safe);
                return safe.then_some(event);
            }
            match event {
                MdEvent::End(TagEnd::Link | TagEnd::Image) => {
                    kept.pop().unwrap_or(true).then_some(event)
                }
                MdEvent::Html(raw) | MdEvent::InlineHtml(raw) => Some(MdEvent::Text(raw)),
                other => Some(other),
            }
        });
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn is_safe_url(url: &str) -> bool {
    url.trim_start().split_once(':').is_some_and(|(scheme, _)| {
        ["http", "https", "mailto"]
            .iter()
            .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
