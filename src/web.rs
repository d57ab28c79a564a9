//! Chat page server
//!
//! Serves the conversation as a server-rendered page. Every form posts an
//! action to the session and redirects back to `/`.

mod forms;
mod handlers;
mod render;

pub use handlers::create_router;

use crate::api_client::LegalApi;
use crate::session::Session;
use std::sync::Arc;

/// Session driven by whichever API client the server was started with
pub type ChatSession = Session<Arc<dyn LegalApi>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ChatSession>,
}

impl AppState {
    pub fn new(api: Arc<dyn LegalApi>) -> Self {
        Self {
            session: Arc::new(Session::new(api)),
        }
    }
}
