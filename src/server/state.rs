//! Shared state for the HTTP server.

use std::fmt::Display;

use tokio::sync::Mutex;

use crate::bot::ConversationSession;
use crate::error::BotError;

/// Shared state available to all HTTP handlers.
///
/// Holds the one process-wide session, or the reason it could not be built.
/// The mutex is held for the whole of a `send`, so overlapping chat requests
/// are answered one after another.
pub struct SharedState {
    session: Option<Mutex<ConversationSession>>,
    init_error: Option<String>,
    model: String,
}

impl SharedState {
    pub fn ready(session: ConversationSession) -> Self {
        let model = session.model().to_string();
        Self {
            session: Some(Mutex::new(session)),
            init_error: None,
            model,
        }
    }

    pub fn not_ready(reason: impl Display) -> Self {
        Self {
            session: None,
            init_error: Some(reason.to_string()),
            model: "N/A".to_string(),
        }
    }

    pub fn from_init(result: Result<ConversationSession, BotError>) -> Self {
        match result {
            Ok(session) => Self::ready(session),
            Err(e) => Self::not_ready(e),
        }
    }

    pub fn session(&self) -> Option<&Mutex<ConversationSession>> {
        self.session.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn init_error(&self) -> Option<&str> {
        self.init_error.as_deref()
    }

    /// Configured model identifier, `"N/A"` when not initialized.
    pub fn model(&self) -> &str {
        &self.model
    }
}
