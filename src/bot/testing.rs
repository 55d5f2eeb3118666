//! In-memory gateway used by the session and shell tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::bot::conversation_state::Turn;
use crate::bot::gateway::ModelGateway;
use crate::error::GatewayError;

/// Returns scripted replies in order and records every turn list it receives.
/// Once the script runs out it answers `"ok"`. Every call yields to the
/// scheduler once before answering.
pub struct ScriptedGateway {
    model: String,
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<Vec<Turn>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            model: "test-model".to_string(),
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::Transport(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<Vec<Turn>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(turns.to_vec());
        // Give a concurrent caller the chance to interleave.
        tokio::task::yield_now().await;
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}
