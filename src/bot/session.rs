use std::sync::Arc;

use tracing::{debug, warn};

use crate::bot::conversation_state::{ConversationState, Turn};
use crate::bot::gateway::ModelGateway;
use crate::bot::prompt::SYSTEM_PROMPT;
use crate::config::BotConfig;
use crate::error::BotError;
use crate::mistral_client::MistralClient;

/// What happens to the user turn when the model call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailedTurnPolicy {
    /// Leave the unanswered user turn in history.
    #[default]
    Keep,
    /// Remove the unanswered user turn again.
    RollBack,
}

/// One conversation with the model: the history, the fixed system turn and
/// the gateway it is replayed to.
pub struct ConversationSession {
    system_turn: Turn,
    conversation: ConversationState,
    gateway: Arc<dyn ModelGateway>,
    failed_turn_policy: FailedTurnPolicy,
}

impl ConversationSession {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            system_turn: Turn::system(SYSTEM_PROMPT),
            conversation: ConversationState::new(),
            gateway,
            failed_turn_policy: FailedTurnPolicy::default(),
        }
    }

    /// Builds a session talking to the Mistral endpoint described by `config`.
    pub fn from_config(config: &BotConfig) -> Result<Self, BotError> {
        let client = MistralClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn with_failed_turn_policy(mut self, policy: FailedTurnPolicy) -> Self {
        self.failed_turn_policy = policy;
        self
    }

    pub fn model(&self) -> &str {
        self.gateway.model()
    }

    /// Appends `user_text`, replays the whole dialogue to the model and
    /// records the reply.
    ///
    /// On a gateway failure no assistant turn is added; whether the user turn
    /// stays depends on the [`FailedTurnPolicy`].
    pub async fn send(&mut self, user_text: &str) -> Result<String, BotError> {
        if user_text.trim().is_empty() {
            return Err(BotError::EmptyInput);
        }

        self.conversation.add_user_message(user_text);
        let turns = self.outbound_turns();
        debug!(turns = turns.len(), model = self.model(), "forwarding conversation");

        match self.gateway.complete(&turns).await {
            Ok(reply) => {
                self.conversation.add_assistant_message(&reply);
                Ok(reply)
            }
            Err(e) => {
                warn!("model call failed: {}", e);
                if self.failed_turn_policy == FailedTurnPolicy::RollBack {
                    self.conversation.discard_unanswered();
                }
                Err(e.into())
            }
        }
    }

    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    /// Copy of the conversation so far, without the system turn.
    pub fn history(&self) -> Vec<Turn> {
        self.conversation.turns().to_vec()
    }

    fn outbound_turns(&self) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.conversation.len() + 1);
        turns.push(self.system_turn.clone());
        turns.extend_from_slice(self.conversation.turns());
        turns
    }
}
