//! Conversation core shared by the API server and the interactive chat.

pub mod command;
pub mod conversation_state;
pub mod gateway;
pub mod prompt;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use command::{Submission, CLEAR_ACKNOWLEDGEMENT};
pub use conversation_state::Turn;
pub use gateway::ModelGateway;
pub use session::{ConversationSession, FailedTurnPolicy};
