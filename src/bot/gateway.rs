use async_trait::async_trait;

use crate::bot::conversation_state::Turn;
use crate::error::GatewayError;

/// The single outbound call to the remote model.
///
/// `turns` always starts with the system turn. Implementations perform one
/// round trip per call: no retries, no streaming.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Identifier of the model every request is sent to.
    fn model(&self) -> &str;

    async fn complete(&self, turns: &[Turn]) -> Result<String, GatewayError>;
}
