use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while resolving configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "MISTRAL_API_KEY not found. Set it in the environment, in a .env file, \
         or in a secrets.toml file containing: MISTRAL_API_KEY = \"your_api_key_here\""
    )]
    MissingCredential,

    #[error("Failed to read secret store {}: {message}", .path.display())]
    SecretStore { path: PathBuf, message: String },

    #[error("Invalid endpoint URL {url}: {message}")]
    InvalidEndpoint { url: String, message: String },
}

/// A failed round trip to the remote model.
///
/// Every variant carries the original message text so callers can show it
/// without inspecting the underlying transport error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Error communicating with Mistral API: {0}")]
    Transport(String),

    #[error("Error communicating with Mistral API: status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Error communicating with Mistral API: malformed response: {0}")]
    Malformed(String),
}

/// Errors surfaced to the presentation shells.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Initialization(#[from] ConfigError),

    #[error("Empty message")]
    EmptyInput,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_keep_original_text() {
        let err = BotError::from(GatewayError::Transport("connection refused".into()));
        assert_eq!(
            err.to_string(),
            "Error communicating with Mistral API: connection refused"
        );
    }

    #[test]
    fn status_error_mentions_code_and_body() {
        let err = GatewayError::Status {
            status: 401,
            body: "Unauthorized".into(),
        };
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("Unauthorized"));
    }

    #[test]
    fn missing_credential_names_the_variable() {
        let err = BotError::from(ConfigError::MissingCredential);
        assert!(err.to_string().contains("MISTRAL_API_KEY"));
    }
}
