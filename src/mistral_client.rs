use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::bot::{ModelGateway, Turn};
use crate::config::BotConfig;
use crate::error::{ConfigError, GatewayError};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Gateway to the Mistral chat completions endpoint.
pub struct MistralClient {
    api_key: String,
    model: String,
    completions_url: Url,
    client: reqwest::Client,
}

impl MistralClient {
    pub fn new(config: &BotConfig) -> Result<Self, ConfigError> {
        let completions_url =
            config
                .endpoint
                .join("chat/completions")
                .map_err(|e| ConfigError::InvalidEndpoint {
                    url: config.endpoint.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            completions_url,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl ModelGateway for MistralClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String, GatewayError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: turns,
        };

        debug!(
            "Sending request to Mistral API: {}",
            serde_json::to_string_pretty(&request_body).unwrap_or_default()
        );

        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("API request failed with status {}: {}", status, body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Received response from Mistral API: {}", body);

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Malformed("response contained no message content".into()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured {
        body: Arc<Mutex<Option<Value>>>,
        authorization: Arc<Mutex<Option<String>>>,
    }

    async fn spawn_mock(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    fn client_for(endpoint: &str) -> MistralClient {
        let config = BotConfig::new("test-key")
            .unwrap()
            .with_endpoint(endpoint)
            .unwrap();
        MistralClient::new(&config).unwrap()
    }

    fn fixed_reply(status: StatusCode, body: &'static str) -> Router {
        Router::new().route(
            "/v1/chat/completions",
            post(move || async move { (status, body).into_response() }),
        )
    }

    #[tokio::test]
    async fn sends_model_turns_and_bearer_key() {
        let captured = Captured::default();
        let router = Router::new()
            .route(
                "/v1/chat/completions",
                post(
                    |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        *captured.authorization.lock().unwrap() = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        *captured.body.lock().unwrap() = Some(body);
                        Json(json!({
                            "id": "cmpl-1",
                            "choices": [
                                {"index": 0, "message": {"role": "assistant", "content": "KYC means..."}}
                            ]
                        }))
                    },
                ),
            )
            .with_state(captured.clone());
        let client = client_for(&spawn_mock(router).await);

        let turns = vec![Turn::system("be helpful"), Turn::user("What is KYC?")];
        let reply = client.complete(&turns).await.unwrap();

        assert_eq!(reply, "KYC means...");
        assert_eq!(
            captured.authorization.lock().unwrap().as_deref(),
            Some("Bearer test-key")
        );
        assert_eq!(
            captured.body.lock().unwrap().clone().unwrap(),
            json!({
                "model": "mistral-large-latest",
                "messages": [
                    {"role": "system", "content": "be helpful"},
                    {"role": "user", "content": "What is KYC?"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn auth_failure_becomes_status_error() {
        let router = fixed_reply(StatusCode::UNAUTHORIZED, "{\"message\":\"Unauthorized\"}");
        let client = client_for(&spawn_mock(router).await);

        let err = client.complete(&[Turn::system("s")]).await.unwrap_err();

        assert_eq!(
            err,
            GatewayError::Status {
                status: 401,
                body: "{\"message\":\"Unauthorized\"}".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let router = fixed_reply(StatusCode::OK, "<html>gateway</html>");
        let client = client_for(&spawn_mock(router).await);

        let err = client.complete(&[Turn::system("s")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
    }

    #[tokio::test]
    async fn empty_choices_are_malformed() {
        let router = fixed_reply(StatusCode::OK, "{\"choices\": []}");
        let client = client_for(&spawn_mock(router).await);

        let err = client.complete(&[Turn::system("s")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(&format!("http://{}/v1", addr));

        let err = client.complete(&[Turn::system("s")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[test]
    fn completions_url_is_joined_onto_the_endpoint() {
        let client = client_for("https://api.example.test/v1");
        assert_eq!(
            client.completions_url.as_str(),
            "https://api.example.test/v1/chat/completions"
        );
        assert_eq!(client.model(), "mistral-large-latest");
    }
}
