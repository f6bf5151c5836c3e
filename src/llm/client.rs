//! HTTP client for provider completions endpoints.
//!
//! Every recognized provider speaks the OpenAI-compatible
//! `/chat/completions` wire format; provider differences are confined to the
//! extra headers carried by [`ConnectionParams`].

use reqwest::Client;
use tracing::debug;

use super::error::LLMError;
use super::registry::ConnectionParams;
use super::types::{ChatRequest, ChatResponse, ErrorResponse};

/// Fallback when a provider error body carries no message.
const UNKNOWN_ERROR: &str = "unknown error";

/// Thin client over a provider's completions endpoint.
pub struct ChatClient {
    client: Client,
}

impl ChatClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Send a completion request and extract the reply text from the first
    /// choice.
    ///
    /// Non-2xx responses become [`LLMError::Api`] carrying the body's
    /// `error.message` when present. A 2xx response with no extractable
    /// reply text becomes [`LLMError::EmptyReply`].
    pub async fn chat(
        &self,
        params: &ConnectionParams,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<String, LLMError> {
        let url = format!("{}/chat/completions", params.base_url);
        debug!(
            provider = %params.provider,
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let mut req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key));
        for (name, value) in &params.extra_headers {
            req = req.header(name, value);
        }

        let response = req.json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body
                    .error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
                Err(_) => UNKNOWN_ERROR.to_string(),
            };
            return Err(LLMError::Api { status, message });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LLMError::EmptyReply)
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::llm::types::Message;

    fn params_for(server: &MockServer) -> ConnectionParams {
        ConnectionParams {
            base_url: server.uri(),
            model: "test-model".to_string(),
            extra_headers: vec![("anthropic-version".to_string(), "2023-06-01".to_string())],
            provider: "Anthropic".to_string(),
            manual_override: false,
        }
    }

    fn request() -> ChatRequest {
        ChatRequest::new("test-model", vec![Message::user("hello")])
    }

    #[tokio::test]
    async fn sends_auth_extra_headers_and_fixed_generation_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "messages": [{"role": "user", "content": "hello"}],
                "max_tokens": 1000,
                "temperature": 0.7
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "hi"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new();
        let reply = client
            .chat(&params_for(&server), "sk-ant-test", &request())
            .await
            .unwrap();
        assert_eq!(reply, "hi");
    }

    #[tokio::test]
    async fn non_success_status_extracts_the_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "bad key"}})),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new();
        let err = client
            .chat(&params_for(&server), "sk-ant-test", &request())
            .await
            .unwrap_err();
        match err {
            LLMError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_without_error_body_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
            .mount(&server)
            .await;

        let client = ChatClient::new();
        let err = client
            .chat(&params_for(&server), "sk-ant-test", &request())
            .await
            .unwrap_err();
        match err {
            LLMError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "unknown error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_without_reply_text_is_an_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = ChatClient::new();
        let err = client
            .chat(&params_for(&server), "sk-ant-test", &request())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::EmptyReply));
    }

    #[tokio::test]
    async fn success_with_empty_string_content_is_an_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            })))
            .mount(&server)
            .await;

        let client = ChatClient::new();
        let err = client
            .chat(&params_for(&server), "sk-ant-test", &request())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::EmptyReply));
    }

    #[tokio::test]
    async fn transport_failure_is_a_request_error() {
        // Nothing listens on this port.
        let params = ConnectionParams {
            base_url: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
            extra_headers: Vec::new(),
            provider: "Unknown".to_string(),
            manual_override: true,
        };

        let client = ChatClient::new();
        let err = client.chat(&params, "some-key", &request()).await.unwrap_err();
        assert!(matches!(err, LLMError::Request(_)));
    }
}
