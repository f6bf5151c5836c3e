//! Session state and the conversation controller.
//!
//! A [`ChatSession`] owns everything the session mutates: the in-memory API
//! key, the pinned connection parameters, the append-only message history,
//! and the pending-request flag. All provider and transport failures are
//! ingested into history as assistant messages; the only errors surfaced to
//! the caller are pre-send rejections that leave the session untouched.

use thiserror::Error;
use tracing::{debug, info};

use crate::llm::{ChatClient, ChatRequest, ConnectionParams, LLMError, Message, classify};

/// Prefix for assistant messages that render a provider error.
const ERROR_PREFIX: &str = "Error:";

/// Prefix for assistant messages that render a transport failure.
const NETWORK_ERROR_PREFIX: &str = "Network error:";

/// Stand-in reply when a success response carries no text.
const EMPTY_REPLY_PLACEHOLDER: &str = "Empty response";

/// Reasons a send is rejected before any request is issued.
///
/// Rejections are no-ops: history is untouched and no request goes out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendRejected {
    /// Message text was empty after trimming
    #[error("nothing to send")]
    EmptyMessage,

    /// A request is already in flight
    #[error("a request is already pending, wait for it to finish")]
    RequestPending,

    /// Connection parameters are incomplete
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// A single chat session: key entry, then chatting, until the process ends.
pub struct ChatSession {
    client: ChatClient,
    api_key: String,
    params: Option<ConnectionParams>,
    history: Vec<Message>,
    pending: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            client: ChatClient::new(),
            api_key: String::new(),
            params: None,
            history: Vec::new(),
            pending: false,
        }
    }

    /// Trim and classify the key, pinning connection parameters for the
    /// session.
    ///
    /// Never fails: an unrecognized key pins a manual-override result the
    /// caller completes via [`set_manual_params`](Self::set_manual_params).
    pub fn submit_key(&mut self, key: &str) -> &ConnectionParams {
        let key = key.trim();
        let params = classify(key);
        info!(
            provider = %params.provider,
            manual = params.manual_override,
            "classified api key"
        );
        self.api_key = key.to_string();
        self.params.insert(params)
    }

    /// Fill in endpoint and model by hand. Only meaningful while the pinned
    /// parameters are in manual-override mode; a matched profile is never
    /// overwritten.
    pub fn set_manual_params(&mut self, model: &str, base_url: &str) {
        if let Some(params) = self.params.as_mut()
            && params.manual_override
        {
            params.model = model.trim().to_string();
            params.base_url = base_url.trim().to_string();
        }
    }

    pub fn params(&self) -> Option<&ConnectionParams> {
        self.params.as_ref()
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_empty() {
            missing.push("API key");
        }
        match &self.params {
            Some(params) => {
                if params.model.is_empty() {
                    missing.push("model");
                }
                if params.base_url.is_empty() {
                    missing.push("URL");
                }
            }
            None => {
                missing.push("model");
                missing.push("URL");
            }
        }
        missing
    }

    /// Send a message and ingest the outcome into history.
    ///
    /// The user message is appended before the round trip so it is visible
    /// immediately. Provider errors, empty replies, and transport failures
    /// all land in history as assistant messages; they end the send, not the
    /// session. At most one request is in flight at a time — sends made
    /// while one is pending are rejected outright, with no queueing.
    pub async fn send_message(&mut self, text: &str) -> Result<(), SendRejected> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendRejected::EmptyMessage);
        }
        if self.pending {
            return Err(SendRejected::RequestPending);
        }
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(SendRejected::MissingFields(missing));
        }
        let Some(params) = self.params.clone() else {
            // missing_fields() reports an absent params as missing model/URL
            return Err(SendRejected::MissingFields(vec!["model", "URL"]));
        };

        self.history.push(Message::user(text));
        self.pending = true;

        let request = ChatRequest::new(params.model.clone(), self.history.clone());
        let reply = match self.client.chat(&params, &self.api_key, &request).await {
            Ok(content) => content,
            Err(LLMError::Api { status, message }) => {
                debug!(status, "provider returned an error response");
                format!("{ERROR_PREFIX} {message}")
            }
            Err(LLMError::EmptyReply) => EMPTY_REPLY_PLACEHOLDER.to_string(),
            Err(LLMError::Request(err)) => {
                debug!(error = %err, "chat request never completed");
                format!("{NETWORK_ERROR_PREFIX} {err}")
            }
        };

        self.history.push(Message::assistant(reply));
        self.pending = false;
        Ok(())
    }

    /// Reset history to empty. Connection parameters and the stored key are
    /// untouched.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Return to the key-entry flow: the key, the pinned parameters, and the
    /// history are all discarded.
    pub fn reset_key(&mut self) {
        self.api_key.clear();
        self.params = None;
        self.history.clear();
        self.pending = false;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
