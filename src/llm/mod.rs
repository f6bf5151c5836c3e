//! Provider detection and the chat completion client.

mod client;
mod error;
mod registry;
mod types;

pub use client::ChatClient;
pub use error::LLMError;
pub use registry::{ConnectionParams, classify};
pub use types::{
    ChatRequest, ChatResponse, Choice, ChoiceMessage, MAX_TOKENS, Message, Role, TEMPERATURE,
};
