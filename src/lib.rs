//! Keychat - a bring-your-own-key chat client with automatic provider detection.
//!
//! The user supplies an API key; [`llm::classify`] pattern-matches it against
//! an ordered list of provider profiles and pins the connection parameters for
//! the session. [`session::ChatSession`] owns the conversation state and talks
//! to the provider's completions endpoint. Nothing is persisted: the key and
//! the history live in memory for exactly one session.

pub mod llm;
pub mod session;
