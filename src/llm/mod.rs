//! Clients for the hosted language-model APIs.
//!
//! Each client implements a small trait so the modules that use them can be
//! handed a test double instead.

/// Chat message types and the completion trait.
pub mod chat;
/// Embedding trait and OpenAI client.
pub mod embeddings;
/// OpenAI chat-completions client.
pub mod openai;

pub use chat::{ChatCompletion, ChatMessage, ChatOptions, ChatReply, MessageRole, Usage};
pub use embeddings::{EmbeddingModel, OpenAiEmbeddings};
pub use openai::OpenAiChat;
