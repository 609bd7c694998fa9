//! Retrieval-grounded tutor replies.

pub mod generator;
pub mod prompt;
pub mod reply;
pub mod types;

pub use generator::ResponseGenerator;
pub use types::{AiResponse, ConversationTurn, ResponseMetadata, RetrievedPassage, UserProfile};
