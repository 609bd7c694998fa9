//! Backend helpers for the StudyBuddy learning assistant: grounded tutor
//! replies, text embeddings and avatar hosting, each backed by a hosted API.

pub mod assistant;
pub mod capability;
pub mod commands;
pub mod config;
pub mod embedding;
pub mod error;
pub(crate) mod http;
pub mod llm;
pub mod logging;
pub mod media;

pub use assistant::ResponseGenerator;
pub use capability::Capability;
pub use config::Settings;
pub use embedding::EmbeddingGenerator;
pub use media::AvatarManager;
