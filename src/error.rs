//! Error types shared across the library
//!
//! The pipeline itself never surfaces these to the end user: generation and
//! classification failures are absorbed into fallback text. They exist so the
//! collaborators (client, stores, knowledge base) can report what went wrong.

use thiserror::Error;

/// Failure of a text-generation call (transport, quota, or model failure)
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("no API key configured")]
    MissingApiKey,
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Transport(e.to_string())
    }
}

/// Knowledge base construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("sutra {chapter}.{verse} appears more than once")]
    Duplicate { chapter: u32, verse: u32 },

    #[error("sutra {chapter}.{verse} has no keywords")]
    NoKeywords { chapter: u32, verse: u32 },

    #[error("sutra {chapter}.{verse} has a zero chapter or verse number")]
    InvalidId { chapter: u32, verse: u32 },
}

/// Persistence collaborator errors (profiles, chat history)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
