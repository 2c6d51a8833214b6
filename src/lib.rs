//! chatguru - a Yoga Sutra guide
//!
//! Keyword retrieval over a small fixed set of sutras, a model-backed scope
//! gate, and grounded answers that report which sutras they cite.

pub mod citations;
pub mod client;
pub mod composer;
pub mod config;
pub mod error;
pub mod gate;
pub mod keywords;
pub mod pipeline;
pub mod profile;
pub mod prompt;
pub mod retrieval;
pub mod server;
pub mod store;
pub mod sutras;

pub use client::{ChatClient, TextGenerator};
pub use error::{GenerationError, KnowledgeError, StoreError};
pub use pipeline::{ChatReply, Guru, ReplyKind};
pub use profile::{Inclination, SpiritualProfile};
pub use sutras::{KnowledgeBase, Sutra};

/// Install the tracing subscriber used by both binaries (`RUST_LOG`, default `info`)
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
