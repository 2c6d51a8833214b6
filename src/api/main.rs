//! chatguru-api: HTTP server for the Yoga Sutra guide
//!
//! Run with: OPENAI_API_KEY=... cargo run --bin chatguru-api

use anyhow::Context;
use std::sync::Arc;

use chatguru::config::Config;
use chatguru::server::{self, AppState};
use chatguru::store::FileStore;
use chatguru::{ChatClient, Guru, KnowledgeBase};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chatguru::init_tracing();

    let cfg = Config::load_with_env()?;
    let api_key = cfg.require_api_key()?;

    let kb = Arc::new(KnowledgeBase::bundled().context("Bundled sutras are invalid")?);
    let answerer = ChatClient::new(&cfg.api_base, api_key, &cfg.answer_model);
    let classifier = answerer.with_model(&cfg.classifier_model);
    let guru = Guru::new(kb.clone(), Arc::new(classifier), Arc::new(answerer));

    let users_dir = cfg.users_dir()?;
    tokio::fs::create_dir_all(&users_dir)
        .await
        .with_context(|| format!("Failed to create {}", users_dir.display()))?;
    let store = Arc::new(FileStore::new(users_dir));

    let state = AppState {
        guru,
        profiles: store.clone(),
        history: store,
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port)).await?;
    tracing::info!(
        port = cfg.port,
        sutras = kb.len(),
        answer_model = %cfg.answer_model,
        classifier_model = %cfg.classifier_model,
        "chatguru-api listening"
    );

    axum::serve(listener, server::router(state)).await?;
    Ok(())
}
