//! The chat pipeline
//!
//! ```text
//! message ─► keywords ─► candidates ─► scope gate ─┬─► grounded answer ─► citations
//!                                                  └─► canned redirection
//! ```
//!
//! Holds no mutable state: the knowledge base is shared read-only and each
//! request runs start to finish on its own.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::client::TextGenerator;
use crate::composer;
use crate::gate;
use crate::profile::SpiritualProfile;
use crate::retrieval;
use crate::store::ChatTurn;
use crate::sutras::{KnowledgeBase, Sutra};

/// How many candidate sutras are returned for display
pub const DISPLAY_SUTRAS: usize = 3;

/// Which branch produced the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Guidance,
    Redirection,
}

/// What the caller receives for one message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub sutra_references: Vec<String>,
    pub relevant_sutras: Vec<Sutra>,
    #[serde(skip)]
    pub kind: ReplyKind,
}

impl ChatReply {
    /// History record for this exchange
    pub fn to_turn(&self, question: &str) -> ChatTurn {
        ChatTurn {
            question: question.to_string(),
            response: self.response.clone(),
            sutra_references: self.sutra_references.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Retrieval, gating and composition over a shared knowledge base
#[derive(Clone)]
pub struct Guru {
    kb: Arc<KnowledgeBase>,
    classifier: Arc<dyn TextGenerator>,
    answerer: Arc<dyn TextGenerator>,
}

impl Guru {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        classifier: Arc<dyn TextGenerator>,
        answerer: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            kb,
            classifier,
            answerer,
        }
    }

    /// One generator for both the gate and the answer
    pub fn with_generator(kb: Arc<KnowledgeBase>, generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(kb, generator.clone(), generator)
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Answer one message. Never fails; external errors degrade to fallback text.
    pub async fn respond(&self, message: &str, profile: &SpiritualProfile) -> ChatReply {
        let retrieval = retrieval::retrieve(message, &self.kb);
        tracing::info!(
            keywords = ?retrieval.keywords,
            candidates = retrieval.candidates.len(),
            "retrieved sutras"
        );

        let relevant_sutras: Vec<Sutra> = retrieval
            .candidates
            .iter()
            .take(DISPLAY_SUTRAS)
            .map(|s| (*s).clone())
            .collect();

        if !gate::classify(self.classifier.as_ref(), message).await {
            tracing::info!(inclination = %profile.philosophical_incline, "off-topic, redirecting");
            return ChatReply {
                response: composer::redirection(&profile.philosophical_incline).to_string(),
                sutra_references: Vec::new(),
                relevant_sutras,
                kind: ReplyKind::Redirection,
            };
        }

        let answer = composer::compose_answer(
            self.answerer.as_ref(),
            message,
            profile,
            &retrieval.candidates,
        )
        .await;
        tracing::info!(citations = ?answer.citations, "guidance composed");

        ChatReply {
            response: answer.text,
            sutra_references: answer.citations,
            relevant_sutras,
            kind: ReplyKind::Guidance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::GENERATION_FAILED_APOLOGY;
    use crate::error::GenerationError;
    use crate::profile::Inclination;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted generator: answers by call index, `None` simulates an outage
    struct Script {
        replies: Vec<Option<&'static str>>,
        calls: AtomicUsize,
    }

    impl Script {
        fn new(replies: Vec<Option<&'static str>>) -> Arc<Self> {
            Arc::new(Self {
                replies,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for Script {
        async fn generate(&self, _: &str, _: u32, _: f32) -> Result<String, GenerationError> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.replies.get(i).copied().flatten() {
                Some(r) => Ok(r.to_string()),
                None => Err(GenerationError::Transport("timeout".into())),
            }
        }
    }

    fn kb() -> Arc<KnowledgeBase> {
        Arc::new(KnowledgeBase::bundled().unwrap())
    }

    #[tokio::test]
    async fn test_in_scope_generates_and_cites() {
        let classifier = Script::new(vec![Some("true")]);
        let answerer = Script::new(vec![Some("Sutra 1.4 reminds us the ego is not the seer.")]);
        let guru = Guru::new(kb(), classifier.clone(), answerer.clone());

        let reply = guru
            .respond("My ego keeps getting in the way", &SpiritualProfile::default())
            .await;

        assert_eq!(reply.kind, ReplyKind::Guidance);
        assert_eq!(reply.sutra_references, vec!["1.4"]);
        assert_eq!(answerer.calls(), 1);
    }

    #[tokio::test]
    async fn test_out_of_scope_never_generates() {
        let classifier = Script::new(vec![Some("false")]);
        let answerer = Script::new(vec![Some("should not be used")]);
        let guru = Guru::new(kb(), classifier.clone(), answerer.clone());
        let profile = SpiritualProfile {
            philosophical_incline: Inclination::Devotional,
            ..Default::default()
        };

        let reply = guru.respond("Who won the match yesterday?", &profile).await;

        assert_eq!(reply.kind, ReplyKind::Redirection);
        assert!(reply.response.starts_with("🙏 Namaste"));
        assert!(reply.sutra_references.is_empty());
        assert_eq!(answerer.calls(), 0);
    }

    #[tokio::test]
    async fn test_classifier_outage_fails_open() {
        let classifier = Script::new(vec![None]);
        let answerer = Script::new(vec![Some("Breathe gently.")]);
        let guru = Guru::new(kb(), classifier, answerer.clone());

        let reply = guru.respond("anything", &SpiritualProfile::default()).await;

        assert_eq!(reply.kind, ReplyKind::Guidance);
        assert_eq!(reply.response, "Breathe gently.");
        assert_eq!(answerer.calls(), 1);
    }

    #[tokio::test]
    async fn test_generation_outage_returns_apology() {
        let generator = Script::new(vec![Some("true"), None]);
        let guru = Guru::with_generator(kb(), generator);

        let reply = guru.respond("how to meditate", &SpiritualProfile::default()).await;

        assert_eq!(reply.response, GENERATION_FAILED_APOLOGY);
        assert!(reply.sutra_references.is_empty());
    }

    #[tokio::test]
    async fn test_relevant_sutras_capped_at_three() {
        // "consciousness" and "self" pull in 1.2, 1.3, 1.4 (false self), 4.34
        let generator = Script::new(vec![Some("true"), Some("ok")]);
        let guru = Guru::with_generator(kb(), generator);

        let reply = guru
            .respond("consciousness and the self", &SpiritualProfile::default())
            .await;

        let refs: Vec<_> = reply.relevant_sutras.iter().map(|s| s.reference()).collect();
        assert_eq!(refs, vec!["1.2", "1.3", "1.4"]);
    }

    #[test]
    fn test_reply_json_shape() {
        let reply = ChatReply {
            response: "r".into(),
            sutra_references: vec!["1.2".into()],
            relevant_sutras: vec![],
            kind: ReplyKind::Guidance,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["sutraReferences"][0], "1.2");
        assert!(json["relevantSutras"].is_array());
        assert!(json.get("kind").is_none());
    }
}
