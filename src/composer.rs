//! Response composition
//!
//! Two branches, chosen by the scope gate: a canned redirection in the
//! user's preferred voice, or a grounded answer from the answer model.
//! Generation failures are absorbed into a fixed in-persona apology.

use crate::citations::extract_citations;
use crate::client::TextGenerator;
use crate::profile::{Inclination, SpiritualProfile};
use crate::prompt::GuidancePrompt;
use crate::sutras::Sutra;

const ANSWER_MAX_TOKENS: u32 = 400;
const ANSWER_TEMPERATURE: f32 = 0.7;

/// Returned when the model answers with nothing
pub const EMPTY_ANSWER_FALLBACK: &str =
    "I apologize, but I cannot provide guidance at this moment. Please try again.";

/// Returned when the generation call fails
pub const GENERATION_FAILED_APOLOGY: &str = "🙏 Forgive me, dear seeker. The cosmic energies seem disrupted at this moment. Please ask your question again, and I shall do my best to share the wisdom of the ancient sages with you.";

const DEVOTIONAL_REDIRECT: &str = "🙏 Namaste, dear seeker. I am ChatGuru, devoted to guiding you on the path of ancient Vedic wisdom through Patanjali's Yoga Sutras. While I understand you may have other questions, my purpose is to help you discover the eternal truths within yourself. Perhaps we could explore how the timeless wisdom of yoga can illuminate whatever challenges you're facing? What aspect of your inner journey would you like to explore today?";

const INTELLECTUAL_REDIRECT: &str = "🕉️ Greetings, fellow seeker of truth. I am ChatGuru, dedicated to sharing the profound wisdom of Patanjali's Yoga Sutras. My role is to help you explore the depths of Vedic philosophy and its practical applications for modern life. Rather than discussing other topics, shall we delve into the ancient teachings that can provide lasting insights? What philosophical question about life, consciousness, or the nature of reality interests you?";

const PRACTICAL_REDIRECT: &str = "🌅 Hello, friend. I am ChatGuru, here to offer practical guidance rooted in the timeless wisdom of Patanjali's Yoga Sutras. My purpose is to help you apply ancient Vedic principles to navigate life's challenges with greater wisdom and peace. Instead of other topics, let's focus on how these eternal teachings can serve your daily life. What practical challenge or life situation could benefit from yogic wisdom?";

const MYSTICAL_REDIRECT: &str = "✨ Divine soul, I am ChatGuru, a humble guide on the mystical path of Patanjali's Yoga Sutras. My essence is devoted to helping you explore the deeper mysteries of consciousness and spiritual realization. While worldly matters have their place, our time together is sacred for inner exploration. What aspect of your spiritual journey or inner experience calls for the light of ancient wisdom?";

/// Canned redirection for off-topic questions
pub fn redirection(inclination: &Inclination) -> &'static str {
    match inclination {
        Inclination::Devotional => DEVOTIONAL_REDIRECT,
        Inclination::Intellectual => INTELLECTUAL_REDIRECT,
        Inclination::Mystical => MYSTICAL_REDIRECT,
        Inclination::Practical | Inclination::Unknown(_) => PRACTICAL_REDIRECT,
    }
}

/// A generated answer and the candidate sutras it cites
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<String>,
}

/// Generate a grounded answer. Never fails: errors become the apology text.
pub async fn compose_answer(
    generator: &dyn TextGenerator,
    question: &str,
    profile: &SpiritualProfile,
    candidates: &[&Sutra],
) -> Answer {
    let prompt = GuidancePrompt::new(question)
        .with_profile(profile)
        .with_sutras(candidates)
        .build();

    match generator
        .generate(&prompt, ANSWER_MAX_TOKENS, ANSWER_TEMPERATURE)
        .await
    {
        Ok(text) => {
            let text = if text.is_empty() {
                EMPTY_ANSWER_FALLBACK.to_string()
            } else {
                text
            };
            let citations = extract_citations(&text, candidates);
            Answer { text, citations }
        }
        Err(e) => {
            tracing::error!(error = %e, "answer generation failed");
            Answer {
                text: GENERATION_FAILED_APOLOGY.to_string(),
                citations: Vec::new(),
            }
        }
    }
}
