//! Scope gate: is a message within the guide's domain?
//!
//! One constrained true/false completion. Only an exact "true" (after trim
//! and lowercase) passes; anything else is an ordinary rejection. If the
//! call itself fails the gate opens, so an outage never blocks the user.

use crate::client::TextGenerator;

const CLASSIFIER_MAX_TOKENS: u32 = 10;
const CLASSIFIER_TEMPERATURE: f32 = 0.1;

/// Build the classification prompt for a message
pub fn classifier_prompt(message: &str) -> String {
    format!(
        "Determine if the following question is related to spirituality, philosophy, \
         personal growth, mental wellbeing, yoga, meditation, life guidance, or ancient \
         wisdom. Reply with only \"true\" or \"false\".\n\nQuestion: \"{}\"",
        message
    )
}

/// Interpret the model's verdict
pub fn parse_verdict(output: &str) -> bool {
    output.trim().to_lowercase() == "true"
}

/// Decide whether `message` is in scope. Fails open on generation errors.
pub async fn classify(generator: &dyn TextGenerator, message: &str) -> bool {
    let prompt = classifier_prompt(message);
    match generator
        .generate(&prompt, CLASSIFIER_MAX_TOKENS, CLASSIFIER_TEMPERATURE)
        .await
    {
        Ok(output) => {
            let verdict = parse_verdict(&output);
            tracing::debug!(verdict, raw = %output.trim(), "scope classification");
            verdict
        }
        Err(e) => {
            tracing::warn!(error = %e, "scope classification failed, treating as in scope");
            true
        }
    }
}
