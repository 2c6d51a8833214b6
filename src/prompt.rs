//! Guidance prompt generation
//!
//! Grounds the answer model in the user's profile and the retrieved sutras.

use crate::profile::SpiritualProfile;
use crate::sutras::Sutra;

// ═══════════════════════════════════════════════════════════════
// GUIDANCE PROMPT BUILDER
// ═══════════════════════════════════════════════════════════════

/// Builds the single prompt sent to the answer model
pub struct GuidancePrompt<'a> {
    question: &'a str,
    profile: Option<&'a SpiritualProfile>,
    sutras: Vec<&'a Sutra>,
    instructions: Vec<String>,
}

impl<'a> GuidancePrompt<'a> {
    pub fn new(question: &'a str) -> Self {
        Self {
            question,
            profile: None,
            sutras: Vec::new(),
            instructions: default_instructions(),
        }
    }

    pub fn with_profile(mut self, profile: &'a SpiritualProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_sutras(mut self, sutras: &[&'a Sutra]) -> Self {
        self.sutras = sutras.to_vec();
        self
    }

    /// Generate the full prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&self.identity_section());

        if let Some(profile) = self.profile {
            prompt.push_str(&profile.render());
            prompt.push_str("\n\n");
        }

        prompt.push_str(&self.sutra_section());
        prompt.push_str(&format!("User's Question: \"{}\"\n\n", self.question));
        prompt.push_str(&self.instruction_section());

        prompt
    }

    fn identity_section(&self) -> String {
        "You are ChatGuru, a wise spiritual guide who responds exclusively based on \
         Patanjali's Yoga Sutras. You embody ancient Vedic wisdom with compassion and \
         practical insight.\n\n"
            .to_string()
    }

    fn sutra_section(&self) -> String {
        let rendered: Vec<String> = self.sutras.iter().map(|s| render_sutra(s)).collect();
        format!("Relevant Yoga Sutras:\n{}\n\n", rendered.join("\n\n"))
    }

    fn instruction_section(&self) -> String {
        let mut section = String::from("Instructions:\n");
        for (i, instruction) in self.instructions.iter().enumerate() {
            section.push_str(&format!("{}. {}\n", i + 1, instruction));
        }
        section.push_str(
            "\nResponse format should be natural conversation, not formal teaching.",
        );
        section
    }
}

/// One sutra as it appears in the prompt
pub fn render_sutra(sutra: &Sutra) -> String {
    format!(
        "Sutra {}: \"{}\" - {}",
        sutra.reference(),
        sutra.translation,
        sutra.commentary
    )
}

fn default_instructions() -> Vec<String> {
    [
        "Respond only with wisdom from Patanjali's Yoga Sutras",
        "Tailor your response to the user's spiritual profile and current challenges",
        "Be compassionate, wise, and practical",
        "Reference specific sutras when relevant",
        "Offer actionable spiritual guidance",
        "Keep response concise but profound (200-300 words)",
        "End with a gentle encouragement or practice suggestion",
        "Use a warm, sage-like tone",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
