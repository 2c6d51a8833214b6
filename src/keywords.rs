//! Keyword extraction from free-text messages
//!
//! Literal, case-insensitive substring containment against a fixed
//! vocabulary. No tokenization or stemming: "karma" matches inside
//! "karmayoga".

/// Known domain-signal tokens, in declaration order
pub const VOCABULARY: &[&str] = &[
    "peace", "calm", "meditation", "stress", "anxiety", "fear", "anger",
    "love", "compassion", "wisdom", "consciousness", "mind", "thought",
    "ego", "self", "soul", "god", "divine", "suffering", "attachment",
    "detachment", "liberation", "moksha", "dharma", "karma", "purpose",
    "meaning", "truth", "reality", "illusion", "maya", "practice",
    "discipline", "concentration", "focus", "awareness", "presence",
    "breath", "breathing", "pranayama", "asana", "yoga", "spiritual",
    "enlightenment", "awakening", "realization", "surrender", "devotion",
    "service", "relationships", "family", "work", "career", "balance",
];

/// Vocabulary tokens found in `text`, in vocabulary order
pub fn extract(text: &str) -> Vec<&'static str> {
    extract_from(text, VOCABULARY)
}

/// Same as [`extract`] against a caller-supplied vocabulary
pub fn extract_from(text: &str, vocabulary: &[&'static str]) -> Vec<&'static str> {
    let haystack = text.to_lowercase();
    vocabulary
        .iter()
        .copied()
        .filter(|kw| haystack.contains(&kw.to_lowercase()))
        .collect()
}
