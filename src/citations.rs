//! Citation extraction from generated answers

use crate::sutras::Sutra;

/// Candidate sutras referenced in `answer` as "c.v" or "c-v", candidate order
pub fn extract_citations(answer: &str, candidates: &[&Sutra]) -> Vec<String> {
    candidates
        .iter()
        .filter(|s| answer.contains(&s.reference()) || answer.contains(&s.hyphenated_reference()))
        .map(|s| s.reference())
        .collect()
}
