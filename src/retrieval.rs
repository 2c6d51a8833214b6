//! Relevance selection over the knowledge base
//!
//! A sutra is relevant when any of its tags and any matched keyword contain
//! one another (case-insensitive, either direction). No scoring, no cap:
//! display truncation belongs to the caller.

use crate::keywords;
use crate::sutras::{KnowledgeBase, Sutra};

/// Per-request retrieval outcome
#[derive(Debug, Clone, Default)]
pub struct Retrieval<'kb> {
    /// Vocabulary tokens found in the message, vocabulary order
    pub keywords: Vec<&'static str>,
    /// Relevant sutras, knowledge base order
    pub candidates: Vec<&'kb Sutra>,
}

/// Extract keywords from `message` and select matching sutras
pub fn retrieve<'kb>(message: &str, kb: &'kb KnowledgeBase) -> Retrieval<'kb> {
    let keywords = keywords::extract(message);
    let candidates = select(&keywords, kb.entries());
    Retrieval { keywords, candidates }
}

/// Sutras with at least one tag related to at least one keyword
pub fn select<'kb, S: AsRef<str>>(keywords: &[S], sutras: &'kb [Sutra]) -> Vec<&'kb Sutra> {
    let search: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();
    if search.is_empty() {
        return Vec::new();
    }

    sutras
        .iter()
        .filter(|sutra| {
            sutra.keywords.iter().any(|tag| {
                let tag = tag.to_lowercase();
                search.iter().any(|kw| tags_related(&tag, kw))
            })
        })
        .collect()
}

/// Bidirectional containment on already-lowercased strings
fn tags_related(tag: &str, keyword: &str) -> bool {
    tag.contains(keyword) || keyword.contains(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sutra(chapter: u32, verse: u32, keywords: &'static [&'static str]) -> Sutra {
        Sutra {
            chapter,
            verse,
            sanskrit: "",
            transliteration: "",
            translation: "t",
            commentary: "c",
            keywords,
            practical_application: "",
        }
    }

    #[test]
    fn test_keyword_contains_tag() {
        let kb = [sutra(1, 1, &["mind"])];
        let got = select(&["mind-control"], &kb);
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn test_neither_contains_other() {
        let kb = [sutra(1, 2, &["mental fluctuations"])];
        assert!(select(&["mind"], &kb).is_empty());
    }

    #[test]
    fn test_tag_contains_keyword() {
        let kb = [sutra(1, 2, &["mind control"])];
        assert_eq!(select(&["MIND"], &kb).len(), 1);
    }

    #[test]
    fn test_empty_keywords_selects_nothing() {
        let kb = KnowledgeBase::bundled().unwrap();
        let none: [&str; 0] = [];
        assert!(select(&none, kb.entries()).is_empty());
    }

    #[test]
    fn test_preserves_kb_order() {
        let kb = [
            sutra(2, 1, &["balance"]),
            sutra(1, 1, &["ego"]),
            sutra(3, 1, &["comfort"]),
        ];
        let got = select(&["ego", "balance"], &kb);
        let refs: Vec<_> = got.iter().map(|s| s.reference()).collect();
        assert_eq!(refs, vec!["2.1", "1.1"]);
    }

    #[test]
    fn test_retrieve_bundled() {
        let kb = KnowledgeBase::bundled().unwrap();
        let r = retrieve("I struggle with my ego and finding balance", &kb);
        assert_eq!(r.keywords, vec!["ego", "balance"]);
        let refs: Vec<_> = r.candidates.iter().map(|s| s.reference()).collect();
        // 1.4 tags "ego", 2.46 tags "balance", 3.3 tags "dissolution of ego"
        assert_eq!(refs, vec!["1.4", "2.46", "3.3"]);
    }

    #[test]
    fn test_retrieve_off_topic() {
        let kb = KnowledgeBase::bundled().unwrap();
        let r = retrieve("best pizza in town", &kb);
        assert!(r.keywords.is_empty());
        assert!(r.candidates.is_empty());
    }
}
