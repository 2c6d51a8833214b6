//! Knowledge base of Patanjali's Yoga Sutras
//!
//! A small, fixed selection of sutras with commentary and keyword tags.
//! Built once at startup into an immutable [`KnowledgeBase`] and shared by
//! reference between requests.

use serde::Serialize;
use std::collections::HashSet;

use crate::error::KnowledgeError;

/// A single aphorism with its translation, commentary and tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sutra {
    pub chapter: u32,
    #[serde(rename = "sutraNumber")]
    pub verse: u32,
    pub sanskrit: &'static str,
    pub transliteration: &'static str,
    pub translation: &'static str,
    pub commentary: &'static str,
    pub keywords: &'static [&'static str],
    pub practical_application: &'static str,
}

impl Sutra {
    /// Canonical identifier, e.g. "2.47"
    pub fn reference(&self) -> String {
        format!("{}.{}", self.chapter, self.verse)
    }

    /// Alternate identifier form accepted in generated text, e.g. "2-47"
    pub fn hyphenated_reference(&self) -> String {
        format!("{}-{}", self.chapter, self.verse)
    }
}

/// Parse "1.2" or "1-2" into (chapter, verse)
pub fn parse_reference(s: &str) -> Option<(u32, u32)> {
    let (chapter, verse) = s.trim().split_once(['.', '-'])?;
    let chapter = chapter.parse().ok()?;
    let verse = verse.parse().ok()?;
    Some((chapter, verse))
}

// ═══════════════════════════════════════════════════════════════
// KNOWLEDGE BASE
// ═══════════════════════════════════════════════════════════════

/// Immutable, ordered collection of sutras
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    sutras: Vec<Sutra>,
}

impl KnowledgeBase {
    /// Build a knowledge base, rejecting duplicate ids, zero ids and untagged entries
    pub fn new(sutras: Vec<Sutra>) -> Result<Self, KnowledgeError> {
        let mut seen = HashSet::new();
        for s in &sutras {
            if s.chapter == 0 || s.verse == 0 {
                return Err(KnowledgeError::InvalidId { chapter: s.chapter, verse: s.verse });
            }
            if s.keywords.is_empty() {
                return Err(KnowledgeError::NoKeywords { chapter: s.chapter, verse: s.verse });
            }
            if !seen.insert((s.chapter, s.verse)) {
                return Err(KnowledgeError::Duplicate { chapter: s.chapter, verse: s.verse });
            }
        }
        Ok(Self { sutras })
    }

    /// The bundled selection of sutras
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::new(BUNDLED_SUTRAS.to_vec())
    }

    pub fn entries(&self) -> &[Sutra] {
        &self.sutras
    }

    pub fn len(&self) -> usize {
        self.sutras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sutras.is_empty()
    }

    /// Look up a sutra by chapter and verse
    pub fn find(&self, chapter: u32, verse: u32) -> Option<&Sutra> {
        self.sutras
            .iter()
            .find(|s| s.chapter == chapter && s.verse == verse)
    }

    /// Deterministic "sutra of the day": cycles through the collection by day index
    pub fn daily(&self, day: u64) -> Option<&Sutra> {
        if self.sutras.is_empty() {
            return None;
        }
        let idx = (day % self.sutras.len() as u64) as usize;
        self.sutras.get(idx)
    }
}

// ═══════════════════════════════════════════════════════════════
// BUNDLED DATA
// ═══════════════════════════════════════════════════════════════

const BUNDLED_SUTRAS: &[Sutra] = &[
    // Samadhi Pada
    Sutra {
        chapter: 1,
        verse: 1,
        sanskrit: "अथ योगानुशासनम्",
        transliteration: "atha yogānuśāsanam",
        translation: "Now begins the instruction of yoga.",
        commentary: "This opening sutra establishes the sacred nature of yoga as a complete discipline for spiritual transformation. The word 'atha' (now) implies readiness and auspiciousness for undertaking this profound journey.",
        keywords: &["beginning", "instruction", "discipline", "sacred timing"],
        practical_application: "Recognize that yoga requires dedicated commitment and the right mental attitude to begin this transformative practice.",
    },
    Sutra {
        chapter: 1,
        verse: 2,
        sanskrit: "योगश्चित्तवृत्तिनिरोधः",
        transliteration: "yogaś citta-vṛtti-nirodhaḥ",
        translation: "Yoga is the cessation of fluctuations of the mind.",
        commentary: "This is the fundamental definition of yoga. Citta (mind-stuff) includes all mental activities - thoughts, emotions, memories. Vritti (fluctuations) are the constant modifications of consciousness. Nirodha means cessation or restraint.",
        keywords: &["mind control", "mental fluctuations", "consciousness", "cessation"],
        practical_application: "Practice observing your thoughts without judgment. Begin with short meditation sessions to witness the mind's constant activity.",
    },
    Sutra {
        chapter: 1,
        verse: 3,
        sanskrit: "तदा द्रष्टुः स्वरूपेऽवस्थानम्",
        transliteration: "tadā draṣṭuḥ svarūpe'vasthānam",
        translation: "Then the seer abides in their own true nature.",
        commentary: "When the mind becomes still, the true Self is revealed. The seer (drashta) is the pure consciousness that observes all mental activities. In stillness, we rest in our essential nature.",
        keywords: &["true nature", "seer", "pure consciousness", "self-realization"],
        practical_application: "In moments of mental stillness during meditation, rest in the awareness that is simply witnessing - this is your true nature.",
    },
    Sutra {
        chapter: 1,
        verse: 4,
        sanskrit: "वृत्तिसारूप्यमितरत्र",
        transliteration: "vṛtti-sārūpyam itaratra",
        translation: "At other times, one identifies with the fluctuations of the mind.",
        commentary: "When not established in yoga, consciousness becomes colored by mental modifications. We mistake ourselves for our thoughts, emotions, and experiences rather than recognizing our true nature.",
        keywords: &["identification", "mental modifications", "false self", "ego"],
        practical_application: "Notice when you say 'I am angry' versus 'anger is present.' Practice dis-identifying from temporary mental states.",
    },
    Sutra {
        chapter: 1,
        verse: 14,
        sanskrit: "स तु दीर्घकालनैरन्तर्यसत्कारासेवितो दृढभूमिः",
        transliteration: "sa tu dīrgha-kāla-nairantarya-satkārāsevito dṛḍha-bhūmiḥ",
        translation: "Practice is firmly grounded when it is cultivated continuously for a long period with dedication.",
        commentary: "Consistent, devoted practice over extended time creates the foundation for spiritual growth. Three elements are essential: long duration, uninterrupted continuity, and sincere devotion.",
        keywords: &["consistent practice", "dedication", "long-term commitment", "devotion"],
        practical_application: "Commit to daily spiritual practice, even if brief. Consistency matters more than duration in establishing a firm foundation.",
    },
    // Sadhana Pada
    Sutra {
        chapter: 2,
        verse: 29,
        sanskrit: "यमनियमासनप्राणायामप्रत्याहारधारणाध्यानसमाधयोऽष्टावङ्गानि",
        transliteration: "yama-niyamāsana-prāṇāyāma-pratyāhāra-dhāraṇā-dhyāna-samādhayo'ṣṭāvaṅgāni",
        translation: "The eight limbs of yoga are: ethical restraints, observances, postures, breath control, withdrawal of senses, concentration, meditation, and absorption.",
        commentary: "This sutra outlines the complete eight-fold path of yoga, providing a systematic approach to spiritual development from ethical foundation to ultimate realization.",
        keywords: &["eight limbs", "systematic practice", "spiritual path", "complete yoga"],
        practical_application: "Approach yoga holistically, beginning with ethical principles and gradually incorporating all eight limbs into your practice.",
    },
    Sutra {
        chapter: 2,
        verse: 30,
        sanskrit: "अहिंसासत्यास्तेयब्रह्मचर्यापरिग्रहा यमाः",
        transliteration: "ahiṃsā-satya-asteya-brahmacaryāparigrāhā yamāḥ",
        translation: "The ethical restraints are: non-violence, truthfulness, non-stealing, celibacy/energy conservation, and non-possessiveness.",
        commentary: "The five yamas form the ethical foundation of yoga practice. They purify our interactions with others and create harmony in relationships.",
        keywords: &["ethics", "non-violence", "truthfulness", "restraints", "moral foundation"],
        practical_application: "Begin with ahimsa - practice non-violence in thought, word, and deed. Extend compassion to all beings including yourself.",
    },
    Sutra {
        chapter: 2,
        verse: 46,
        sanskrit: "स्थिरसुखमासनम्",
        transliteration: "sthira-sukham āsanam",
        translation: "Posture should be steady and comfortable.",
        commentary: "The ideal physical posture balances effort with ease, stability with comfort. This principle applies to all yoga practices - finding the middle way between strain and laxity.",
        keywords: &["balance", "steady posture", "comfort", "middle way"],
        practical_application: "In your physical practice, find the balance between effort and ease. Apply this principle to all areas of life.",
    },
    Sutra {
        chapter: 2,
        verse: 47,
        sanskrit: "प्रयत्नशैथिल्यानन्तसमापत्तिभ्याम्",
        transliteration: "prayatna-śaithilya-ananta-samāpattibhyām",
        translation: "By relaxing effort and focusing on the infinite, the posture is mastered.",
        commentary: "Perfection in posture comes not through force but through relaxation of unnecessary effort and meditation on the infinite. This teaches us about effortless action.",
        keywords: &["effortless action", "relaxation", "infinite", "mastery"],
        practical_application: "In any practice or activity, release unnecessary tension while maintaining awareness. Contemplate the vastness of existence.",
    },
    // Vibhuti Pada
    Sutra {
        chapter: 3,
        verse: 3,
        sanskrit: "तदेवार्थमात्रनिर्भासं स्वरूपशून्यमिव समाधिः",
        transliteration: "tad evārtha-mātra-nirbhāsaṃ svarūpa-śūnyam iva samādhiḥ",
        translation: "When only the object shines forth, as if devoid of one's own form, that is absorption (samadhi).",
        commentary: "In the highest states of meditation, the sense of separation between meditator and object dissolves. Only pure awareness of the object remains.",
        keywords: &["absorption", "unity", "dissolution of ego", "pure awareness"],
        practical_application: "In deep concentration, allow yourself to merge completely with the object of meditation, losing self-consciousness.",
    },
    // Kaivalya Pada
    Sutra {
        chapter: 4,
        verse: 34,
        sanskrit: "पुरुषार्थशून्यानां गुणानां प्रतिप्रसवः कैवल्यं स्वरूपप्रतिष्ठा वा चितिशक्तेरिति",
        transliteration: "puruṣārtha-śūnyānāṃ guṇānāṃ pratiprasavaḥ kaivalyaṃ svarūpa-pratiṣṭhā vā citi-śakter iti",
        translation: "Liberation is the return of the qualities of nature to their source when they no longer serve the purpose of the Self, or it is the power of consciousness established in its own nature.",
        commentary: "The final goal of yoga - complete liberation (kaivalya) - is achieved when all mental modifications cease to serve the ego, and pure consciousness recognizes its eternal nature.",
        keywords: &["liberation", "kaivalya", "pure consciousness", "final goal"],
        practical_application: "Recognize that all experiences are temporary modifications of consciousness. Rest in the unchanging awareness that witnesses all change.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_is_valid() {
        let kb = KnowledgeBase::bundled().unwrap();
        assert_eq!(kb.len(), 11);
        assert_eq!(kb.entries()[0].reference(), "1.1");
        assert!(kb.entries().iter().all(|s| !s.keywords.is_empty()));
    }

    #[test]
    fn test_find() {
        let kb = KnowledgeBase::bundled().unwrap();
        let s = kb.find(2, 47).unwrap();
        assert!(s.translation.contains("relaxing effort"));
        assert!(kb.find(9, 9).is_none());
    }

    #[test]
    fn test_rejects_duplicates() {
        let first = BUNDLED_SUTRAS[0].clone();
        let err = KnowledgeBase::new(vec![first.clone(), first]).unwrap_err();
        assert_eq!(err, KnowledgeError::Duplicate { chapter: 1, verse: 1 });
    }

    #[test]
    fn test_rejects_untagged() {
        let mut s = BUNDLED_SUTRAS[1].clone();
        s.keywords = &[];
        let err = KnowledgeBase::new(vec![s]).unwrap_err();
        assert_eq!(err, KnowledgeError::NoKeywords { chapter: 1, verse: 2 });
    }

    #[test]
    fn test_rejects_zero_id() {
        let mut s = BUNDLED_SUTRAS[1].clone();
        s.chapter = 0;
        assert!(matches!(
            KnowledgeBase::new(vec![s]),
            Err(KnowledgeError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_daily_cycles() {
        let kb = KnowledgeBase::bundled().unwrap();
        let n = kb.len() as u64;
        assert_eq!(kb.daily(0), kb.daily(n));
        assert_eq!(kb.daily(3).unwrap().reference(), "1.4");
        assert!(KnowledgeBase::new(vec![]).unwrap().daily(5).is_none());
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("2.47"), Some((2, 47)));
        assert_eq!(parse_reference(" 1-2 "), Some((1, 2)));
        assert_eq!(parse_reference("x.2"), None);
        assert_eq!(parse_reference("12"), None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let kb = KnowledgeBase::bundled().unwrap();
        let json = serde_json::to_value(kb.find(1, 2).unwrap()).unwrap();
        assert_eq!(json["sutraNumber"], 2);
        assert!(json["practicalApplication"].is_string());
    }
}
