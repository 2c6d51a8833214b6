//! User spiritual profile
//!
//! Owned by the onboarding flow; the pipeline only reads it. Enumerated
//! fields deserialize from lowercase tags. An unrecognized philosophical
//! inclination is kept verbatim in [`Inclination::Unknown`] so the
//! redirection fallback stays an explicit match arm.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeditationPractice {
    #[default]
    None,
    Occasional,
    Regular,
    Daily,
}

/// Which voice the guide uses when redirecting off-topic questions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Inclination {
    Devotional,
    Intellectual,
    #[default]
    Practical,
    Mystical,
    /// Any tag outside the four known ones, as the user gave it
    Unknown(String),
}

impl Inclination {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "devotional" => Inclination::Devotional,
            "intellectual" => Inclination::Intellectual,
            "practical" => Inclination::Practical,
            "mystical" => Inclination::Mystical,
            _ => Inclination::Unknown(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Inclination::Devotional => "devotional",
            Inclination::Intellectual => "intellectual",
            Inclination::Practical => "practical",
            Inclination::Mystical => "mystical",
            Inclination::Unknown(tag) => tag,
        }
    }
}

impl From<String> for Inclination {
    fn from(tag: String) -> Self {
        Inclination::from_tag(&tag)
    }
}

impl From<Inclination> for String {
    fn from(inclination: Inclination) -> Self {
        match inclination {
            Inclination::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeStage {
    Student,
    #[default]
    Householder,
    Seeker,
    Renunciant,
}

impl Experience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Experience::Beginner => "beginner",
            Experience::Intermediate => "intermediate",
            Experience::Advanced => "advanced",
        }
    }
}

impl MeditationPractice {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeditationPractice::None => "none",
            MeditationPractice::Occasional => "occasional",
            MeditationPractice::Regular => "regular",
            MeditationPractice::Daily => "daily",
        }
    }
}

impl LifeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifeStage::Student => "student",
            LifeStage::Householder => "householder",
            LifeStage::Seeker => "seeker",
            LifeStage::Renunciant => "renunciant",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MeditationPractice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Inclination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Questionnaire answers describing the user's practice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiritualProfile {
    #[serde(default)]
    pub experience: Experience,
    #[serde(default)]
    pub meditation_practice: MeditationPractice,
    #[serde(default)]
    pub philosophical_incline: Inclination,
    #[serde(default)]
    pub life_stage: LifeStage,
    #[serde(default)]
    pub current_challenges: Vec<String>,
    #[serde(default)]
    pub spiritual_goals: Vec<String>,
    #[serde(default)]
    pub primary_concerns: Vec<String>,
}

impl SpiritualProfile {
    /// Render the profile block embedded in the guidance prompt
    pub fn render(&self) -> String {
        format!(
            "User Profile:\n\
             - Experience Level: {}\n\
             - Meditation Practice: {}\n\
             - Philosophical Inclination: {}\n\
             - Life Stage: {}\n\
             - Current Challenges: {}\n\
             - Spiritual Goals: {}",
            self.experience,
            self.meditation_practice,
            self.philosophical_incline,
            self.life_stage,
            self.current_challenges.join(", "),
            self.spiritual_goals.join(", "),
        )
    }
}

/// Stored profile record for one user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub email: String,
    #[serde(default)]
    pub spiritual_profile: SpiritualProfile,
    #[serde(default)]
    pub profile_completed: bool,
}
