//! FACEIT elo → skill band classification.

use serde::{Deserialize, Serialize};

/// Label returned for ratings outside every band.
pub const UNKNOWN_LEVEL: &str = "Unknown";

/// Skill band, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillBand {
    Beginner,
    Rookie,
    Casual,
    Improving,
    SemiCompetitive,
    Competent,
    Advanced,
    HighSkilled,
    NearElite,
    Elite,
}

/// Inclusive `(lower, upper, band)` ranges, contiguous over 1..=3000.
pub const SKILL_BANDS: [(i64, i64, SkillBand); 10] = [
    (1, 800, SkillBand::Beginner),
    (801, 950, SkillBand::Rookie),
    (951, 1100, SkillBand::Casual),
    (1101, 1250, SkillBand::Improving),
    (1251, 1400, SkillBand::SemiCompetitive),
    (1401, 1550, SkillBand::Competent),
    (1551, 1700, SkillBand::Advanced),
    (1701, 1850, SkillBand::HighSkilled),
    (1851, 2000, SkillBand::NearElite),
    (2001, 3000, SkillBand::Elite),
];

impl SkillBand {
    /// Band containing `elo`, if any.
    pub fn classify(elo: i64) -> Option<Self> {
        SKILL_BANDS
            .iter()
            .find(|(lower, upper, _)| (*lower..=*upper).contains(&elo))
            .map(|(_, _, band)| *band)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillBand::Beginner => "Beginner",
            SkillBand::Rookie => "Rookie",
            SkillBand::Casual => "Casual",
            SkillBand::Improving => "Improving",
            SkillBand::SemiCompetitive => "Semi-competitive",
            SkillBand::Competent => "Competent",
            SkillBand::Advanced => "Advanced",
            SkillBand::HighSkilled => "High-skilled",
            SkillBand::NearElite => "Near elite",
            SkillBand::Elite => "Elite",
        }
    }
}

impl std::fmt::Display for SkillBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// `{"level": <label>}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EloLevel {
    pub level: String,
}

impl EloLevel {
    /// Classify an optional rating; absence maps to "Unknown".
    pub fn from_elo(elo: Option<i64>) -> Self {
        let level = elo
            .and_then(SkillBand::classify)
            .map(|band| band.label())
            .unwrap_or(UNKNOWN_LEVEL);
        Self {
            level: level.to_string(),
        }
    }
}
