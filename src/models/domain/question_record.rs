use std::fmt;

use async_graphql::Enum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bloom's taxonomy level attached to each question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, JsonSchema)]
pub enum BloomLevel {
    #[serde(alias = "remember")]
    Remember,
    #[serde(alias = "understand")]
    Understand,
    #[serde(alias = "apply")]
    Apply,
    #[serde(alias = "analyze", alias = "Analyse", alias = "analyse")]
    Analyze,
    #[serde(alias = "evaluate")]
    Evaluate,
    #[serde(alias = "create")]
    Create,
}

impl BloomLevel {
    pub const ALL: [BloomLevel; 6] = [
        BloomLevel::Remember,
        BloomLevel::Understand,
        BloomLevel::Apply,
        BloomLevel::Analyze,
        BloomLevel::Evaluate,
        BloomLevel::Create,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloomLevel::Remember => "Remember",
            BloomLevel::Understand => "Understand",
            BloomLevel::Apply => "Apply",
            BloomLevel::Analyze => "Analyze",
            BloomLevel::Evaluate => "Evaluate",
            BloomLevel::Create => "Create",
        }
    }

    /// Picks the first Bloom level named anywhere in a free-text model reply.
    pub fn find_in(reply: &str) -> Option<Self> {
        reply
            .split(|c: char| !c.is_alphabetic())
            .filter(|word| !word.is_empty())
            .find_map(|word| {
                let word = word.to_ascii_lowercase();
                match word.as_str() {
                    "remember" | "remembering" => Some(BloomLevel::Remember),
                    "understand" | "understanding" => Some(BloomLevel::Understand),
                    "apply" | "applying" => Some(BloomLevel::Apply),
                    "analyze" | "analyse" | "analyzing" | "analysing" => {
                        Some(BloomLevel::Analyze)
                    }
                    "evaluate" | "evaluating" => Some(BloomLevel::Evaluate),
                    "create" | "creating" => Some(BloomLevel::Create),
                    _ => None,
                }
            })
    }
}

impl fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, JsonSchema)]
pub enum Difficulty {
    #[serde(alias = "easy")]
    Easy,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
    #[serde(alias = "mixed")]
    Mixed,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marks per question; only the values in [`Marks::ALLOWED`] exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Marks(u8);

impl Marks {
    pub const ALLOWED: [u8; 3] = [2, 8, 11];

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Marks {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Marks(value))
        } else {
            Err(format!(
                "marks must be one of {:?}, got {}",
                Self::ALLOWED,
                value
            ))
        }
    }
}

impl TryFrom<i32> for Marks {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| format!("marks must be one of {:?}, got {}", Self::ALLOWED, value))
            .and_then(Marks::try_from)
    }
}

impl From<Marks> for u8 {
    fn from(marks: Marks) -> Self {
        marks.0
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
pub enum DuplicateFlag {
    #[serde(rename = "possible duplicate")]
    PossibleDuplicate,
    #[serde(rename = "unique")]
    Unique,
}

impl DuplicateFlag {
    /// A score strictly above the threshold is a possible duplicate.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            DuplicateFlag::PossibleDuplicate
        } else {
            DuplicateFlag::Unique
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateFlag::PossibleDuplicate => "possible duplicate",
            DuplicateFlag::Unique => "unique",
        }
    }
}

impl fmt::Display for DuplicateFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Accepted, // kept as drafted
    Improved, // rewritten after audit
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Accepted => "accepted",
            QuestionStatus::Improved => "improved",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored question. Field names are the persisted layout.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub text: String,
    pub bloom_level: BloomLevel,
    pub difficulty: Difficulty,
    pub marks: Marks,
    pub duplicate_risk: f64,
    pub flag: DuplicateFlag,
    pub audit_feedback: String,
    pub status: QuestionStatus,
}

impl QuestionRecord {
    pub fn new(
        text: impl Into<String>,
        bloom_level: BloomLevel,
        difficulty: Difficulty,
        marks: Marks,
        duplicate_risk: f64,
        threshold: f64,
    ) -> Self {
        Self {
            text: text.into().trim().to_string(),
            bloom_level,
            difficulty,
            marks,
            duplicate_risk,
            flag: DuplicateFlag::from_score(duplicate_risk, threshold),
            audit_feedback: String::new(),
            status: QuestionStatus::Accepted,
        }
    }

    pub fn with_audit(mut self, audit_feedback: impl Into<String>, status: QuestionStatus) -> Self {
        self.audit_feedback = audit_feedback.into();
        self.status = status;
        self
    }

    /// Recomputes `flag` from `duplicate_risk` so stored data cannot drift from the rule.
    pub fn rederive_flag(&mut self, threshold: f64) {
        self.flag = DuplicateFlag::from_score(self.duplicate_risk, threshold);
    }

    pub fn is_possible_duplicate(&self) -> bool {
        self.flag == DuplicateFlag::PossibleDuplicate
    }

    /// Rejects records no pipeline run could have produced: blank text or a
    /// duplicate risk outside `[0, 1]`.
    pub fn check(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("question text is blank".to_string());
        }
        if !(0.0..=1.0).contains(&self.duplicate_risk) {
            return Err(format!(
                "duplicate risk {} is outside [0, 1]",
                self.duplicate_risk
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(value: u8) -> Marks {
        Marks::try_from(value).expect("allowed marks")
    }

    #[test]
    fn flag_is_strictly_above_threshold() {
        assert_eq!(DuplicateFlag::from_score(0.80, 0.80), DuplicateFlag::Unique);
        assert_eq!(
            DuplicateFlag::from_score(0.8000001, 0.80),
            DuplicateFlag::PossibleDuplicate
        );
        assert_eq!(DuplicateFlag::from_score(0.0, 0.80), DuplicateFlag::Unique);
    }

    #[test]
    fn marks_only_accepts_allowed_values() {
        for allowed in Marks::ALLOWED {
            assert!(Marks::try_from(allowed).is_ok());
        }
        assert!(Marks::try_from(3u8).is_err());
        assert!(Marks::try_from(-2i32).is_err());
        assert!(Marks::try_from(300i32).is_err());
    }

    #[test]
    fn record_serializes_with_persisted_field_names() {
        let record = QuestionRecord::new(
            "  What is photosynthesis?  ",
            BloomLevel::Remember,
            Difficulty::Easy,
            marks(2),
            0.0,
            0.80,
        )
        .with_audit("Relevance: High", QuestionStatus::Accepted);

        let value = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(value["text"], "What is photosynthesis?");
        assert_eq!(value["bloomLevel"], "Remember");
        assert_eq!(value["difficulty"], "Easy");
        assert_eq!(value["marks"], 2);
        assert_eq!(value["duplicateRisk"], 0.0);
        assert_eq!(value["flag"], "unique");
        assert_eq!(value["auditFeedback"], "Relevance: High");
        assert_eq!(value["status"], "accepted");
    }

    #[test]
    fn record_with_disallowed_marks_fails_to_deserialize() {
        let json = r#"{"text":"q","bloomLevel":"Apply","difficulty":"Hard","marks":5,
            "duplicateRisk":0.1,"flag":"unique","auditFeedback":"","status":"accepted"}"#;
        assert!(serde_json::from_str::<QuestionRecord>(json).is_err());
    }

    #[test]
    fn rederive_flag_repairs_drifted_value() {
        let mut record = QuestionRecord::new(
            "q",
            BloomLevel::Apply,
            Difficulty::Hard,
            marks(8),
            0.95,
            0.80,
        );
        record.flag = DuplicateFlag::Unique;
        record.rederive_flag(0.80);
        assert!(record.is_possible_duplicate());
    }

    #[test]
    fn check_rejects_blank_text_and_out_of_range_risk() {
        let valid = QuestionRecord::new("q", BloomLevel::Apply, Difficulty::Hard, marks(8), 1.0, 0.80);
        assert!(valid.check().is_ok());

        let mut blank = valid.clone();
        blank.text = "   ".to_string();
        assert!(blank.check().is_err());

        let mut too_high = valid.clone();
        too_high.duplicate_risk = 7.5;
        assert!(too_high.check().is_err());

        let mut negative = valid;
        negative.duplicate_risk = -0.1;
        assert!(negative.check().is_err());
    }

    #[test]
    fn bloom_level_found_in_chatty_reply() {
        assert_eq!(BloomLevel::find_in("Apply"), Some(BloomLevel::Apply));
        assert_eq!(
            BloomLevel::find_in("The Bloom level is: **Analyzing**."),
            Some(BloomLevel::Analyze)
        );
        assert_eq!(BloomLevel::find_in("no idea"), None);
    }
}
