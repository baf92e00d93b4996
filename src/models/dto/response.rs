use async_graphql::SimpleObject;
use serde::Serialize;

use crate::models::domain::{
    BloomLevel, Difficulty, DuplicateFlag, QuestionRecord, QuestionStatus, RatingRecord,
};

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub text: String,
    pub bloom_level: BloomLevel,
    pub difficulty: Difficulty,
    pub marks: i32,
    pub duplicate_risk: f64,
    pub flag: DuplicateFlag,
    pub audit_feedback: String,
    pub status: QuestionStatus,
}

impl From<QuestionRecord> for QuestionDto {
    fn from(record: QuestionRecord) -> Self {
        QuestionDto {
            text: record.text,
            bloom_level: record.bloom_level,
            difficulty: record.difficulty,
            marks: i32::from(record.marks.value()),
            duplicate_risk: record.duplicate_risk,
            flag: record.flag,
            audit_feedback: record.audit_feedback,
            status: record.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBatchResponse {
    pub plan: String,
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateScoreResponse {
    pub score: f64,
    pub flag: DuplicateFlag,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct CountEntry {
    pub label: String,
    pub count: i32,
}

/// Figures behind the audit dashboard.
#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_questions: i32,
    pub duplicate_alerts: i32,
    pub average_duplicate_risk: f64,
    pub bloom_distribution: Vec<CountEntry>,
    pub difficulty_distribution: Vec<CountEntry>,
    pub duplicate_risks: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct RatingDto {
    pub rating: i32,
    pub comment: String,
}

impl From<RatingRecord> for RatingDto {
    fn from(record: RatingRecord) -> Self {
        RatingDto {
            rating: i32::from(record.rating),
            comment: record.comment,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmitRatingResponse {
    pub rating: RatingDto,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// `None` until the first rating arrives.
    pub average_rating: Option<f64>,
    pub total_reviews: i32,
    pub recent_feedback: Vec<RatingDto>,
}
