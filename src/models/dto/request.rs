use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{BloomLevel, Difficulty};

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    #[validate(length(min = 1, max = 20000))]
    pub syllabus: String,

    #[serde(default)]
    #[graphql(default)]
    #[validate(length(max = 10000))]
    pub course_outcomes: String,

    pub bloom_level: BloomLevel,

    #[validate(range(min = 1, max = 20))]
    pub question_count: i32,

    pub difficulty: Difficulty,

    // one of 2, 8 or 11; checked when building QuestionBatchParams
    pub marks: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDuplicateRequest {
    #[validate(length(max = 20000))]
    pub candidate: String,

    /// Compared against the stored bank when omitted.
    #[serde(default)]
    pub corpus: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitRatingRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[serde(default)]
    #[graphql(default)]
    #[validate(length(max = 2000))]
    pub comment: String,
}
