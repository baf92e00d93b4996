use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{BloomLevel, Difficulty, Marks},
        dto::request::GenerateQuestionsRequest,
    },
};

/// Validated parameters of one generation batch.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionBatchParams {
    pub syllabus: String,
    pub course_outcomes: String,
    pub bloom_level: BloomLevel,
    pub question_count: u8,
    pub difficulty: Difficulty,
    pub marks: Marks,
}

impl TryFrom<GenerateQuestionsRequest> for QuestionBatchParams {
    type Error = AppError;

    fn try_from(request: GenerateQuestionsRequest) -> AppResult<Self> {
        request.validate()?;

        let syllabus = request.syllabus.trim().to_string();
        if syllabus.is_empty() {
            return Err(AppError::ValidationError(
                "syllabus cannot be blank".to_string(),
            ));
        }

        let question_count = u8::try_from(request.question_count).map_err(|_| {
            AppError::ValidationError(format!(
                "question count out of range: {}",
                request.question_count
            ))
        })?;
        let marks = Marks::try_from(request.marks).map_err(AppError::ValidationError)?;

        Ok(Self {
            syllabus,
            course_outcomes: request.course_outcomes.trim().to_string(),
            bloom_level: request.bloom_level,
            question_count,
            difficulty: request.difficulty,
            marks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(marks: i32) -> GenerateQuestionsRequest {
        GenerateQuestionsRequest {
            syllabus: "  Thermodynamics  ".to_string(),
            course_outcomes: "CO2".to_string(),
            bloom_level: BloomLevel::Analyze,
            question_count: 4,
            difficulty: Difficulty::Mixed,
            marks,
        }
    }

    #[test]
    fn valid_request_becomes_params() {
        let params = QuestionBatchParams::try_from(request(2)).expect("valid params");
        assert_eq!(params.syllabus, "Thermodynamics");
        assert_eq!(params.question_count, 4);
        assert_eq!(params.marks.value(), 2);
    }

    #[test]
    fn disallowed_marks_are_rejected() {
        let err = QuestionBatchParams::try_from(request(5)).expect_err("marks 5 not allowed");
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn blank_syllabus_is_rejected() {
        let mut blank = request(8);
        blank.syllabus = "   ".to_string();
        assert!(QuestionBatchParams::try_from(blank).is_err());
    }
}
