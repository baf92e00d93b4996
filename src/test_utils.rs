use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::QuestionRecord,
    repositories::QuestionRepository,
};

pub mod fixtures {
    use crate::models::{
        domain::{BloomLevel, Difficulty, Marks, QuestionRecord, QuestionStatus},
        dto::request::GenerateQuestionsRequest,
    };

    /// A stored Remember/Easy two-mark question with the given duplicate risk.
    pub fn sample_record(text: &str, duplicate_risk: f64) -> QuestionRecord {
        let mut record = record_with(text, BloomLevel::Remember, Difficulty::Easy);
        record.duplicate_risk = duplicate_risk;
        record.rederive_flag(0.80);
        record
    }

    pub fn record_with(text: &str, bloom_level: BloomLevel, difficulty: Difficulty) -> QuestionRecord {
        let marks = Marks::try_from(2u8).expect("2 is an allowed mark value");
        QuestionRecord::new(text, bloom_level, difficulty, marks, 0.0, 0.80)
            .with_audit("Relevance: High", QuestionStatus::Accepted)
    }

    /// Medium, Understand-level, eight-mark request for `question_count` questions.
    pub fn generate_request(question_count: i32) -> GenerateQuestionsRequest {
        GenerateQuestionsRequest {
            syllabus: "Unit 1: Cell membranes, osmosis and diffusion".to_string(),
            course_outcomes: "CO1: Explain transport across membranes".to_string(),
            bloom_level: BloomLevel::Understand,
            question_count,
            difficulty: Difficulty::Medium,
            marks: 8,
        }
    }

    /// Auditor reply in the JSON shape the pipeline expects.
    pub fn verdict_json(relevance: &str, clarity: &str) -> String {
        serde_json::json!({
            "relevance": relevance,
            "bloomLevel": "Understand",
            "clarity": clarity,
            "difficulty": "Medium",
            "suggestedImprovement": null
        })
        .to_string()
    }
}

/// Question storage held in memory, counting every full save.
#[derive(Default)]
pub struct InMemoryQuestionRepository {
    records: RwLock<Vec<QuestionRecord>>,
    saves: RwLock<usize>,
    health_failure: StdMutex<Option<String>>,
}

impl InMemoryQuestionRepository {
    pub fn with_records(records: Vec<QuestionRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    pub fn fail_health_checks(&self, message: &str) {
        if let Ok(mut failure) = self.health_failure.lock() {
            *failure = Some(message.to_string());
        }
    }

    pub async fn stored(&self) -> Vec<QuestionRecord> {
        self.records.read().await.clone()
    }

    pub async fn saved_snapshots(&self) -> usize {
        *self.saves.read().await
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn load_all(&self) -> AppResult<Vec<QuestionRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn save_all(&self, records: &[QuestionRecord]) -> AppResult<()> {
        *self.records.write().await = records.to_vec();
        *self.saves.write().await += 1;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let failure = self
            .health_failure
            .lock()
            .map(|failure| failure.clone())
            .unwrap_or(None);
        match failure {
            Some(message) => Err(AppError::StorageError(message)),
            None => Ok(()),
        }
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::domain::DuplicateFlag;

    #[test]
    fn test_sample_record_flag_follows_risk() {
        assert_eq!(sample_record("a", 0.5).flag, DuplicateFlag::Unique);
        assert_eq!(
            sample_record("a", 0.81).flag,
            DuplicateFlag::PossibleDuplicate
        );
    }

    #[tokio::test]
    async fn test_in_memory_repository_counts_saves() {
        let repository = InMemoryQuestionRepository::default();
        repository
            .save_all(&[sample_record("What is osmosis?", 0.0)])
            .await
            .expect("save");

        assert_eq!(repository.saved_snapshots().await, 1);
        assert_eq!(repository.load_all().await.expect("load").len(), 1);
    }
}
