use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    errors::AppResult,
    repositories::{
        InMemoryRatingRepository, JsonFileQuestionRepository, MongoQuestionRepository,
        QuestionRepository,
    },
    services::{
        duplicate_detector::DuplicateDetector,
        model_service::{OpenAiModelService, TextGenerator},
        question_service::QuestionService,
        rating_service::RatingService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub question_service: Arc<QuestionService>,
    pub rating_service: Arc<RatingService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let repository: Arc<dyn QuestionRepository> = match config.storage_backend {
            StorageBackend::File => {
                log::info!("Using question bank file {}", config.questions_file.display());
                Arc::new(JsonFileQuestionRepository::new(&config.questions_file))
            }
            StorageBackend::Mongo => {
                Arc::new(MongoQuestionRepository::connect(&config).await?)
            }
        };

        let generator = Arc::new(OpenAiModelService::from_config(&config));

        Self::with_components(config, repository, generator).await
    }

    /// Assembles the state around caller-supplied storage and text generation.
    pub async fn with_components(
        config: Config,
        repository: Arc<dyn QuestionRepository>,
        generator: Arc<dyn TextGenerator>,
    ) -> AppResult<Self> {
        let detector = DuplicateDetector::from_config(&config);
        let question_service =
            Arc::new(QuestionService::load(repository, generator, detector).await?);
        let rating_service = Arc::new(RatingService::new(Arc::new(InMemoryRatingRepository::new())));

        Ok(Self {
            question_service,
            rating_service,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::model_service::MockTextGenerator,
        test_utils::{fixtures::sample_record, InMemoryQuestionRepository},
    };

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_with_components_loads_bank() {
        let repository = Arc::new(InMemoryQuestionRepository::with_records(vec![
            sample_record("What is osmosis?", 0.0),
        ]));
        let state = AppState::with_components(
            Config::test_config(),
            repository,
            Arc::new(MockTextGenerator::new()),
        )
        .await
        .expect("state builds");

        assert_eq!(state.question_service.question_count().await, 1);
        assert_eq!(state.question_service.detector().threshold(), 0.80);
    }
}
