pub mod question_repository;
pub mod rating_repository;

pub use question_repository::{
    JsonFileQuestionRepository, MongoQuestionRepository, QuestionRepository,
};
pub use rating_repository::{InMemoryRatingRepository, RatingRepository};
