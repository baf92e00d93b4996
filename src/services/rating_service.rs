use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::RatingRecord,
        dto::{
            request::SubmitRatingRequest,
            response::{RatingDto, RatingSummary, SubmitRatingResponse},
        },
    },
    repositories::RatingRepository,
};

const RECENT_FEEDBACK_LIMIT: usize = 5;

pub struct RatingService {
    repository: Arc<dyn RatingRepository>,
}

impl RatingService {
    pub fn new(repository: Arc<dyn RatingRepository>) -> Self {
        Self { repository }
    }

    pub async fn submit(&self, request: SubmitRatingRequest) -> AppResult<SubmitRatingResponse> {
        request.validate()?;

        let rating = u8::try_from(request.rating)
            .map_err(|_| AppError::ValidationError("rating must be between 1 and 5".to_string()))?;
        let record =
            RatingRecord::new(rating, request.comment.trim()).map_err(AppError::ValidationError)?;

        let saved = self.repository.append(record).await?;
        log::info!("Recorded a {}-star rating", saved.rating);

        Ok(SubmitRatingResponse {
            rating: saved.into(),
            message: "Thank you for your feedback!".to_string(),
        })
    }

    /// Average over all ratings plus the newest few, most recent first.
    pub async fn summary(&self) -> AppResult<RatingSummary> {
        let ratings = self.repository.list_all().await?;

        let average_rating = if ratings.is_empty() {
            None
        } else {
            let total: u32 = ratings.iter().map(|r| u32::from(r.rating)).sum();
            Some(total as f64 / ratings.len() as f64)
        };

        let recent_feedback: Vec<RatingDto> = ratings
            .iter()
            .rev()
            .take(RECENT_FEEDBACK_LIMIT)
            .cloned()
            .map(RatingDto::from)
            .collect();

        Ok(RatingSummary {
            average_rating,
            total_reviews: ratings.len() as i32,
            recent_feedback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryRatingRepository;

    fn service() -> RatingService {
        RatingService::new(Arc::new(InMemoryRatingRepository::new()))
    }

    fn request(rating: i32, comment: &str) -> SubmitRatingRequest {
        SubmitRatingRequest {
            rating,
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_summary_has_no_average() {
        let summary = service().summary().await.expect("summary");
        assert_eq!(summary.average_rating, None);
        assert_eq!(summary.total_reviews, 0);
        assert!(summary.recent_feedback.is_empty());
    }

    #[tokio::test]
    async fn summary_averages_and_lists_newest_first() {
        let service = service();
        for (rating, comment) in [(5, "a"), (4, "b"), (3, "c"), (2, "d"), (1, "e"), (5, "f")] {
            service.submit(request(rating, comment)).await.expect("submit");
        }

        let summary = service.summary().await.expect("summary");
        assert_eq!(summary.total_reviews, 6);
        assert_eq!(summary.average_rating, Some(20.0 / 6.0));

        let comments: Vec<&str> = summary
            .recent_feedback
            .iter()
            .map(|r| r.comment.as_str())
            .collect();
        assert_eq!(comments, vec!["f", "e", "d", "c", "b"]);
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected() {
        let service = service();
        let result = service.submit(request(0, "")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let summary = service.summary().await.expect("summary");
        assert_eq!(summary.total_reviews, 0);
    }

    #[tokio::test]
    async fn submit_thanks_the_user() {
        let response = service()
            .submit(request(4, "  Clear questions  "))
            .await
            .expect("submit");
        assert_eq!(response.message, "Thank you for your feedback!");
        assert_eq!(response.rating.rating, 4);
        assert_eq!(response.rating.comment, "Clear questions");
    }
}
