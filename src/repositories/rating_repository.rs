use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{errors::AppResult, models::domain::RatingRecord};

/// Append-only rating storage.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn append(&self, rating: RatingRecord) -> AppResult<RatingRecord>;
    async fn list_all(&self) -> AppResult<Vec<RatingRecord>>;
}

/// Ratings kept for the lifetime of the process only.
#[derive(Default)]
pub struct InMemoryRatingRepository {
    ratings: RwLock<Vec<RatingRecord>>,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn append(&self, rating: RatingRecord) -> AppResult<RatingRecord> {
        self.ratings.write().await.push(rating.clone());
        Ok(rating)
    }

    async fn list_all(&self) -> AppResult<Vec<RatingRecord>> {
        Ok(self.ratings.read().await.clone())
    }
}
