use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RatingRecord {
    pub rating: u8,
    pub comment: String,
}

impl RatingRecord {
    pub fn new(rating: u8, comment: impl Into<String>) -> Result<Self, String> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(format!(
                "rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, rating
            ));
        }
        Ok(Self {
            rating,
            comment: comment.into(),
        })
    }
}
