use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

impl NewReview {
    pub fn into_review(self) -> Review {
        Review {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            movie_id: self.movie_id,
            rating: self.rating,
            comment: self.comment,
            created_at: Utc::now(),
        }
    }
}
