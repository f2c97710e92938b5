use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub genre: Vec<String>,
    /// Runtime in minutes
    pub duration: i32,
    pub description: String,
    pub language: String,
    pub release_date: NaiveDate,
    pub rating: f64,
    pub trailer_url: Option<String>,
    pub poster: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub genre: Vec<String>,
    pub duration: i32,
    pub description: String,
    pub language: String,
    pub release_date: NaiveDate,
    pub rating: f64,
    pub trailer_url: Option<String>,
    pub poster: Option<String>,
}

impl NewMovie {
    pub fn into_movie(self) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            title: self.title,
            genre: self.genre,
            duration: self.duration,
            description: self.description,
            language: self.language,
            release_date: self.release_date,
            rating: self.rating,
            trailer_url: self.trailer_url,
            poster: self.poster,
            created_at: Utc::now(),
        }
    }
}
