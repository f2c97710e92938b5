use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A scheduled screening. `available_seats` is the ledger counter and always
/// stays within `0..=total_seats`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: Uuid,
    pub theatre_id: Uuid,
    pub movie_id: Uuid,
    pub screen_number: i32,
    pub show_time: DateTime<Utc>,
    pub total_seats: i32,
    pub available_seats: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewShow {
    pub theatre_id: Uuid,
    pub movie_id: Uuid,
    pub screen_number: i32,
    pub show_time: DateTime<Utc>,
    pub total_seats: i32,
}

impl NewShow {
    pub fn into_show(self) -> Show {
        Show {
            id: Uuid::new_v4(),
            theatre_id: self.theatre_id,
            movie_id: self.movie_id,
            screen_number: self.screen_number,
            show_time: self.show_time,
            total_seats: self.total_seats,
            available_seats: self.total_seats,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowFilter {
    #[serde(alias = "movie_id")]
    pub movie_id: Option<Uuid>,
    #[serde(alias = "theatre_id")]
    pub theatre_id: Option<Uuid>,
}

impl ShowFilter {
    pub fn matches(&self, show: &Show) -> bool {
        self.movie_id.is_none_or(|id| id == show.movie_id)
            && self.theatre_id.is_none_or(|id| id == show.theatre_id)
    }
}
