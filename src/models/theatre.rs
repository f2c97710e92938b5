use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "theatre_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TheatreStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theatre {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub total_screens: i32,
    pub owner_id: Uuid,
    pub status: TheatreStatus,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Theatre {
    pub fn is_approved(&self) -> bool {
        self.status == TheatreStatus::Approved
    }

    pub fn has_screen(&self, screen_number: i32) -> bool {
        (1..=self.total_screens).contains(&screen_number)
    }
}

#[derive(Debug, Clone)]
pub struct NewTheatre {
    pub name: String,
    pub location: String,
    pub total_screens: i32,
    pub owner_id: Uuid,
}

impl NewTheatre {
    // Every theatre enters the approval queue as pending
    pub fn into_theatre(self) -> Theatre {
        Theatre {
            id: Uuid::new_v4(),
            name: self.name,
            location: self.location,
            total_screens: self.total_screens,
            owner_id: self.owner_id,
            status: TheatreStatus::Pending,
            rejection_reason: None,
            approved_by: None,
            created_at: Utc::now(),
        }
    }
}
