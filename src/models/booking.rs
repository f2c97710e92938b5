use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub show_id: Uuid,
    pub theatre_id: Uuid,
    pub seats: Vec<String>,
    pub price_per_seat: f64,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
}

impl Booking {
    pub fn seat_count(&self) -> i32 {
        self.seats.len() as i32
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// A fully priced booking waiting for the ledger to accept it.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub show_id: Uuid,
    pub theatre_id: Uuid,
    pub seats: Vec<String>,
    pub price_per_seat: f64,
}

impl NewBooking {
    pub fn seat_count(&self) -> i32 {
        self.seats.len() as i32
    }

    pub fn total_amount(&self) -> f64 {
        self.price_per_seat * self.seats.len() as f64
    }

    pub fn into_booking(self) -> Booking {
        let total_amount = self.total_amount();
        Booking {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            show_id: self.show_id,
            theatre_id: self.theatre_id,
            seats: self.seats,
            price_per_seat: self.price_per_seat,
            total_amount,
            status: BookingStatus::Confirmed,
            booking_date: Utc::now(),
        }
    }
}
