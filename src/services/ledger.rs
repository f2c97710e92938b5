//! Seat inventory per show.
//!
//! `reserve` and `release` are the only operations that move
//! `available_seats`. Each one is a single conditional step in the store, so
//! a booking never exists without its deduction and a cancellation never
//! restores seats twice.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::booking::NewBooking;
use crate::models::Booking;
use crate::store::{ReserveOutcome, Store};

// A failed guarded decrement is tried once more before giving up
const RESERVE_ATTEMPTS: usize = 2;

#[derive(Clone)]
pub struct InventoryLedger {
    store: Arc<dyn Store>,
}

impl InventoryLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn reserve(
        &self,
        user_id: Uuid,
        show_id: Uuid,
        seats: Vec<String>,
        price_per_seat: f64,
    ) -> AppResult<Booking> {
        let seats = normalize_seats(seats)?;
        if !price_per_seat.is_finite() || price_per_seat < 0.0 {
            return Err(AppError::validation("Price per seat must be zero or more"));
        }

        let show = self
            .store
            .find_show(show_id)
            .await?
            .ok_or(AppError::NotFound("Show"))?;

        if seats.len() as i32 > show.available_seats {
            return Err(AppError::InsufficientSeats);
        }

        let request = NewBooking {
            user_id,
            show_id,
            theatre_id: show.theatre_id,
            seats,
            price_per_seat,
        };

        for attempt in 1..=RESERVE_ATTEMPTS {
            match self.store.reserve_seats(request.clone()).await? {
                ReserveOutcome::Reserved(booking) => {
                    info!(
                        booking_id = %booking.id,
                        show_id = %show_id,
                        seats = booking.seat_count(),
                        "seats reserved"
                    );
                    return Ok(booking);
                }
                ReserveOutcome::ShowNotFound => return Err(AppError::NotFound("Show")),
                ReserveOutcome::SeatsTaken(taken) => {
                    return Err(AppError::conflict(format!(
                        "Seats already booked: {}",
                        taken.join(", ")
                    )));
                }
                ReserveOutcome::InsufficientSeats { available } => {
                    warn!(
                        show_id = %show_id,
                        requested = request.seat_count(),
                        available,
                        attempt,
                        "guarded seat decrement did not apply"
                    );
                }
            }
        }

        Err(AppError::InsufficientSeats)
    }

    pub async fn release(&self, user_id: Uuid, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self
            .store
            .find_booking_for_user(booking_id, user_id)
            .await?
            .ok_or(AppError::NotFound("Booking"))?;

        if !booking.is_confirmed() {
            return Err(AppError::AlreadyCancelled);
        }

        // A concurrent cancel may win between the read and the guarded update
        let cancelled = self
            .store
            .cancel_booking(booking_id, user_id)
            .await?
            .ok_or(AppError::AlreadyCancelled)?;

        info!(
            booking_id = %cancelled.id,
            show_id = %cancelled.show_id,
            seats = cancelled.seat_count(),
            "booking cancelled"
        );
        Ok(cancelled)
    }

    pub async fn user_bookings(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        self.store.list_bookings_by_user(user_id).await
    }

    pub async fn all_bookings(&self) -> AppResult<Vec<Booking>> {
        self.store.list_bookings().await
    }

    pub async fn owner_bookings(&self, owner_id: Uuid) -> AppResult<Vec<Booking>> {
        self.store.list_bookings_by_owner(owner_id).await
    }
}

/// Trims and upper-cases labels, rejecting blanks and repeats.
fn normalize_seats(seats: Vec<String>) -> AppResult<Vec<String>> {
    if seats.is_empty() {
        return Err(AppError::validation("At least one seat must be selected"));
    }

    let mut seen = HashSet::with_capacity(seats.len());
    let mut normalized = Vec::with_capacity(seats.len());
    for seat in seats {
        let label = seat.trim().to_ascii_uppercase();
        if label.is_empty() {
            return Err(AppError::validation("Seat labels must not be blank"));
        }
        if !seen.insert(label.clone()) {
            return Err(AppError::validation(format!("Seat {} was requested twice", label)));
        }
        normalized.push(label);
    }
    Ok(normalized)
}
