use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{authorize, Action};
use crate::error::AppResult;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/user-bookings", get(user_bookings))
        .route("/bookings/{id}/cancel", patch(cancel_booking))
        .route("/bookings/all-bookings", get(all_bookings))
        .route("/bookings/owner-bookings", get(owner_bookings))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub show_id: Uuid,
    #[validate(length(min = 1, message = "At least one seat must be selected"))]
    pub seats: Vec<String>,
    #[validate(range(min = 0.0, message = "Price per seat must be zero or more"))]
    pub price_per_seat: f64,
}

/// POST /api/bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::BookSeats)?;
    let booking = state
        .ledger
        .reserve(user.id, req.show_id, req.seats, req.price_per_seat)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/bookings/user-bookings
async fn user_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ViewOwnBookings)?;
    Ok(Json(state.ledger.user_bookings(user.id).await?))
}

/// PATCH /api/bookings/{id}/cancel
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::CancelOwnBooking)?;
    Ok(Json(state.ledger.release(user.id, booking_id).await?))
}

/// GET /api/bookings/all-bookings
async fn all_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ViewAllBookings)?;
    Ok(Json(state.ledger.all_bookings().await?))
}

/// GET /api/bookings/owner-bookings
async fn owner_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ViewOwnerBookings)?;
    Ok(Json(state.ledger.owner_bookings(user.id).await?))
}
