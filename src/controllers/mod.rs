pub mod admin;
pub mod bookings;
pub mod owner;
pub mod reviews;
pub mod shows;
pub mod theatres;
pub mod users;

use axum::Router;
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(users::routes())
        .merge(admin::routes())
        .merge(bookings::routes())
        .merge(theatres::routes())
        .merge(reviews::routes())
        .merge(owner::routes())
        .merge(shows::routes())
}

/// Body for operations that have nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
