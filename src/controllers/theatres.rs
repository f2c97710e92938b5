use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::admin::decide_theatre;
use crate::auth::{authorize, Action};
use crate::error::AppResult;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::theatre::NewTheatre;
use crate::seat_map::TheatreView;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/theatre", post(submit_theatre))
        .route("/theatre/approve/{id}", patch(decide_theatre))
        .route("/theatre/my-theatres", get(my_theatres))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTheatreRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 300, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 1, max = 50, message = "Total screens must be between 1 and 50"))]
    pub total_screens: i32,
}

/// POST /api/theatre
async fn submit_theatre(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<SubmitTheatreRequest>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::SubmitTheatre)?;
    let theatre = state
        .approvals
        .submit_theatre(NewTheatre {
            name: req.name.trim().to_string(),
            location: req.location.trim().to_string(),
            total_screens: req.total_screens,
            owner_id: user.id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(TheatreView::from(theatre))))
}

/// GET /api/theatre/my-theatres
async fn my_theatres(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ViewOwnTheatres)?;
    Ok(Json(state.catalog.my_theatres(user.id).await?))
}
