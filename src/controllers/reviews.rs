use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::MessageResponse;
use crate::auth::{authorize, Action};
use crate::error::AppResult;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reviews", post(add_review))
        .route("/reviews/owner/{movie_id}", get(owner_reviews))
        // GET takes a movie id, DELETE a review id
        .route("/reviews/admin/{id}", get(movie_reviews).delete(delete_review))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewRequest {
    pub movie_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    #[serde(default)]
    pub comment: String,
}

/// POST /api/reviews
async fn add_review(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<AddReviewRequest>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::WriteReview)?;
    let review = state
        .reviews
        .add_review(user.id, req.movie_id, req.rating, req.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/reviews/owner/{movie_id}
async fn owner_reviews(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(movie_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ViewOwnerReviews)?;
    Ok(Json(state.reviews.owner_reviews(user.id, movie_id).await?))
}

/// GET /api/reviews/admin/{movie_id}
async fn movie_reviews(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.reviews.movie_reviews(movie_id).await?))
}

/// DELETE /api/reviews/admin/{review_id}
async fn delete_review(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::DeleteReview)?;
    state.reviews.delete_review(review_id).await?;
    Ok(Json(MessageResponse::new("Review deleted")))
}
