use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::approval::Decision;
use crate::auth::{authorize, Action};
use crate::error::AppResult;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/theatres/{id}", patch(decide_theatre))
        .route("/admin/users/{id}", patch(decide_user))
        .route("/admin/pending-admins", get(pending_admins))
        .route("/admin/users", get(list_users))
        .route("/admin/theatre-list", get(theatre_list))
        .route("/admin/movie-list", get(movie_list))
}

/// `{"action": "approve" | "reject", "reason"?: "..."}`
#[derive(Debug, Deserialize, Validate)]
pub struct DecisionRequest {
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

impl DecisionRequest {
    pub fn into_decision(self) -> AppResult<Decision> {
        Decision::parse(&self.action, self.reason)
    }
}

/// PATCH /api/admin/theatres/{id}
pub async fn decide_theatre(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(theatre_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<DecisionRequest>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::DecideApproval)?;
    let decision = req.into_decision()?;
    let theatre = state
        .approvals
        .decide_theatre(user.id, theatre_id, decision)
        .await?;
    Ok(Json(theatre))
}

/// PATCH /api/admin/users/{id}
async fn decide_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<DecisionRequest>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::DecideApproval)?;
    let decision = req.into_decision()?;
    let decided = state.approvals.decide_user(user.id, user_id, decision).await?;
    Ok(Json(decided))
}

/// GET /api/admin/pending-admins
async fn pending_admins(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::DecideApproval)?;
    Ok(Json(state.approvals.pending_admins().await?))
}

/// GET /api/admin/users
async fn list_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ManageUsers)?;
    Ok(Json(state.accounts.list_users().await?))
}

/// GET /api/admin/theatre-list
async fn theatre_list(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    Ok(Json(state.catalog.list_theatres().await?))
}

/// GET /api/admin/movie-list
async fn movie_list(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    Ok(Json(state.catalog.list_movies().await?))
}
