use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
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
use crate::models::Role;
use crate::services::accounts::{ProfileUpdate, Registration};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/profile", get(profile))
        .route("/user/profile-update", patch(update_profile))
        .route("/user/delete/{user_id}", delete(delete_user))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// POST /api/user/register
async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .accounts
        .register(Registration {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/user/login
async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let response = state.accounts.login(&req.email, req.password).await?;
    Ok(Json(response))
}

/// GET /api/user/profile
async fn profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ViewProfile)?;
    Ok(Json(state.accounts.profile(user.id).await?))
}

/// PATCH /api/user/profile-update
async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::UpdateProfile)?;
    let updated = state
        .accounts
        .update_profile(
            user.id,
            ProfileUpdate {
                name: req.name,
                email: req.email,
                password: req.password,
            },
        )
        .await?;
    Ok(Json(updated))
}

/// DELETE /api/user/delete/{user_id}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ManageUsers)?;
    state.accounts.delete_user(user_id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
