use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{authorize, Action};
use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::services::catalog::{MovieForm, PosterUpload, ShowRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/owner/movies", post(add_movie))
        .route("/owner/shows", post(create_show))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShowRequest {
    pub theatre_id: Uuid,
    pub movie_id: Uuid,
    #[validate(range(min = 1, message = "Screen number must be at least 1"))]
    pub screen_number: i32,
    pub show_time: DateTime<Utc>,
    #[validate(range(min = 1, message = "Total seats must be positive"))]
    pub total_seats: Option<i32>,
}

/// POST /api/owner/movies (multipart)
async fn add_movie(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::AddMovie)?;

    let mut form = MovieForm::default();
    let mut poster = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) if name == "poster" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(e.body_text()))?;
                if !bytes.is_empty() {
                    poster = Some(PosterUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.body_text()))?;
                form.set(&name, value);
            }
        }
    }

    let movie = state.catalog.add_movie(form, poster).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// POST /api/owner/shows
async fn create_show(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateShowRequest>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ScheduleShows)?;
    let show = state
        .catalog
        .create_show(
            &user,
            ShowRequest {
                theatre_id: req.theatre_id,
                movie_id: req.movie_id,
                screen_number: req.screen_number,
                show_time: req.show_time,
                total_seats: req.total_seats,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(show)))
}
