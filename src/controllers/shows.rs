use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::show::ShowFilter;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", get(list_shows))
        .route("/shows/{id}", get(get_show))
}

/// GET /api/shows?movieId=&theatreId=
async fn list_shows(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ShowFilter>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.catalog.list_shows(filter).await?))
}

/// GET /api/shows/{id}
async fn get_show(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.catalog.get_show(show_id).await?))
}
