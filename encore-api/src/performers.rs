use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use encore_domain::Performer;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/performers", get(list_performers))
        .route("/v1/performers/{id}", get(get_performer))
}

async fn list_performers(State(state): State<AppState>) -> Result<Json<Vec<Performer>>, AppError> {
    Ok(Json(state.catalog.performers().await?))
}

async fn get_performer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Performer>, AppError> {
    let performer = state
        .catalog
        .performer(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("performer {id}")))?;
    Ok(Json(performer))
}
