use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use encore_domain::{Concert, ConcertSummary, OccupancySnapshot, Performer};

use crate::error::AppError;
use crate::parse_date_param;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ConcertResponse {
    id: Uuid,
    title: String,
    image_name: String,
    blurb: String,
    dates: Vec<DateTime<Utc>>,
    performers: Vec<Performer>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/concerts", get(list_concerts))
        .route("/v1/concerts/summaries", get(list_summaries))
        .route("/v1/concerts/{id}", get(get_concert))
        .route("/v1/concerts/{id}/occupancy/{date}", get(get_occupancy))
}

async fn to_response(state: &AppState, concert: Concert) -> Result<ConcertResponse, AppError> {
    let mut performers = Vec::with_capacity(concert.performer_ids.len());
    for performer_id in &concert.performer_ids {
        if let Some(performer) = state.catalog.performer(*performer_id).await? {
            performers.push(performer);
        }
    }
    let mut dates: Vec<DateTime<Utc>> = concert.dates.into_iter().collect();
    dates.sort();

    Ok(ConcertResponse {
        id: concert.id,
        title: concert.title,
        image_name: concert.image_name,
        blurb: concert.blurb,
        dates,
        performers,
    })
}

async fn list_concerts(State(state): State<AppState>) -> Result<Json<Vec<ConcertResponse>>, AppError> {
    let mut out = Vec::new();
    for concert in state.catalog.concerts().await? {
        out.push(to_response(&state, concert).await?);
    }
    Ok(Json(out))
}

async fn list_summaries(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConcertSummary>>, AppError> {
    let summaries = state
        .catalog
        .concerts()
        .await?
        .iter()
        .map(Concert::summary)
        .collect();
    Ok(Json(summaries))
}

async fn get_concert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConcertResponse>, AppError> {
    let concert = state
        .catalog
        .concert(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("concert {id}")))?;
    Ok(Json(to_response(&state, concert).await?))
}

async fn get_occupancy(
    State(state): State<AppState>,
    Path((id, date)): Path<(Uuid, String)>,
) -> Result<Json<OccupancySnapshot>, AppError> {
    let date = parse_date_param(&date)?;
    let snapshot = state
        .engine
        .occupancy(id, date)
        .await
        .map_err(AppError::from_reservation)?;
    Ok(Json(snapshot))
}
