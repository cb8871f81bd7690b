use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use encore_domain::SeatStatusFilter;

use crate::error::AppError;
use crate::parse_date_param;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SeatsQuery {
    #[serde(default)]
    status: SeatStatusFilter,
}

#[derive(Debug, Serialize)]
struct SeatResponse {
    label: String,
    price: i64,
    booked: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/concerts/{id}/seats/{date}", get(seats_for_date))
}

/// Lists a concert-date's seats, optionally filtered to booked or unbooked
/// only. An unknown concert-date yields an empty list.
async fn seats_for_date(
    State(state): State<AppState>,
    Path((id, date)): Path<(Uuid, String)>,
    Query(query): Query<SeatsQuery>,
) -> Result<Json<Vec<SeatResponse>>, AppError> {
    let date = parse_date_param(&date)?;
    let seats = state
        .seats
        .seats_for_date(id, date)
        .await?
        .into_iter()
        .filter(|seat| query.status.matches(seat.booked))
        .map(|seat| SeatResponse {
            label: seat.label,
            price: seat.price,
            booked: seat.booked,
        })
        .collect();
    Ok(Json(seats))
}
