use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use encore_domain::{BookedSeat, Booking, BookingRequest};

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct BookingResponse {
    id: Uuid,
    concert_id: Uuid,
    date: DateTime<Utc>,
    seats: Vec<BookedSeat>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            concert_id: booking.concert_id,
            date: booking.date,
            seats: booking.seats,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(attempt_booking).get(list_bookings))
        .route("/v1/bookings/{id}", get(get_booking))
}

async fn attempt_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let user_id = claims.user_id()?;

    let booking = state
        .engine
        .reserve(req.concert_id, req.date, &req.seat_labels, user_id)
        .await
        .map_err(AppError::from_reservation)?;

    info!(booking_id = %booking.id, username = %claims.username, "booking confirmed");
    Ok((StatusCode::CREATED, Json(booking.into())))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let user_id = claims.user_id()?;
    let bookings = state
        .ledger
        .list_for_user(user_id)
        .await?
        .into_iter()
        .map(BookingResponse::from)
        .collect();
    Ok(Json(bookings))
}

/// A booking is only visible to its owner; anything else reads as
/// forbidden, including ids that do not exist.
async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let user_id = claims.user_id()?;
    let booking = state
        .ledger
        .find(id)
        .await?
        .filter(|b| b.user_id == user_id)
        .ok_or_else(|| AppError::AuthorizationError("booking not accessible".to_string()))?;
    Ok(Json(booking.into()))
}
