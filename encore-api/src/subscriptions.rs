use axum::{extract::State, routing::post, Extension, Json, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use encore_domain::{OccupancyNotification, SubscriptionRequest};
use encore_notify::SubscriptionRegistry;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/subscribe/concert-info", post(subscribe_concert_info))
}

/// Unregisters the subscription if the client goes away before the
/// threshold is reached, so abandoned entries do not pile up in the
/// registry.
struct SubscriptionGuard {
    registry: Arc<SubscriptionRegistry>,
    concert_id: Uuid,
    date: DateTime<Utc>,
    id: Uuid,
    armed: bool,
}

impl SubscriptionGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if self.armed && self.registry.remove(self.concert_id, self.date, self.id) {
            debug!(concert_id = %self.concert_id, "subscription abandoned by client");
        }
    }
}

/// Long-poll subscription: the request parks until a booking pushes the
/// concert-date past the requested percentage, then answers with the seats
/// still available.
async fn subscribe_concert_info(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<Json<OccupancyNotification>, AppError> {
    let user_id = claims.user_id()?;

    if !state.catalog.is_valid_date(req.concert_id, req.date).await? {
        return Err(AppError::ValidationError(format!(
            "concert {} has no performance on {}",
            req.concert_id, req.date
        )));
    }

    let (id, rx) = state
        .registry
        .subscribe(req.concert_id, req.date, req.percentage_booked, user_id);
    let mut guard = SubscriptionGuard {
        registry: state.registry.clone(),
        concert_id: req.concert_id,
        date: req.date,
        id,
        armed: true,
    };

    match rx.await {
        Ok(notification) => {
            guard.disarm();
            Ok(Json(notification))
        }
        Err(_) => Err(AppError::InternalServerError(
            "subscription resolved without a notification".to_string(),
        )),
    }
}
