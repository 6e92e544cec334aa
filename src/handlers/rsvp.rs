//! RSVP handlers
//!
//! Thin HTTP adapters over the admission controller; every decision about
//! membership and capacity happens inside the atomic store update.

use axum::extract::{Path, State};
use axum::response::Response;
use serde_json::json;

use crate::handlers::AppState;
use crate::middleware::auth::AuthUser;
use crate::utils::errors::GatherlyError;
use crate::utils::response;

/// POST /api/rsvp/:event_id — reserve a spot for the caller
pub async fn reserve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<Response, GatherlyError> {
    let event = state
        .services
        .admission_service
        .reserve(event_id, auth.user_id)
        .await?;

    Ok(response::success(event, "RSVP successful"))
}

/// DELETE /api/rsvp/:event_id — cancel the caller's reservation
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<Response, GatherlyError> {
    let event = state
        .services
        .admission_service
        .cancel(event_id, auth.user_id)
        .await?;

    Ok(response::success(event, "RSVP cancelled successfully"))
}

/// GET /api/rsvp/my-rsvps — events the caller is attending, soonest first
pub async fn my_rsvps(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Response, GatherlyError> {
    let events = state
        .services
        .admission_service
        .reservations_for_user(auth.user_id)
        .await?;

    Ok(response::success(events, "Reservations retrieved"))
}

/// GET /api/rsvp/check/:event_id — whether the caller holds a reservation
pub async fn check_rsvp(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<Response, GatherlyError> {
    let has_rsvp = state
        .services
        .admission_service
        .check_reservation(event_id, auth.user_id)
        .await?;

    Ok(response::success(
        json!({ "has_rsvp": has_rsvp }),
        "Reservation status retrieved",
    ))
}
