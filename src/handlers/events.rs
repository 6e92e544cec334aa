//! Event CRUD and listing handlers

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::handlers::AppState;
use crate::middleware::auth::AuthUser;
use crate::models::event::{CreateEventRequest, EventFilter, EventSort, UpdateEventRequest};
use crate::utils::errors::GatherlyError;
use crate::utils::response;

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
}

/// GET /api/events — public listing with search/category/sort
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Response, GatherlyError> {
    let filter = EventFilter {
        search: query.search,
        category: query.category,
    };
    let sort = EventSort::parse(query.sort_by.as_deref());

    let events = state
        .services
        .listing_service
        .list_events(filter, sort)
        .await?;

    Ok(response::success(events, "Events retrieved"))
}

/// GET /api/events/:id — public single-event view
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Response, GatherlyError> {
    let event = state.services.event_service.get_event(event_id).await?;
    Ok(response::success(event, "Event retrieved"))
}

/// POST /api/events — create an event owned by the caller
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<Response, GatherlyError> {
    let event = state
        .services
        .event_service
        .create_event(auth.user_id, request)
        .await?;

    Ok(response::created(event, "Event created"))
}

/// PUT /api/events/:id — creator-only metadata update
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Response, GatherlyError> {
    let event = state
        .services
        .event_service
        .update_event(event_id, auth.user_id, request)
        .await?;

    Ok(response::success(event, "Event updated"))
}

/// DELETE /api/events/:id — creator-only removal; RSVPs go with the record
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<Response, GatherlyError> {
    state
        .services
        .event_service
        .delete_event(event_id, auth.user_id)
        .await?;

    Ok(response::success(json!({ "id": event_id }), "Event deleted"))
}

/// GET /api/events/my/created — events the caller owns
pub async fn my_created_events(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Response, GatherlyError> {
    let events = state
        .services
        .event_service
        .events_created_by(auth.user_id)
        .await?;

    Ok(response::success(events, "Created events retrieved"))
}
