//! HTTP handlers

pub mod events;
pub mod rsvp;

use axum::extract::{FromRef, State};
use axum::response::Response;
use serde::Serialize;

use crate::database::connection::{self, DatabasePool};
use crate::database::repositories::EventRepository;
use crate::middleware::auth::TokenValidator;
use crate::services::ServiceFactory;
use crate::utils::response;

/// Shared application state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory<EventRepository>,
    pub token_validator: TokenValidator,
    pub pool: DatabasePool,
}

impl FromRef<AppState> for TokenValidator {
    fn from_ref(state: &AppState) -> Self {
        state.token_validator.clone()
    }
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    database: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = match connection::health_check(&state.pool).await {
        Ok(()) => "ok",
        Err(_) => "unavailable",
    };

    let payload = HealthPayload {
        status: "ok",
        service: "gatherly",
        database,
    };

    response::success(payload, "Health check successful")
}
