//! HTTP router assembly

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, events, rsvp, AppState};

pub fn create_routes(state: AppState) -> Router {
    let events_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/my/created", get(events::my_created_events))
        .route(
            "/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        );

    let rsvp_routes = Router::new()
        .route("/my-rsvps", get(rsvp::my_rsvps))
        .route("/check/:event_id", get(rsvp::check_rsvp))
        .route("/:event_id", post(rsvp::reserve).delete(rsvp::cancel));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/events", events_routes)
        .nest("/api/rsvp", rsvp_routes)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
