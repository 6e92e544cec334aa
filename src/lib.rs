//! Gatherly event service
//!
//! An event-listing and RSVP service. Users create events with capacity
//! limits, browse and search listings, and reserve a spot subject to
//! capacity. Admission control keeps the attendee count within capacity and
//! consistent with the attendee set even under concurrent requests.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GatherlyError, Result};

// Re-export main components for easy access
pub use database::{EventRepository, EventStore, MemoryEventStore};
pub use handlers::AppState;
pub use middleware::auth::TokenValidator;
pub use services::{AdmissionService, EventService, ListingService, ServiceFactory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
