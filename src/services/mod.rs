//! Services module
//!
//! This module contains business logic services

pub mod admission;
pub mod event;
pub mod listing;

// Re-export commonly used services
pub use admission::AdmissionService;
pub use event::EventService;
pub use listing::ListingService;

use std::sync::Arc;

use crate::database::store::EventStore;

/// Service factory bundling every service over one shared store
pub struct ServiceFactory<S> {
    pub admission_service: AdmissionService<S>,
    pub event_service: EventService<S>,
    pub listing_service: ListingService<S>,
}

impl<S> Clone for ServiceFactory<S> {
    fn clone(&self) -> Self {
        Self {
            admission_service: self.admission_service.clone(),
            event_service: self.event_service.clone(),
            listing_service: self.listing_service.clone(),
        }
    }
}

impl<S: EventStore> ServiceFactory<S> {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(store: Arc<S>) -> Self {
        Self {
            admission_service: AdmissionService::new(Arc::clone(&store)),
            event_service: EventService::new(Arc::clone(&store)),
            listing_service: ListingService::new(store),
        }
    }
}
