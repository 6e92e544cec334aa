//! Event metadata management
//!
//! Standard CRUD over event records with creator-only mutation. Attendee
//! state is out of bounds here; it belongs to the admission controller.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::store::EventStore;
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::{GatherlyError, Result};
use crate::utils::logging;

/// Service for event creation and creator-owned mutation
pub struct EventService<S> {
    store: Arc<S>,
}

impl<S> Clone for EventService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EventStore> EventService<S> {
    /// Create a new EventService instance
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a new event owned by the caller.
    pub async fn create_event(&self, creator_id: i64, request: CreateEventRequest) -> Result<Event> {
        validate_create_request(&request)?;

        let event = self.store.create(creator_id, request).await?;
        logging::log_event_action(event.id, "create", creator_id);

        Ok(event)
    }

    /// Fetch a single event.
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.store
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })
    }

    /// Update event metadata. Only the creator may do this, and capacity can
    /// never be lowered below the current attendee count.
    pub async fn update_event(
        &self,
        event_id: i64,
        caller_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let existing = self.get_event(event_id).await?;

        if existing.creator_id != caller_id {
            logging::log_ownership_rejection(event_id, caller_id, "update");
            return Err(GatherlyError::PermissionDenied(
                "Only the event creator may update this event".to_string(),
            ));
        }

        validate_update_request(&request)?;

        let updated = self
            .store
            .update_metadata(event_id, request)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        logging::log_event_action(event_id, "update", caller_id);
        Ok(updated)
    }

    /// Delete an event. Creator-only. Reservations are derived from the
    /// attendee set, so the record's removal is also the RSVP cascade.
    pub async fn delete_event(&self, event_id: i64, caller_id: i64) -> Result<()> {
        let existing = self.get_event(event_id).await?;

        if existing.creator_id != caller_id {
            logging::log_ownership_rejection(event_id, caller_id, "delete");
            return Err(GatherlyError::PermissionDenied(
                "Only the event creator may delete this event".to_string(),
            ));
        }

        if !self.store.delete(event_id).await? {
            return Err(GatherlyError::EventNotFound { event_id });
        }

        info!(event_id = event_id, user_id = caller_id, "Event deleted");
        Ok(())
    }

    /// Events created by the caller, soonest first.
    pub async fn events_created_by(&self, user_id: i64) -> Result<Vec<Event>> {
        debug!(user_id = user_id, "Listing events created by user");
        self.store.find_by_creator(user_id).await
    }
}

fn validate_create_request(request: &CreateEventRequest) -> Result<()> {
    if request.title.trim().is_empty() {
        return Err(GatherlyError::InvalidInput("Title is required".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(GatherlyError::InvalidInput(
            "Description is required".to_string(),
        ));
    }
    if request.location.trim().is_empty() {
        return Err(GatherlyError::InvalidInput(
            "Location is required".to_string(),
        ));
    }
    if request.event_time.trim().is_empty() {
        return Err(GatherlyError::InvalidInput("Time is required".to_string()));
    }
    if request.capacity < 1 {
        return Err(GatherlyError::InvalidInput(
            "Capacity must be at least 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_update_request(request: &UpdateEventRequest) -> Result<()> {
    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return Err(GatherlyError::InvalidInput(
                "Title cannot be empty".to_string(),
            ));
        }
    }

    // Whether the new capacity still covers the attendee count is decided
    // by the store at commit time, not against a snapshot here.
    if let Some(capacity) = request.capacity {
        if capacity < 1 {
            return Err(GatherlyError::InvalidInput(
                "Capacity must be at least 1".to_string(),
            ));
        }
    }

    Ok(())
}
