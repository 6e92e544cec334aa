//! Event store interface
//!
//! The one operation admission control depends on is the pair of conditional
//! writes `reserve_attendee` / `release_attendee`: each must evaluate its
//! precondition and apply its mutation indivisibly with respect to other
//! callers on the same event id, and must change `attendees` and
//! `current_attendees` together or not at all. Everything else is plain
//! CRUD and read queries.

use async_trait::async_trait;

use crate::models::event::{CreateEventRequest, Event, EventFilter, EventSort, UpdateEventRequest};
use crate::utils::errors::Result;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event owned by `creator_id`, returning the stored record.
    async fn create(&self, creator_id: i64, request: CreateEventRequest) -> Result<Event>;

    /// Fetch a single event by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;

    /// Fetch events matching `filter`, ordered by `sort`.
    async fn find_many(&self, filter: &EventFilter, sort: EventSort) -> Result<Vec<Event>>;

    /// Apply a partial metadata update. Returns `None` if the event is gone.
    /// Attendee state is never touched through this path, and a capacity
    /// change is itself a conditional write: it only applies if the new
    /// capacity still covers the attendee count at commit time, otherwise
    /// the update fails with `InvalidInput` and nothing changes.
    async fn update_metadata(&self, id: i64, request: UpdateEventRequest) -> Result<Option<Event>>;

    /// Delete an event. Reservations are derived state, so removing the
    /// record is itself the cascade. Returns whether a row was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Events created by the given user, soonest first.
    async fn find_by_creator(&self, creator_id: i64) -> Result<Vec<Event>>;

    /// Events whose attendee set contains the given user, soonest first.
    async fn find_attending(&self, user_id: i64) -> Result<Vec<Event>>;

    /// Conditional write: add `user_id` to the attendee set and increment
    /// the cached count by exactly 1, only if the event exists, the user is
    /// not already a member, and the count is below capacity. Returns the
    /// updated snapshot, or `None` when the condition did not hold.
    async fn reserve_attendee(&self, event_id: i64, user_id: i64) -> Result<Option<Event>>;

    /// Conditional write: remove `user_id` from the attendee set and
    /// decrement the cached count by exactly 1, only if the user is a
    /// member. Membership implies a prior successful increment, so the
    /// count cannot go negative. Returns `None` when the condition did not
    /// hold (missing event or no reservation).
    async fn release_attendee(&self, event_id: i64, user_id: i64) -> Result<Option<Event>>;

    /// Count stored events.
    async fn count(&self) -> Result<i64>;
}
