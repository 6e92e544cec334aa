//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// An event listing. RSVPs are not stored separately: a reservation is
/// membership of a user id in `attendees`, and `current_attendees` is a
/// denormalized cache of the set's size that every mutation keeps in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub event_time: String,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub image_url: String,
    pub creator_id: i64,
    pub attendees: Vec<i64>,
    pub current_attendees: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_attending(&self, user_id: i64) -> bool {
        self.attendees.contains(&user_id)
    }

    pub fn is_full(&self) -> bool {
        self.current_attendees >= self.capacity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub event_time: String,
    pub location: String,
    pub category: Option<String>,
    pub capacity: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
}

/// Listing filter. `search` is a case-insensitive substring match on
/// title/description; a category of `"All"` or `None` matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventSort {
    /// Soonest event first (the default listing order).
    #[default]
    DateAsc,
    /// Most recently created first.
    CreatedDesc,
    /// Largest capacity first.
    CapacityDesc,
}

impl EventSort {
    /// Maps the `sort_by` query key to a sort order. Unknown or missing
    /// keys fall back to date ascending.
    pub fn parse(key: Option<&str>) -> Self {
        match key {
            Some("createdAt") => EventSort::CreatedDesc,
            Some("capacity") => EventSort::CapacityDesc,
            _ => EventSort::DateAsc,
        }
    }
}

/// Default category applied when a request leaves the field out.
pub const DEFAULT_CATEGORY: &str = "Other";
