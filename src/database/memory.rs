//! In-memory event store
//!
//! A single-process stand-in for the Postgres store: one mutex guards the
//! whole map, so every conditional write evaluates its precondition and
//! applies its mutation inside one critical section. Satisfies the same
//! contract as `EventRepository` for non-distributed deployments and is the
//! store the unit tests run against.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::database::store::EventStore;
use crate::models::event::{
    CreateEventRequest, Event, EventFilter, EventSort, UpdateEventRequest, DEFAULT_CATEGORY,
};
use crate::utils::errors::{GatherlyError, Result};

#[derive(Default)]
struct Inner {
    events: HashMap<i64, Event>,
    next_id: i64,
}

#[derive(Default)]
pub struct MemoryEventStore {
    inner: Mutex<Inner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(event: &Event, filter: &EventFilter) -> bool {
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !event.title.to_lowercase().contains(&needle)
            && !event.description.to_lowercase().contains(&needle)
        {
            return false;
        }
    }

    if let Some(category) = &filter.category {
        if event.category != *category {
            return false;
        }
    }

    true
}

fn sort_events(events: &mut Vec<Event>, sort: EventSort) {
    match sort {
        EventSort::DateAsc => events.sort_by_key(|e| (e.event_date, e.id)),
        EventSort::CreatedDesc => {
            events.sort_by_key(|e| (std::cmp::Reverse(e.created_at), std::cmp::Reverse(e.id)))
        }
        EventSort::CapacityDesc => events.sort_by_key(|e| (std::cmp::Reverse(e.capacity), e.id)),
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create(&self, creator_id: i64, request: CreateEventRequest) -> Result<Event> {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now();

        let event = Event {
            id,
            title: request.title,
            description: request.description,
            event_date: request.event_date,
            event_time: request.event_time,
            location: request.location,
            category: request
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            capacity: request.capacity,
            image_url: request.image_url.unwrap_or_default(),
            creator_id,
            attendees: Vec::new(),
            current_attendees: 0,
            created_at: now,
            updated_at: now,
        };

        inner.events.insert(id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let inner = self.inner.lock().await;
        Ok(inner.events.get(&id).cloned())
    }

    async fn find_many(&self, filter: &EventFilter, sort: EventSort) -> Result<Vec<Event>> {
        let inner = self.inner.lock().await;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| matches_filter(e, filter))
            .cloned()
            .collect();
        sort_events(&mut events, sort);
        Ok(events)
    }

    async fn update_metadata(&self, id: i64, request: UpdateEventRequest) -> Result<Option<Event>> {
        let mut inner = self.inner.lock().await;
        let Some(event) = inner.events.get_mut(&id) else {
            return Ok(None);
        };

        // Evaluated under the same guard the admission writes hold, so a
        // racing reserve cannot slip between this check and the assignment.
        if let Some(capacity) = request.capacity {
            if capacity < event.current_attendees {
                return Err(GatherlyError::InvalidInput(format!(
                    "Capacity {} cannot be lowered below the {} current attendees",
                    capacity, event.current_attendees
                )));
            }
        }

        if let Some(title) = request.title {
            event.title = title;
        }
        if let Some(description) = request.description {
            event.description = description;
        }
        if let Some(event_date) = request.event_date {
            event.event_date = event_date;
        }
        if let Some(event_time) = request.event_time {
            event.event_time = event_time;
        }
        if let Some(location) = request.location {
            event.location = location;
        }
        if let Some(category) = request.category {
            event.category = category;
        }
        if let Some(capacity) = request.capacity {
            event.capacity = capacity;
        }
        if let Some(image_url) = request.image_url {
            event.image_url = image_url;
        }
        event.updated_at = Utc::now();

        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        Ok(inner.events.remove(&id).is_some())
    }

    async fn find_by_creator(&self, creator_id: i64) -> Result<Vec<Event>> {
        let inner = self.inner.lock().await;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.creator_id == creator_id)
            .cloned()
            .collect();
        sort_events(&mut events, EventSort::DateAsc);
        Ok(events)
    }

    async fn find_attending(&self, user_id: i64) -> Result<Vec<Event>> {
        let inner = self.inner.lock().await;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.is_attending(user_id))
            .cloned()
            .collect();
        sort_events(&mut events, EventSort::DateAsc);
        Ok(events)
    }

    async fn reserve_attendee(&self, event_id: i64, user_id: i64) -> Result<Option<Event>> {
        let mut inner = self.inner.lock().await;
        let Some(event) = inner.events.get_mut(&event_id) else {
            return Ok(None);
        };

        // Check and mutation happen under the same guard; both fields move
        // together or not at all.
        if event.is_attending(user_id) || event.current_attendees >= event.capacity {
            return Ok(None);
        }

        event.attendees.push(user_id);
        event.current_attendees += 1;
        event.updated_at = Utc::now();

        Ok(Some(event.clone()))
    }

    async fn release_attendee(&self, event_id: i64, user_id: i64) -> Result<Option<Event>> {
        let mut inner = self.inner.lock().await;
        let Some(event) = inner.events.get_mut(&event_id) else {
            return Ok(None);
        };

        let Some(pos) = event.attendees.iter().position(|&id| id == user_id) else {
            return Ok(None);
        };

        event.attendees.remove(pos);
        event.current_attendees -= 1;
        event.updated_at = Utc::now();

        Ok(Some(event.clone()))
    }

    async fn count(&self) -> Result<i64> {
        let inner = self.inner.lock().await;
        Ok(inner.events.len() as i64)
    }
}
