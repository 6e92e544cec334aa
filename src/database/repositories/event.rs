//! Postgres event store implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::store::EventStore;
use crate::models::event::{
    CreateEventRequest, Event, EventFilter, EventSort, UpdateEventRequest, DEFAULT_CATEGORY,
};
use crate::utils::errors::{GatherlyError, Result};

const EVENT_COLUMNS: &str = "id, title, description, event_date, event_time, location, category, capacity, image_url, creator_id, attendees, current_attendees, created_at, updated_at";

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes `LIKE` metacharacters so a search term matches literally,
/// the way the in-memory store's substring match does.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl EventStore for EventRepository {
    async fn create(&self, creator_id: i64, request: CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, event_date, event_time, location, category, capacity, image_url, creator_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.event_time)
        .bind(request.location)
        .bind(request.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()))
        .bind(request.capacity)
        .bind(request.image_url.unwrap_or_default())
        .bind(creator_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_many(&self, filter: &EventFilter, sort: EventSort) -> Result<Vec<Event>> {
        let order_clause = match sort {
            EventSort::DateAsc => "event_date ASC, id ASC",
            EventSort::CreatedDesc => "created_at DESC, id DESC",
            EventSort::CapacityDesc => "capacity DESC, id ASC",
        };

        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE ($1::TEXT IS NULL OR title ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR category = $2)
            ORDER BY {order_clause}
            "#
        ))
        .bind(filter.search.as_deref().map(escape_like))
        .bind(filter.category.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn update_metadata(&self, id: i64, request: UpdateEventRequest) -> Result<Option<Event>> {
        // A capacity change is conditioned on still covering the attendee
        // count at commit time, re-evaluated under the row lock like the
        // admission writes. A reserve racing this update cannot leave
        // current_attendees above capacity.
        let capacity = request.capacity;
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                event_time = COALESCE($5, event_time),
                location = COALESCE($6, location),
                category = COALESCE($7, category),
                capacity = COALESCE($8, capacity),
                image_url = COALESCE($9, image_url),
                updated_at = $10
            WHERE id = $1
              AND COALESCE($8, capacity) >= current_attendees
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.event_time)
        .bind(request.location)
        .bind(request.category)
        .bind(request.capacity)
        .bind(request.image_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(event) = event {
            return Ok(Some(event));
        }

        // No row matched. Re-read only to pick the right error; this read
        // never drives a mutation.
        match self.find_by_id(id).await? {
            None => Ok(None),
            Some(existing) => Err(GatherlyError::InvalidInput(format!(
                "Capacity {} cannot be lowered below the {} current attendees",
                capacity.unwrap_or(existing.capacity),
                existing.current_attendees
            ))),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_creator(&self, creator_id: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE creator_id = $1 ORDER BY event_date ASC, id ASC"
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn find_attending(&self, user_id: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE attendees @> ARRAY[$1::BIGINT] ORDER BY event_date ASC, id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn reserve_attendee(&self, event_id: i64, user_id: i64) -> Result<Option<Event>> {
        // The precondition is part of the write itself: membership and the
        // capacity check are re-evaluated under the row lock at commit time,
        // and both fields move together in one statement. A concurrent
        // reserve on the same event serializes behind this UPDATE.
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET attendees = array_append(attendees, $2),
                current_attendees = current_attendees + 1,
                updated_at = NOW()
            WHERE id = $1
              AND NOT (attendees @> ARRAY[$2::BIGINT])
              AND current_attendees < capacity
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn release_attendee(&self, event_id: i64, user_id: i64) -> Result<Option<Event>> {
        // Decrement is conditioned on membership, so the count cannot go
        // negative even under concurrent cancels.
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET attendees = array_remove(attendees, $2),
                current_attendees = current_attendees - 1,
                updated_at = NOW()
            WHERE id = $1
              AND attendees @> ARRAY[$2::BIGINT]
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
