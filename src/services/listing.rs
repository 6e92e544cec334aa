//! Event listing and search
//!
//! Pure reads over the event store: free-text search on title/description,
//! exact category match, and one of three sort orders. No invariant risk.

use std::sync::Arc;

use tracing::debug;

use crate::database::store::EventStore;
use crate::models::event::{Event, EventFilter, EventSort};
use crate::utils::errors::Result;

pub struct ListingService<S> {
    store: Arc<S>,
}

impl<S> Clone for ListingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EventStore> ListingService<S> {
    /// Create a new ListingService instance
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List events matching the filter in the requested order. A category
    /// of "All" (the UI's catch-all tab) means no category filter, and
    /// blank search strings are ignored.
    pub async fn list_events(&self, filter: EventFilter, sort: EventSort) -> Result<Vec<Event>> {
        let filter = normalize_filter(filter);
        debug!(
            search = filter.search.as_deref(),
            category = filter.category.as_deref(),
            "Listing events"
        );

        self.store.find_many(&filter, sort).await
    }
}

fn normalize_filter(filter: EventFilter) -> EventFilter {
    let search = filter
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let category = filter
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && c != "All");

    EventFilter { search, category }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryEventStore;
    use crate::models::event::CreateEventRequest;
    use chrono::{Duration, Utc};

    fn request(title: &str, category: &str, capacity: i32, days_out: i64) -> CreateEventRequest {
        CreateEventRequest {
            title: title.to_string(),
            description: format!("{title} description"),
            event_date: Utc::now() + Duration::days(days_out),
            event_time: "19:00".to_string(),
            location: "Downtown".to_string(),
            category: Some(category.to_string()),
            capacity,
            image_url: None,
        }
    }

    async fn seeded_service() -> ListingService<MemoryEventStore> {
        let store = Arc::new(MemoryEventStore::new());
        store.create(1, request("Jazz night", "Music", 80, 5)).await.unwrap();
        store.create(1, request("Rust meetup", "Tech", 120, 2)).await.unwrap();
        store.create(2, request("Morning run", "Sports", 30, 9)).await.unwrap();
        ListingService::new(store)
    }

    #[tokio::test]
    async fn test_default_listing_is_date_ascending() {
        let service = seeded_service().await;
        let events = service
            .list_events(EventFilter::default(), EventSort::DateAsc)
            .await
            .unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].title, "Rust meetup");
        assert_eq!(events[2].title, "Morning run");
    }

    #[tokio::test]
    async fn test_category_all_means_no_filter() {
        let service = seeded_service().await;
        let filter = EventFilter {
            search: None,
            category: Some("All".to_string()),
        };
        let events = service.list_events(filter, EventSort::DateAsc).await.unwrap();
        assert_eq!(events.len(), 3);
    }

    #[tokio::test]
    async fn test_category_and_search_filters() {
        let service = seeded_service().await;

        let filter = EventFilter {
            search: None,
            category: Some("Music".to_string()),
        };
        let events = service.list_events(filter, EventSort::DateAsc).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Jazz night");

        let filter = EventFilter {
            search: Some("  meetup ".to_string()),
            category: None,
        };
        let events = service.list_events(filter, EventSort::DateAsc).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Rust meetup");
    }

    #[tokio::test]
    async fn test_capacity_sort_is_descending() {
        let service = seeded_service().await;
        let events = service
            .list_events(EventFilter::default(), EventSort::CapacityDesc)
            .await
            .unwrap();
        assert_eq!(events[0].capacity, 120);
        assert_eq!(events[2].capacity, 30);
    }
}
