//! RSVP admission control
//!
//! This service owns the one real correctness hazard in the system: keeping
//! `current_attendees` within capacity and equal to the attendee set size
//! while concurrent reserve/cancel requests race on the same event. It never
//! checks-then-acts against a prior read; both mutations go through the
//! store's conditional writes, and the follow-up read after a rejected
//! reserve exists only to pick an accurate error, never to drive a mutation.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::store::EventStore;
use crate::models::event::Event;
use crate::utils::errors::{GatherlyError, Result};
use crate::utils::logging;

/// Admission controller for event reservations
pub struct AdmissionService<S> {
    store: Arc<S>,
}

impl<S> Clone for AdmissionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EventStore> AdmissionService<S> {
    /// Create a new AdmissionService instance
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reserve a spot at an event for the given user.
    ///
    /// The store applies membership check, capacity check and both mutations
    /// as one indivisible write. A rejection here is final for this attempt;
    /// the caller may resubmit and be evaluated fresh against current state.
    pub async fn reserve(&self, event_id: i64, user_id: i64) -> Result<Event> {
        debug!(event_id = event_id, user_id = user_id, "Attempting reservation");

        if let Some(event) = self.store.reserve_attendee(event_id, user_id).await? {
            logging::log_admission(event_id, user_id, "reserve", "accepted");
            return Ok(event);
        }

        // The atomic update matched nothing. Re-read purely to disambiguate
        // the error; state may have moved on since the rejection, which is
        // fine because this read decides wording, not admission.
        let err = match self.store.find_by_id(event_id).await? {
            None => GatherlyError::EventNotFound { event_id },
            Some(event) if event.is_attending(user_id) => {
                GatherlyError::AlreadyReserved { event_id, user_id }
            }
            Some(event) if event.is_full() => GatherlyError::CapacityExceeded { event_id },
            Some(_) => {
                logging::log_admission_anomaly(event_id, user_id, "reserve");
                GatherlyError::AdmissionFailed { event_id }
            }
        };

        logging::log_admission(event_id, user_id, "reserve", err.code());
        Err(err)
    }

    /// Cancel the user's reservation at an event.
    pub async fn cancel(&self, event_id: i64, user_id: i64) -> Result<Event> {
        debug!(event_id = event_id, user_id = user_id, "Attempting cancellation");

        match self.store.release_attendee(event_id, user_id).await? {
            Some(event) => {
                logging::log_admission(event_id, user_id, "cancel", "accepted");
                Ok(event)
            }
            // Missing event and absent membership collapse into one outcome:
            // there is no reservation to cancel.
            None => {
                logging::log_admission(event_id, user_id, "cancel", "NOT_RESERVED");
                Err(GatherlyError::NotReserved { event_id, user_id })
            }
        }
    }

    /// Whether the user currently holds a reservation at the event.
    pub async fn check_reservation(&self, event_id: i64, user_id: i64) -> Result<bool> {
        let event = self
            .store
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        Ok(event.is_attending(user_id))
    }

    /// All events the user holds a reservation at, soonest first.
    pub async fn reservations_for_user(&self, user_id: i64) -> Result<Vec<Event>> {
        debug!(user_id = user_id, "Listing reservations for user");
        let events = self.store.find_attending(user_id).await?;
        info!(user_id = user_id, count = events.len(), "Reservations listed");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryEventStore;
    use crate::models::event::CreateEventRequest;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use futures::future::join_all;

    fn request(title: &str, capacity: i32) -> CreateEventRequest {
        CreateEventRequest {
            title: title.to_string(),
            description: "A test event".to_string(),
            event_date: Utc::now() + Duration::days(3),
            event_time: "20:00".to_string(),
            location: "Community center".to_string(),
            category: None,
            capacity,
            image_url: None,
        }
    }

    async fn setup(capacity: i32) -> (AdmissionService<MemoryEventStore>, Event) {
        let store = Arc::new(MemoryEventStore::new());
        let event = store.create(1, request("Admission", capacity)).await.unwrap();
        (AdmissionService::new(store), event)
    }

    #[tokio::test]
    async fn test_reserve_success_returns_updated_snapshot() {
        let (service, event) = setup(2).await;

        let updated = service.reserve(event.id, 42).await.unwrap();
        assert_eq!(updated.current_attendees, 1);
        assert!(updated.is_attending(42));
    }

    #[tokio::test]
    async fn test_second_reserve_by_same_user_is_rejected_without_state_change() {
        let (service, event) = setup(2).await;

        service.reserve(event.id, 42).await.unwrap();
        let err = service.reserve(event.id, 42).await.unwrap_err();
        assert_matches!(err, GatherlyError::AlreadyReserved { .. });

        let snapshot = service.store.find_by_id(event.id).await.unwrap().unwrap();
        assert_eq!(snapshot.current_attendees, 1);
    }

    #[tokio::test]
    async fn test_reserve_on_full_event_is_capacity_exceeded() {
        let (service, event) = setup(1).await;

        service.reserve(event.id, 42).await.unwrap();
        let err = service.reserve(event.id, 43).await.unwrap_err();
        assert_matches!(err, GatherlyError::CapacityExceeded { .. });
    }

    #[tokio::test]
    async fn test_reserve_on_missing_event_is_not_found() {
        let (service, _) = setup(1).await;
        let err = service.reserve(9999, 42).await.unwrap_err();
        assert_matches!(err, GatherlyError::EventNotFound { event_id: 9999 });
    }

    #[tokio::test]
    async fn test_cancel_without_reservation_is_not_reserved() {
        let (service, event) = setup(2).await;

        let err = service.cancel(event.id, 42).await.unwrap_err();
        assert_matches!(err, GatherlyError::NotReserved { .. });

        let err = service.cancel(9999, 42).await.unwrap_err();
        assert_matches!(err, GatherlyError::NotReserved { .. });
    }

    #[tokio::test]
    async fn test_reserve_then_cancel_round_trip() {
        let (service, event) = setup(2).await;

        let before = service.store.find_by_id(event.id).await.unwrap().unwrap();
        service.reserve(event.id, 42).await.unwrap();
        let after_cancel = service.cancel(event.id, 42).await.unwrap();

        assert_eq!(after_cancel.current_attendees, before.current_attendees);
        assert!(!after_cancel.is_attending(42));
    }

    #[tokio::test]
    async fn test_capacity_one_seat_handoff() {
        let (service, event) = setup(1).await;

        let snapshot = service.reserve(event.id, 100).await.unwrap();
        assert_eq!(snapshot.current_attendees, 1);

        let err = service.reserve(event.id, 200).await.unwrap_err();
        assert_matches!(err, GatherlyError::CapacityExceeded { .. });

        let snapshot = service.cancel(event.id, 100).await.unwrap();
        assert_eq!(snapshot.current_attendees, 0);

        let snapshot = service.reserve(event.id, 200).await.unwrap();
        assert_eq!(snapshot.current_attendees, 1);
        assert!(snapshot.is_attending(200));
    }

    #[tokio::test]
    async fn test_check_reservation() {
        let (service, event) = setup(2).await;

        assert!(!service.check_reservation(event.id, 42).await.unwrap());
        service.reserve(event.id, 42).await.unwrap();
        assert!(service.check_reservation(event.id, 42).await.unwrap());

        let err = service.check_reservation(9999, 42).await.unwrap_err();
        assert_matches!(err, GatherlyError::EventNotFound { .. });
    }

    #[tokio::test]
    async fn test_reservations_for_user_ordered_by_date() {
        let store = Arc::new(MemoryEventStore::new());
        let service = AdmissionService::new(Arc::clone(&store));

        let mut later = request("Later", 5);
        later.event_date = Utc::now() + Duration::days(10);
        let mut sooner = request("Sooner", 5);
        sooner.event_date = Utc::now() + Duration::days(2);

        let later = store.create(1, later).await.unwrap();
        let sooner = store.create(1, sooner).await.unwrap();

        service.reserve(later.id, 42).await.unwrap();
        service.reserve(sooner.id, 42).await.unwrap();
        service.reserve(later.id, 99).await.unwrap();

        let mine = service.reservations_for_user(42).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, sooner.id);
        assert_eq!(mine[1].id, later.id);
    }

    /// N concurrent reserves against capacity C: exactly C succeed, the rest
    /// fail with CapacityExceeded, and the final count equals C.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_reserves_never_oversubscribe() {
        const CAPACITY: i32 = 5;
        const CALLERS: i64 = 40;

        let (service, event) = setup(CAPACITY).await;

        let attempts = (1..=CALLERS).map(|user_id| {
            let service = service.clone();
            let event_id = event.id;
            tokio::spawn(async move { service.reserve(event_id, user_id).await })
        });

        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.expect("task panicked"))
            .collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, CAPACITY as usize);

        for result in &results {
            if let Err(err) = result {
                assert_matches!(err, GatherlyError::CapacityExceeded { .. });
            }
        }

        let snapshot = service.store.find_by_id(event.id).await.unwrap().unwrap();
        assert_eq!(snapshot.current_attendees, CAPACITY);
        assert_eq!(snapshot.attendees.len(), CAPACITY as usize);
    }

    /// Concurrent reserve/cancel churn on one event must keep the invariant
    /// after the dust settles.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_churn_keeps_count_consistent() {
        let (service, event) = setup(3).await;

        let tasks = (1..=20i64).map(|user_id| {
            let service = service.clone();
            let event_id = event.id;
            tokio::spawn(async move {
                for _ in 0..10 {
                    let _ = service.reserve(event_id, user_id).await;
                    let _ = service.cancel(event_id, user_id).await;
                }
            })
        });

        join_all(tasks).await;

        let snapshot = service.store.find_by_id(event.id).await.unwrap().unwrap();
        assert!(snapshot.current_attendees >= 0);
        assert!(snapshot.current_attendees <= snapshot.capacity);
        assert_eq!(
            snapshot.current_attendees as usize,
            snapshot.attendees.len()
        );
    }
}
