//! Database module
//!
//! This module handles database connections and the event store.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabaseConfig, DatabasePool};
pub use memory::MemoryEventStore;
pub use repositories::EventRepository;
pub use store::EventStore;
