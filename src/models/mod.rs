//! Data models

pub mod event;

pub use event::{
    CreateEventRequest, Event, EventFilter, EventSort, UpdateEventRequest, DEFAULT_CATEGORY,
};
