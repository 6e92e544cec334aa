//! Utility modules

pub mod errors;
pub mod logging;
pub mod response;

pub use errors::{GatherlyError, Result};
