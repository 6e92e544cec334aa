//! Shared test helpers

pub mod database_helper;
pub mod test_data;

#[allow(unused_imports)]
pub use database_helper::TestDatabase;
#[allow(unused_imports)]
pub use test_data::{auth_header, event_request, TEST_JWT_SECRET};
