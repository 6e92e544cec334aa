//! Test data builders

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use gatherly::middleware::auth::Claims;
use gatherly::models::event::CreateEventRequest;

/// Secret shared between test tokens and the test router's validator.
pub const TEST_JWT_SECRET: &str = "gatherly-test-secret";

/// Build a valid event creation request
pub fn event_request(title: &str, capacity: i32) -> CreateEventRequest {
    CreateEventRequest {
        title: title.to_string(),
        description: format!("{title} description"),
        event_date: Utc::now() + Duration::days(7),
        event_time: "19:00".to_string(),
        location: "Community hall".to_string(),
        category: Some("Music".to_string()),
        capacity,
        image_url: None,
    }
}

/// Build an `Authorization` header value carrying a token for `user_id`
pub fn auth_header(user_id: i64) -> String {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to encode test token");

    format!("Bearer {token}")
}
