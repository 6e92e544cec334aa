//! Request middleware

pub mod auth;

pub use auth::{AuthUser, Claims, TokenValidator};
