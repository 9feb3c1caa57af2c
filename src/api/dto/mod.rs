//! Data Transfer Objects for API requests and responses.
//!
//! Request and response bodies use camelCase field names. Input validation
//! goes through `validator`.

pub mod analytics;
pub mod auth;
pub mod health;
pub mod profile;
pub mod url;
