//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the interfaces the domain and application
//! layers depend on.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`geo`] - IP geolocation providers
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod geo;
pub mod persistence;
