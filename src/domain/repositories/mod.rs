//! Repository trait definitions for the domain layer.
//!
//! Traits define the data contracts; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Accounts, approval and roles
//! - [`ShortUrlRepository`] - Short URL CRUD operations
//! - [`ClickRepository`] - Click recording and retrieval
//!
//! # Testing
//!
//! See `tests/repository_pg.rs` for PostgreSQL-backed checks.

pub mod click_repository;
pub mod short_url_repository;
pub mod user_repository;

pub use click_repository::ClickRepository;
pub use short_url_repository::ShortUrlRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
