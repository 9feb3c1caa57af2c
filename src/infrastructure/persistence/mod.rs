//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User accounts in PostgreSQL
//! - [`PgShortUrlRepository`] - Short URL storage and retrieval
//! - [`PgClickRepository`] - Click recording and aggregates

pub mod pg_click_repository;
pub mod pg_short_url_repository;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_short_url_repository::PgShortUrlRepository;
pub use pg_user_repository::PgUserRepository;
