//! Core domain entities.
//!
//! Entities are plain data structures without persistence concerns. Each
//! entity has a `New*` counterpart used for inserts.
//!
//! - [`User`] - A registered account
//! - [`ShortUrl`] - A short code mapping owned by a user
//! - [`Click`] - A recorded redirect visit

pub mod click;
pub mod short_url;
pub mod user;

pub use click::{Click, NewClick};
pub use short_url::{NewShortUrl, ShortUrl, ShortUrlWithClicks};
pub use user::{NewUser, Role, User};
