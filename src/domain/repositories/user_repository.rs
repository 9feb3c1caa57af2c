//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing user accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or username is already taken.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Looks up a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Changes a user's username.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist and
    /// [`AppError::Conflict`] if the username is taken by someone else.
    async fn update_username(&self, id: i64, username: &str) -> Result<User, AppError>;

    /// Lists users awaiting approval, oldest first.
    async fn list_pending(&self) -> Result<Vec<User>, AppError>;

    /// Lists every user, oldest first.
    async fn list_all(&self) -> Result<Vec<User>, AppError>;

    /// Marks a user as approved. Returns `None` if the username is unknown.
    async fn approve(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Grants the admin role. Returns `None` if the username is unknown.
    async fn promote_to_admin(&self, username: &str) -> Result<Option<User>, AppError>;
}
