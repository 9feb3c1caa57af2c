//! Signup, login and bearer-token verification.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::entities::{NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{PasswordError, hash_password, verify_password};

/// JWT payload. `sub` carries the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity resolved from a bearer token, attached to each protected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Settings for token issuing and account creation.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    pub auto_approve_users: bool,
}

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Service issuing and validating HS256 tokens for registered users.
///
/// Tokens are stateless: there is no revocation list, but every request
/// re-reads the user so that unapproved accounts lose access immediately.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_seconds: i64,
    auto_approve_users: bool,
}

fn invalid_credentials() -> AppError {
    AppError::forbidden("Invalid email or password", json!({}))
}

fn password_error(e: PasswordError) -> AppError {
    AppError::internal("Password processing failed", json!({ "reason": e.to_string() }))
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>, settings: AuthSettings) -> Self {
        Self {
            users,
            clock,
            encoding_key: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            token_ttl_seconds: i64::try_from(settings.token_ttl_seconds).unwrap_or(i64::MAX),
            auto_approve_users: settings.auto_approve_users,
        }
    }

    /// Registers a new account with role `USER`.
    ///
    /// The account is approved immediately when auto-approval is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or username is taken.
    pub async fn signup(&self, input: SignupInput) -> Result<User, AppError> {
        let email = input.email.trim().to_string();
        let username = input.username.trim().to_string();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email is already registered",
                json!({ "field": "email" }),
            ));
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict(
                "Username is already taken",
                json!({ "field": "username" }),
            ));
        }

        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::internal("Password hashing task failed", json!({ "reason": e.to_string() })))?
            .map_err(password_error)?;

        let user = self
            .users
            .create(NewUser {
                email,
                username,
                password_hash,
                role: Role::User,
                approved: self.auto_approve_users,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(user_id = user.id, approved = user.approved, "User registered");
        Ok(user)
    }

    /// Checks credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for an unknown email, a wrong password,
    /// or an account that has not been approved yet.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid_credentials)?;

        let candidate = password.to_string();
        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
            .await
            .map_err(|e| AppError::internal("Password check task failed", json!({ "reason": e.to_string() })))?
            .map_err(password_error)?;

        if !matches {
            return Err(invalid_credentials());
        }

        if !user.approved {
            return Err(AppError::forbidden(
                "Account is pending approval",
                json!({ "username": user.username }),
            ));
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Creates a signed token for a user, valid for the configured TTL.
    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let iat = self.clock.now().timestamp();
        let claims = Claims {
            sub: user.email.clone(),
            iat,
            exp: iat.saturating_add(self.token_ttl_seconds),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal("Failed to sign token", json!({ "reason": e.to_string() }))
        })
    }

    /// Verifies the signature and expiry of a token.
    ///
    /// Expiry is checked against the injected clock.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] for malformed, tampered or expired tokens.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                AppError::unauthenticated("Invalid token", json!({ "reason": e.to_string() }))
            })?
            .claims;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(AppError::unauthenticated("Token expired", json!({})));
        }

        Ok(claims)
    }

    /// Resolves a bearer token to the identity of an approved user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] if the token is invalid or its
    /// user no longer exists, and [`AppError::Forbidden`] if the user is not
    /// approved.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let claims = self.verify_token(token)?;

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Unknown user", json!({})))?;

        if !user.approved {
            return Err(AppError::forbidden("Account is pending approval", json!({})));
        }

        Ok(AuthUser::from(&user))
    }
}
