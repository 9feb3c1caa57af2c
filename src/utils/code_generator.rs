//! Short code generation and validation utilities.
//!
//! Generated codes are 6 alphanumeric characters drawn from the thread-local
//! CSPRNG. Uniqueness is not guaranteed here; callers check the store and
//! retry on collision (see [`crate::application::services::UrlService`]).

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated short codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

const CUSTOM_CODE_MIN_LENGTH: usize = 3;
const CUSTOM_CODE_MAX_LENGTH: usize = 32;

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid custom code pattern"));

/// Codes that would shadow API routes mounted next to `GET /{code}`.
const RESERVED_CODES: &[&str] = &["auth", "url", "analytics", "user", "health", "api", "admin"];

/// Whether `code` collides with a route name, case-insensitively.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// Source of candidate short codes.
///
/// Injected into [`crate::application::services::UrlService`] so collision
/// handling can be exercised deterministically in tests.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random alphanumeric code generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random 6-character alphanumeric short code.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Validates a caller-supplied custom short code.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route name (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < CUSTOM_CODE_MIN_LENGTH || code.len() > CUSTOM_CODE_MAX_LENGTH {
        return Err(AppError::bad_request(
            "Custom code must be 3-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if is_reserved(code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
