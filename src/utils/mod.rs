//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`url_normalizer`] - Target URL validation and normalization
//! - [`client_ip`] - Client address resolution from proxy headers
//! - [`password`] - Argon2id password hashing

pub mod client_ip;
pub mod code_generator;
pub mod password;
pub mod url_normalizer;
