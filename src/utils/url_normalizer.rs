//! Target URL validation and normalization.
//!
//! Every URL accepted by the shortener passes through [`normalize_url`] so that
//! only absolute `http`/`https` targets with a host are ever stored.

use url::Url;

/// Upper bound for stored target URLs.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,
}

/// Normalizes a target URL to a canonical form.
///
/// - Surrounding whitespace is trimmed
/// - Only `http` and `https` schemes are allowed
/// - Hostname is lowercased, default ports (80/443) and fragments are dropped
/// - Path and query are preserved as-is
///
/// # Errors
///
/// See [`UrlNormalizationError`].
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path#top").unwrap(),
///     "https://example.com/Path"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let input = input.trim();

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    // `Url` already lowercases special-scheme hosts while parsing.
    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    url.set_fragment(None);

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        // Cannot fail for http(s) URLs with a host.
        let _ = url.set_port(None);
    }

    Ok(url.to_string())
}
