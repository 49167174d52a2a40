//! Discovery configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_BASE_URL` - Base URL of the catalog backend
//!   (e.g., <https://api.weftwear.example>)
//!
//! ## Optional
//! - `CATALOG_API_TOKEN` - Bearer token for the catalog API
//! - `CATALOG_PER_PAGE` - Default page size (default: 20)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Response cache TTL in seconds (default: 300)

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use weftwear_core::filter::DEFAULT_PER_PAGE;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Product discovery configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct DiscoveryConfig {
    /// Base URL of the catalog backend, without a trailing slash.
    pub base_url: String,
    /// Bearer token for the catalog API, if the backend requires one.
    pub api_token: Option<SecretString>,
    /// Default page size for product listings.
    pub per_page: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// TTL for cached catalog responses, in seconds.
    pub cache_ttl_secs: u64,
}

impl std::fmt::Debug for DiscoveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("per_page", &self.per_page)
            .field("timeout_secs", &self.timeout_secs)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}

impl DiscoveryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API token fails validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("CATALOG_API_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        let api_token = match get_optional_env("CATALOG_API_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "CATALOG_API_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };
        let per_page = parse_env_or_default("CATALOG_PER_PAGE", DEFAULT_PER_PAGE)?;
        let timeout_secs = parse_env_or_default("CATALOG_TIMEOUT_SECS", 10)?;
        let cache_ttl_secs = parse_env_or_default("CATALOG_CACHE_TTL_SECS", 300)?;

        Ok(Self {
            base_url,
            api_token,
            per_page,
            timeout_secs,
            cache_ttl_secs,
        })
    }

    /// The token value to send in the `Authorization` header, if configured.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.api_token
            .as_ref()
            .map(|token| token.expose_secret().to_string())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an environment variable with a default value.
fn parse_env_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API tokens have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}
