//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string (sessions)
//! - `SITE_BASE_URL` - Public URL for the site
//! - `SITE_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `SUPABASE_URL` - Supabase project URL (e.g., <https://xyz.supabase.co>)
//! - `SUPABASE_ANON_KEY` - Supabase anon API key
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g., production)
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.1)
//!
//! Secrets are checked against a placeholder blocklist and a Shannon
//! entropy floor so a copy-pasted `.env.example` fails at startup instead
//! of shipping.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as copied from a template, not generated.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-", "changeme", "replace", "placeholder", "example", "secret", "password", "xxx", "todo",
    "fixme", "insert", "enter-", "put-your", "add-your",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Everything the site binary reads from its environment.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Session database connection URL (contains the password)
    pub database_url: SecretString,
    /// Bind address
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Signing material for the session cookie
    pub session_secret: SecretString,
    /// Hosted menu store
    pub supabase: SupabaseConfig,
    /// Sentry DSN, absent in local development
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error event sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Supabase data store configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., <https://xyz.supabase.co>)
    pub project_url: String,
    /// Anon API key sent with every REST request
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("project_url", &self.project_url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` first so a local `.env` file works.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, fails to
    /// parse, or a secret fails the placeholder/entropy checks.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let session_secret = secret_var("SITE_SESSION_SECRET")?;
        check_session_secret_length(&session_secret)?;

        Ok(Self {
            database_url: database_url_var()?,
            host: parse_var("SITE_HOST", "127.0.0.1")?,
            port: parse_var("SITE_PORT", "3000")?,
            base_url: require_var("SITE_BASE_URL")?,
            session_secret,
            supabase: SupabaseConfig::from_env()?,
            sentry_dsn: optional_var("SENTRY_DSN"),
            sentry_environment: optional_var("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_var("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_var("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SupabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let project_url = require_var("SUPABASE_URL")?;
        validate_project_url(&project_url)?;

        Ok(Self {
            project_url,
            anon_key: secret_var("SUPABASE_ANON_KEY")?,
        })
    }
}

/// The project URL must be an absolute http(s) URL; everything the client
/// builds is joined onto it.
fn validate_project_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), reason);

    let parsed = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn require_var(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read and parse a variable, falling back to `default` when unset.
fn parse_var<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// `SITE_DATABASE_URL`, with `DATABASE_URL` as a fallback because that is
/// the name Fly.io's postgres attach writes.
fn database_url_var() -> Result<SecretString, ConfigError> {
    std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar("SITE_DATABASE_URL".to_string()))
}

/// Read a secret variable, rejecting placeholders and low-entropy values.
fn secret_var(key: &str) -> Result<SecretString, ConfigError> {
    let value = require_var(key)?;

    let lower = value.to_lowercase();
    if let Some(hit) = PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|p| lower.contains(*p))
    {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!("looks like a placeholder (contains '{hit}')"),
        ));
    }

    let entropy = shannon_entropy(&value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "entropy {entropy:.2} bits/char is below {MIN_ENTROPY_BITS_PER_CHAR}; \
                 generate a random value"
            ),
        ));
    }

    Ok(SecretString::from(value))
}

fn check_session_secret_length(secret: &SecretString) -> Result<(), ConfigError> {
    let len = secret.expose_secret().chars().count();
    if len < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            "SITE_SESSION_SECRET".to_string(),
            format!("need at least {MIN_SESSION_SECRET_LENGTH} characters, got {len}"),
        ));
    }
    Ok(())
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, f64> = HashMap::new();
    let mut total = 0.0;
    for c in s.chars() {
        *counts.entry(c).or_insert(0.0) += 1.0;
        total += 1.0;
    }

    counts
        .values()
        .map(|count| {
            let p = count / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_of_uniform_strings_is_zero() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!(shannon_entropy("aaaaaaa").abs() < f64::EPSILON);
    }

    #[test]
    fn test_entropy_of_two_even_symbols_is_one_bit() {
        assert!((shannon_entropy("abab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_entropy_of_random_material_clears_the_floor() {
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_secret_checks_catch_template_values() {
        for value in ["your-api-key-here", "changeme123", "my-secret-token"] {
            let lower = value.to_lowercase();
            assert!(
                PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(*p)),
                "{value} should be caught by the blocklist"
            );
        }
    }

    #[test]
    fn test_session_secret_length_floor() {
        let short = SecretString::from("tiny");
        assert!(matches!(
            check_session_secret_length(&short),
            Err(ConfigError::InsecureSecret(_, _))
        ));

        let long_enough = SecretString::from("q".repeat(MIN_SESSION_SECRET_LENGTH));
        assert!(check_session_secret_length(&long_enough).is_ok());
    }

    #[test]
    fn test_project_url_must_be_absolute_http() {
        assert!(validate_project_url("https://abc.supabase.co").is_ok());
        assert!(validate_project_url("http://127.0.0.1:54321").is_ok());
        assert!(validate_project_url("ftp://abc.supabase.co").is_err());
        assert!(validate_project_url("abc.supabase.co").is_err());
    }

    #[test]
    fn test_socket_addr_combines_host_and_port() {
        let config = SiteConfig {
            database_url: SecretString::from("postgres://localhost/hc"),
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            session_secret: SecretString::from("k".repeat(64)),
            supabase: SupabaseConfig {
                project_url: "https://abc.supabase.co".to_string(),
                anon_key: SecretString::from("anon-key"),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_supabase_debug_redacts_the_key() {
        let config = SupabaseConfig {
            project_url: "https://abc.supabase.co".to_string(),
            anon_key: SecretString::from("jwt-material-here"),
        };

        let rendered = format!("{config:?}");
        assert!(rendered.contains("abc.supabase.co"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("jwt-material-here"));
    }
}
