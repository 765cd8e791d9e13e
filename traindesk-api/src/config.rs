/// Configuration management for the API server
///
/// Configuration is read once at startup into an immutable [`Config`] that
/// is shared through the application state. A `.env` file is loaded first
/// when present.
///
/// # Environment Variables
///
/// - `HTTP_HOST`: Host to bind to (default: 0.0.0.0)
/// - `HTTP_PORT`: Port to bind to (default: 8080)
/// - `REQUEST_TIMEOUT_SECONDS`: Per-request deadline (default: 30)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `DATABASE_URL`: PostgreSQL connection string; when unset it is built
///   from `DB_HOST` (default localhost), `DB_PORT` (default 5432), `DB_USER`,
///   `DB_PASSWORD` and `DB_NAME`
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Token signing secret (required, at least 32 characters)
/// - `SMTP_HOST`: Enables SMTP delivery; then `SMTP_PORT` (default 587),
///   `SMTP_USERNAME`, `SMTP_PASSWORD` and `SMTP_FROM_ADDRESS` are required
///
/// # Example
///
/// ```no_run
/// use traindesk_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::{anyhow, bail, Context};
use std::{env, str::FromStr, time::Duration};
use traindesk_shared::mail::SmtpSettings;
use urlencoding::encode;

/// Minimum accepted `JWT_SECRET` length
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Placeholder secrets that must never reach a running server
const DEV_DEFAULT_SECRETS: &[&str] = &[
    "dev-secret-key",
    "very-secret-key",
    "secret",
    "changeme",
    "your-secret-key-change-in-production",
    "change-this-to-a-long-random-secret-value",
];

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// SMTP relay, `None` when verification mail is only logged
    pub smtp: Option<SmtpSettings>,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Requests running longer than this are answered with 503
    pub request_timeout_seconds: u64,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig").field("secret", &"<redacted>").finish()
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value does not
    /// parse, or `JWT_SECRET` is too short or a known placeholder.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api = ApiConfig {
            host: get("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "HTTP_PORT", 8080)?,
            request_timeout_seconds: parse_or(&get, "REQUEST_TIMEOUT_SECONDS", 30)?,
            cors_origins: get("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["*".to_string()]),
        };

        if api.request_timeout_seconds == 0 {
            bail!("REQUEST_TIMEOUT_SECONDS must be greater than zero");
        }

        let url = match get("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&get)?,
        };

        let database = DatabaseConfig {
            url,
            max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
        };

        let secret = get("JWT_SECRET")
            .ok_or_else(|| anyhow!("JWT_SECRET environment variable is required"))?;
        validate_jwt_secret(&secret)?;

        let smtp = match get("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host,
                port: parse_or(&get, "SMTP_PORT", 587)?,
                username: require(&get, "SMTP_USERNAME", "SMTP_HOST is set")?,
                password: require(&get, "SMTP_PASSWORD", "SMTP_HOST is set")?,
                from_address: require(&get, "SMTP_FROM_ADDRESS", "SMTP_HOST is set")?,
            }),
            None => None,
        };

        Ok(Self {
            api,
            database,
            jwt: JwtConfig { secret },
            smtp,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Per-request deadline
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_seconds)
    }
}

/// Rejects secrets that are too short or known placeholders
pub fn validate_jwt_secret(secret: &str) -> anyhow::Result<()> {
    if DEV_DEFAULT_SECRETS
        .iter()
        .any(|d| d.eq_ignore_ascii_case(secret.trim()))
    {
        bail!("JWT_SECRET is set to a known development default; configure a real secret");
    }

    if secret.chars().count() < MIN_JWT_SECRET_LENGTH {
        bail!(
            "JWT_SECRET must be at least {} characters long",
            MIN_JWT_SECRET_LENGTH
        );
    }

    Ok(())
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

fn require<G>(get: &G, key: &str, reason: &str) -> anyhow::Result<String>
where
    G: Fn(&str) -> Option<String>,
{
    get(key).ok_or_else(|| anyhow!("{} is required when {}", key, reason))
}

fn database_url_from_parts<G>(get: &G) -> anyhow::Result<String>
where
    G: Fn(&str) -> Option<String>,
{
    let reason = "DATABASE_URL is not set";
    let host = get("DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port: u16 = parse_or(get, "DB_PORT", 5432)?;
    let user = require(get, "DB_USER", reason)?;
    let name = require(get, "DB_NAME", reason)?;

    let credentials = match get("DB_PASSWORD") {
        Some(password) => format!("{}:{}", encode(&user), encode(&password)),
        None => encode(&user).into_owned(),
    };

    Ok(format!(
        "postgres://{}@{}:{}/{}",
        credentials,
        host,
        port,
        encode(&name)
    ))
}
