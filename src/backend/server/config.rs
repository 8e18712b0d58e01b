/**
 * Server Configuration
 *
 * This module loads the server configuration from the environment (after
 * reading `.env` through `dotenv`) and opens the optional PostgreSQL
 * connection.
 *
 * # Environment
 *
 * - `SERVER_PORT` - listening port (default 3000)
 * - `JWT_SECRET` - token signing secret (required)
 * - `DATABASE_URL` - PostgreSQL URL; unset means in-memory backends
 * - `CHAT_HISTORY_LIMIT` - default history page size (default 10)
 * - `OUTBOUND_BUFFER` - frames buffered per connection (default 64)
 * - `MAX_FRAME_BYTES` - largest accepted inbound frame (default 4096)
 * - `GLOBAL_QUEUE_CAPACITY` - global notification queue size (default 1000)
 * - `HEARTBEAT_INTERVAL_SECS` / `HEARTBEAT_TIMEOUT_SECS` - 0 disables (default 30 / 90)
 * - `HISTORY_TTL_DAYS` - conversation retention; unset keeps history forever
 *
 * # Error Handling
 *
 * Malformed values are configuration errors. A database that cannot be
 * reached is logged and the server continues with in-memory backends.
 */

use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;

use crate::shared::{ConfigError, RealtimeConfig};

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Database configuration result
///
/// Contains the database connection pool if successfully configured,
/// or `None` if the database is not available.
pub type DatabaseConfig = Option<PgPool>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listening port
    pub port: u16,
    /// Token signing secret
    pub jwt_secret: String,
    /// PostgreSQL URL, if configured
    pub database_url: Option<String>,
    /// Realtime core tunables
    pub realtime: RealtimeConfig,
}

impl ServerConfig {
    /// Configuration with default tunables and no database.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            port: DEFAULT_PORT,
            jwt_secret: jwt_secret.into(),
            database_url: None,
            realtime: RealtimeConfig::default(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingValue("JWT_SECRET"))?;

        let defaults = RealtimeConfig::default();
        let heartbeat_interval = parse_or(&lookup, "HEARTBEAT_INTERVAL_SECS", defaults.heartbeat_interval.as_secs())?;
        let heartbeat_timeout = parse_or(&lookup, "HEARTBEAT_TIMEOUT_SECS", defaults.heartbeat_timeout.as_secs())?;
        let history_ttl = parse_opt::<u64, _>(&lookup, "HISTORY_TTL_DAYS")?
            .map(|days| {
                days.checked_mul(SECS_PER_DAY).map(Duration::from_secs).ok_or_else(|| {
                    ConfigError::InvalidValue("HISTORY_TTL_DAYS", format!("{} days is out of range", days))
                })
            })
            .transpose()?;

        let realtime = RealtimeConfig::builder()
            .history_limit(parse_or(&lookup, "CHAT_HISTORY_LIMIT", defaults.history_limit)?)
            .outbound_buffer(parse_or(&lookup, "OUTBOUND_BUFFER", defaults.outbound_buffer)?)
            .max_frame_bytes(parse_or(&lookup, "MAX_FRAME_BYTES", defaults.max_frame_bytes)?)
            .global_queue_capacity(parse_or(&lookup, "GLOBAL_QUEUE_CAPACITY", defaults.global_queue_capacity)?)
            .heartbeat(Duration::from_secs(heartbeat_interval), Duration::from_secs(heartbeat_timeout))
            .history_ttl(history_ttl)
            .build()?;

        Ok(Self {
            port: parse_or(&lookup, "SERVER_PORT", DEFAULT_PORT)?,
            jwt_secret,
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            realtime,
        })
    }
}

fn parse_opt<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue(name, format!("'{}': {}", raw, e))),
    }
}

fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, name)?.unwrap_or(default))
}

/// Open the database connection pool and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if no URL is configured or the connection fails
pub async fn load_database(database_url: Option<&str>) -> DatabaseConfig {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Using in-memory conversation log, membership and profiles.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to in-memory backends.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
        }
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
