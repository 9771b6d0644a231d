use dotenv::dotenv;
use std::env;
use std::time::Duration;

/// Configuration for the database
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Minimum pooled connections
    pub min_connections: u32,
    /// Drop derived tables and genesis data on startup
    pub reset_on_start: bool,
    /// Upper bound for any single store call
    pub store_timeout: Duration,
}

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Configuration for the health monitor
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Period between liveness ticks
    pub tick_interval: Duration,
    /// Block age beyond which the chain is considered unresponsive
    pub stale_block_after: Duration,
    /// Window in which an open incident of the same state is reused
    pub debounce_window: Duration,
    /// Trailing window used for recent block statistics
    pub stats_window: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(6),
            stale_block_after: Duration::from_secs(12),
            debounce_window: Duration::from_secs(60 * 60),
            stats_window: Duration::from_secs(60),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Health monitor configuration
    pub health: HealthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Ensure .env file is loaded
        dotenv().ok();

        let database_config = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| database_url_from_parts()),
            max_connections: parse_env("DB_POOL_MAX", 25),
            min_connections: parse_env("DB_POOL_MIN", 2),
            reset_on_start: env::var("DB_RESET")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            store_timeout: Duration::from_secs(parse_env("STORE_TIMEOUT_SECS", 5)),
        };

        let server_config = ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("SERVER_PORT", 8080),
        };

        let defaults = HealthConfig::default();
        let health_config = HealthConfig {
            tick_interval: Duration::from_secs(parse_env(
                "HEALTH_TICK_INTERVAL_SECS",
                defaults.tick_interval.as_secs(),
            )),
            stale_block_after: Duration::from_secs(parse_env(
                "HEALTH_STALE_BLOCK_SECS",
                defaults.stale_block_after.as_secs(),
            )),
            debounce_window: Duration::from_secs(parse_env(
                "HEALTH_DEBOUNCE_SECS",
                defaults.debounce_window.as_secs(),
            )),
            stats_window: defaults.stats_window,
        };

        Self {
            database: database_config,
            server: server_config,
            health: health_config,
        }
    }

    /// Returns formatted server address string (host:port)
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Assemble a postgres URL from the individual `DB_*` variables
fn database_url_from_parts() -> String {
    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
    let user = env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string());
    let password = env::var("DB_PASSWORD").unwrap_or_else(|_| "postgres".to_string());
    let name = env::var("DB_NAME").unwrap_or_else(|_| "nuklaivm".to_string());
    let ssl_mode = env::var("DB_SSL_MODE").unwrap_or_else(|_| "disable".to_string());

    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        user,
        escape_password(&password),
        host,
        port,
        name,
        ssl_mode
    )
}

/// Percent-encode the characters that would break URL parsing
fn escape_password(password: &str) -> String {
    password
        .chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => c.to_string(),
            other => {
                let mut buf = [0u8; 4];
                other
                    .encode_utf8(&mut buf)
                    .bytes()
                    .map(|b| format!("%{:02X}", b))
                    .collect()
            }
        })
        .collect()
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_escaping() {
        assert_eq!(escape_password("plain"), "plain");
        assert_eq!(escape_password("p@ss:w/rd"), "p%40ss%3Aw%2Frd");
    }

    #[test]
    fn test_health_defaults() {
        let health = HealthConfig::default();
        assert_eq!(health.tick_interval, Duration::from_secs(6));
        assert_eq!(health.stale_block_after, Duration::from_secs(12));
        assert_eq!(health.debounce_window, Duration::from_secs(3600));
    }
}
