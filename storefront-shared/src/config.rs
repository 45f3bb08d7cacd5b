/// Configuration management shared by the API server and the worker
///
/// Configuration is layered, lowest precedence first:
///
/// 1. Built-in defaults
/// 2. `config.yaml` in the working directory (optional)
/// 3. Environment variables (a `.env` file is loaded first when present)
///
/// # Environment Variables
///
/// - `APP_SERVER_HOST` / `APP_SERVER_PORT`: HTTP bind address (default: 0.0.0.0:8080)
/// - `APP_SERVER_REQUEST_TIMEOUT_SECONDS` / `APP_SERVER_SHUTDOWN_TIMEOUT_SECONDS` (default: 15 / 10)
/// - `APP_DATABASE_HOST`, `APP_DATABASE_PORT`, `APP_DATABASE_NAME`,
///   `APP_DATABASE_USER`, `APP_DATABASE_PASSWORD`, `APP_DATABASE_SSLMODE`
/// - `APP_DATABASE_MAX_CONNECTIONS` / `APP_DATABASE_MIN_CONNECTIONS`: pool bounds
/// - `APP_REDIS_HOST` / `APP_REDIS_PORT`, `APP_RABBITMQ_HOST` / `APP_RABBITMQ_PORT`
///
/// # Example
///
/// ```no_run
/// use storefront_shared::config::Config;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::load()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::str::FromStr;

/// Name of the optional configuration file (extension resolved by the `config` crate)
const CONFIG_FILE: &str = "config";

/// Explicit environment bindings: (config key, environment variable)
const ENV_BINDINGS: &[(&str, &str)] = &[
    ("server.host", "APP_SERVER_HOST"),
    ("server.port", "APP_SERVER_PORT"),
    ("server.request_timeout_seconds", "APP_SERVER_REQUEST_TIMEOUT_SECONDS"),
    ("server.shutdown_timeout_seconds", "APP_SERVER_SHUTDOWN_TIMEOUT_SECONDS"),
    ("database.host", "APP_DATABASE_HOST"),
    ("database.port", "APP_DATABASE_PORT"),
    ("database.name", "APP_DATABASE_NAME"),
    ("database.user", "APP_DATABASE_USER"),
    ("database.password", "APP_DATABASE_PASSWORD"),
    ("database.sslmode", "APP_DATABASE_SSLMODE"),
    ("database.max_connections", "APP_DATABASE_MAX_CONNECTIONS"),
    ("database.min_connections", "APP_DATABASE_MIN_CONNECTIONS"),
    ("redis.host", "APP_REDIS_HOST"),
    ("redis.port", "APP_REDIS_PORT"),
    ("rabbitmq.host", "APP_RABBITMQ_HOST"),
    ("rabbitmq.port", "APP_RABBITMQ_PORT"),
];

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or a value could not be deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable
    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Cache endpoint (declared, not consumed)
    pub redis: EndpointConfig,

    /// Message broker endpoint (declared, not consumed)
    pub rabbitmq: EndpointConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Upper bound on handling a single request
    pub request_timeout_seconds: u64,

    /// How long in-flight requests may drain after a shutdown signal
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_seconds: 15,
            shutdown_timeout_seconds: 10,
        }
    }
}

/// Database connection and pool configuration
///
/// All timeouts are specified in seconds for ease of configuration from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,

    /// Logical database name; created on startup if missing
    pub name: String,

    pub user: String,

    #[serde(skip_serializing)]
    pub password: String,

    /// libpq-style SSL mode (disable, allow, prefer, require, verify-ca, verify-full)
    pub sslmode: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections to keep open
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool
    pub connect_timeout_seconds: u64,

    /// How long a connection can remain idle before being closed
    pub idle_timeout_seconds: Option<u64>,

    /// Maximum lifetime of a connection before forced recycling
    pub max_lifetime_seconds: Option<u64>,

    /// Whether to ping connections before handing them out
    pub test_before_acquire: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "storefront".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            sslmode: "disable".to_string(),
            max_connections: 100,
            min_connections: 10,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(3600),
            test_before_acquire: true,
        }
    }
}

/// Host/port pair for auxiliary services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Loads configuration from defaults, `config.yaml` and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be parsed
    /// - A value has the wrong type (e.g. a non-numeric port)
    /// - `database.sslmode` is not a recognized mode
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false));

        for (key, var) in ENV_BINDINGS {
            builder = builder.set_override_option(*key, env::var(var).ok())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            bind_address = %config.bind_address(),
            database = %config.database.name,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.ssl_mode()?;

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "server.request_timeout_seconds",
                message: "must be greater than zero".to_string(),
            });
        }

        if self.database.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database.name",
                message: "must not be empty".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                key: "database.min_connections",
                message: format!(
                    "{} exceeds max_connections ({})",
                    self.database.min_connections, self.database.max_connections
                ),
            });
        }

        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    /// Parses the configured SSL mode
    pub fn ssl_mode(&self) -> Result<PgSslMode, ConfigError> {
        PgSslMode::from_str(&self.sslmode).map_err(|e| ConfigError::Invalid {
            key: "database.sslmode",
            message: e.to_string(),
        })
    }

    /// Connect options for the application database
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        Ok(self.server_options()?.database(&self.name))
    }

    /// Connect options for the `postgres` maintenance database on the same server
    ///
    /// Used to check for (and create) the application database before connecting to it.
    pub fn maintenance_options(&self) -> Result<PgConnectOptions, ConfigError> {
        Ok(self.server_options()?.database("postgres"))
    }

    fn server_options(&self) -> Result<PgConnectOptions, ConfigError> {
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(self.ssl_mode()?))
    }
}
