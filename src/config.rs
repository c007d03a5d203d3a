use std::env;
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub request_timeout: Duration,
    pub database: DatabaseConfig,
    pub environment: Environment,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a valid number of seconds")?;

        let database = DatabaseConfig::from_env()?;

        let environment = Environment::parse(&env::var("ENV").unwrap_or_else(|_| "local".to_string()));

        let config = Config {
            port,
            request_timeout: Duration::from_secs(request_timeout_secs),
            database,
            environment,
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        self.database.validate()
    }
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatabaseConfig {
            path: path.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("DATABASE_URL") {
            Ok(url) => Self::from_connection_string(&url)?,
            Err(_) => Self::new(env::var("DATABASE_PATH").unwrap_or_else(|_| "hits.db".to_string())),
        };

        if let Ok(value) = env::var("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = value
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?;
        }

        if let Ok(value) = env::var("DATABASE_BUSY_TIMEOUT") {
            let secs = value
                .parse::<u64>()
                .context("DATABASE_BUSY_TIMEOUT must be a valid number of seconds")?;
            config.busy_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Accepts `sqlite://hits.db`, `sqlite:hits.db` and `sqlite:///var/lib/hits.db`.
    /// Query parameters are ignored apart from `mode=memory`, which is rejected;
    /// pool settings come from their own variables.
    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        let rest = connection_string
            .strip_prefix("sqlite://")
            .or_else(|| connection_string.strip_prefix("sqlite:"))
            .context("DATABASE_URL must start with 'sqlite://' or 'sqlite:'")?;

        let (path, params) = rest.split_once('?').unwrap_or((rest, ""));
        if path.trim().is_empty() {
            anyhow::bail!("Invalid DATABASE_URL format - missing database file");
        }

        if params.split('&').any(|param| param == "mode=memory") {
            anyhow::bail!("DATABASE_URL must name a database file, not an in-memory database");
        }

        let config = Self::new(path);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        // Every pooled connection would get its own private in-memory database
        if self.is_in_memory() {
            anyhow::bail!("Database path must be a file, not an in-memory database");
        }

        if self.max_connections == 0 {
            anyhow::bail!("Max connections must be greater than 0");
        }

        if self.busy_timeout.is_zero() {
            anyhow::bail!("Busy timeout must be greater than 0");
        }

        Ok(())
    }

    fn is_in_memory(&self) -> bool {
        let path = self.path.to_string_lossy();
        path == ":memory:" || path.starts_with("file::memory:")
    }
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value {
            "production" | "prod" => Environment::Production,
            _ => Environment::Local,
        }
    }
}
