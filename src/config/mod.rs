use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// bcrypt accepts work factors in this range
pub const MIN_PASSWORD_COST: u32 = 4;
pub const MAX_PASSWORD_COST: u32 = 31;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string, e.g. `sqlite://data.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub create_if_missing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub bind_address: String,
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// bcrypt work factor applied when hashing analyst passwords
    pub password_cost: u32,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_CREATE_IF_MISSING") {
            self.database.create_if_missing = v.parse().unwrap_or(self.database.create_if_missing);
        }

        // API overrides
        if let Ok(v) = env::var("API_BIND_ADDRESS") {
            self.api.bind_address = v;
        }
        if let Some(port) = env::var("PROPOSAL_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_PASSWORD_COST") {
            self.security.password_cost = v
                .parse()
                .ok()
                .filter(|cost| (MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(cost))
                .unwrap_or(self.security.password_cost);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite://data.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
                create_if_missing: true,
            },
            api: ApiConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                password_cost: 10,
                enable_cors: true,
                cors_origins: vec![],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: "sqlite://data.db".to_string(),
                max_connections: 10,
                connection_timeout: 10,
                create_if_missing: true,
            },
            api: ApiConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                password_cost: 10,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "sqlite://data.db".to_string(),
                max_connections: 10,
                connection_timeout: 5,
                create_if_missing: false,
            },
            api: ApiConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                password_cost: 12,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    /// In-memory database and the cheapest hash cost, for tests.
    pub fn testing() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                connection_timeout: 5,
                create_if_missing: true,
            },
            api: ApiConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 0,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                password_cost: MIN_PASSWORD_COST,
                enable_cors: false,
                cors_origins: vec![],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
