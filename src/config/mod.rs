use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    /// Drop and recreate the drinks table on boot. Destructive, so it must be
    /// opted into explicitly via DATABASE_RECREATE_ON_BOOT.
    pub recreate_on_boot: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("DRINKS_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

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
        if let Ok(v) = env::var("DATABASE_RECREATE_ON_BOOT") {
            self.database.recreate_on_boot = v.parse().unwrap_or(self.database.recreate_on_boot);
        }

        // Auth overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.auth.jwt_issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.auth.jwt_audience = Some(v);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                // In-memory SQLite is per-connection, so keep the pool at one
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                connection_timeout: 30,
                recreate_on_boot: false,
            },
            auth: AuthConfig {
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_issuer: "drinks-api-dev".to_string(),
                jwt_audience: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: "sqlite:drinks.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 10,
                recreate_on_boot: false,
            },
            auth: AuthConfig {
                // Empty secret makes every verification fail closed until
                // JWT_SECRET is provided
                jwt_secret: String::new(),
                jwt_issuer: "drinks-api".to_string(),
                jwt_audience: None,
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
