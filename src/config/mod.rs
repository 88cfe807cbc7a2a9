use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Secret used when SESSION_SECRET is not set. Only acceptable outside production.
pub const DEFAULT_SESSION_SECRET: &str = "secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub hasher: HasherConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub cookie_name: String,
    pub max_age_secs: i64,
    pub secure: bool,
}

/// Argon2 work factor
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HasherConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be set to a non-default value in production")]
    InsecureSessionSecret,

    #[error("Invalid hasher work factor: {0}")]
    InvalidHasher(String),

    #[error("Invalid server address {0}")]
    InvalidAddress(String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides();

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Ok(v) = env::var("SESSION_MAX_AGE_SECS") {
            self.session.max_age_secs = v.parse().unwrap_or(self.session.max_age_secs);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.session.secure = v.parse().unwrap_or(self.session.secure);
        }

        // Hasher overrides
        if let Ok(v) = env::var("HASH_MEMORY_KIB") {
            self.hasher.memory_kib = v.parse().unwrap_or(self.hasher.memory_kib);
        }
        if let Ok(v) = env::var("HASH_ITERATIONS") {
            self.hasher.iterations = v.parse().unwrap_or(self.hasher.iterations);
        }
        if let Ok(v) = env::var("HASH_PARALLELISM") {
            self.hasher.parallelism = v.parse().unwrap_or(self.hasher.parallelism);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Reject configurations that would start a broken or unsafe deployment
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment == Environment::Production
            && (self.session.secret.is_empty() || self.session.secret == DEFAULT_SESSION_SECRET)
        {
            return Err(ConfigError::InsecureSessionSecret);
        }

        argon2::Params::new(
            self.hasher.memory_kib,
            self.hasher.iterations,
            self.hasher.parallelism,
            None,
        )
        .map_err(|e| ConfigError::InvalidHasher(e.to_string()))?;

        self.server.bind_addr()?;
        Ok(())
    }

    /// Settings for tests: in-memory database and the cheapest valid work factor
    pub fn for_tests() -> Self {
        let mut config = Self::development();
        config.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        config.hasher = HasherConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        };
        config.security.enable_cors = false;
        config
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://accounts.db".to_string(),
                max_connections: 5,
            },
            session: SessionConfig {
                secret: DEFAULT_SESSION_SECRET.to_string(),
                cookie_name: "go-api".to_string(),
                max_age_secs: 86400 * 30,
                secure: false,
            },
            hasher: HasherConfig {
                memory_kib: 19 * 1024,
                iterations: 2,
                parallelism: 1,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://accounts.db".to_string(),
                max_connections: 10,
            },
            session: SessionConfig {
                secret: DEFAULT_SESSION_SECRET.to_string(),
                cookie_name: "go-api".to_string(),
                max_age_secs: 86400 * 7,
                secure: true,
            },
            hasher: HasherConfig {
                memory_kib: 19 * 1024,
                iterations: 2,
                parallelism: 1,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://accounts.db".to_string(),
                max_connections: 20,
            },
            session: SessionConfig {
                secret: String::new(),
                cookie_name: "go-api".to_string(),
                max_age_secs: 86400,
                secure: true,
            },
            hasher: HasherConfig {
                memory_kib: 64 * 1024,
                iterations: 3,
                parallelism: 1,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}
