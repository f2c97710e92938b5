use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

// Seven days, the lifetime of an issued session token
pub const DEFAULT_JWT_EXPIRES_IN_HOURS: i64 = 168;
pub const MIN_JWT_SECRET_LENGTH: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

// Top-level container for every setting the service reads at startup
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub uploads: UploadConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(()),
        }
    }
}

// Without a URL the service runs on the in-memory store
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub pool_size: u32,
}

// Redis is only used for the catalog cache, so it is optional
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Option<String>,
    pub catalog_ttl_seconds: u64,
}

#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expires_in_hours", &self.expires_in_hours)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: String,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapConfig {
    pub super_admin: Option<SuperAdminSeed>,
}

#[derive(Clone, Deserialize)]
pub struct SuperAdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SuperAdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperAdminSeed")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                value: format!("must be at least {} characters", MIN_JWT_SECRET_LENGTH),
            });
        }

        let super_admin = match (
            optional("SUPER_ADMIN_EMAIL"),
            optional("SUPER_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(SuperAdminSeed {
                name: optional("SUPER_ADMIN_NAME").unwrap_or_else(|| "Super Admin".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parsed("PORT", 8000)?,
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "showtime_booking=debug,tower_http=debug".to_string()),
                log_format: parsed("LOG_FORMAT", LogFormat::Pretty)?,
            },
            database: DatabaseConfig {
                url: optional("DATABASE_URL"),
                pool_size: parsed("DB_POOL_SIZE", 20)?,
            },
            redis: RedisConfig {
                url: optional("REDIS_URL"),
                catalog_ttl_seconds: parsed("CATALOG_CACHE_TTL_SECONDS", 3600)?,
            },
            jwt: JwtConfig {
                secret,
                expires_in_hours: parsed("JWT_EXPIRES_IN_HOURS", DEFAULT_JWT_EXPIRES_IN_HOURS)?,
            },
            security: SecurityConfig {
                bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            },
            uploads: UploadConfig {
                dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
                max_bytes: parsed("UPLOAD_MAX_BYTES", 5 * 1024 * 1024)?,
            },
            bootstrap: BootstrapConfig { super_admin },
        })
    }

    /// Local defaults with no external services: in-memory store, no cache,
    /// the cheapest bcrypt cost. Used by tests and quick local runs.
    pub fn local(jwt_secret: &str) -> Self {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                environment: "test".to_string(),
                rust_log: "showtime_booking=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            database: DatabaseConfig { url: None, pool_size: 5 },
            redis: RedisConfig { url: None, catalog_ttl_seconds: 60 },
            jwt: JwtConfig {
                secret: jwt_secret.to_string(),
                expires_in_hours: DEFAULT_JWT_EXPIRES_IN_HOURS,
            },
            security: SecurityConfig { bcrypt_cost: 4 },
            uploads: UploadConfig {
                dir: "./uploads".to_string(),
                max_bytes: 5 * 1024 * 1024,
            },
            bootstrap: BootstrapConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
