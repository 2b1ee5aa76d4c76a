use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_expire_secs: u64,
    pub bcrypt_cost: u32,
    pub allow_admin_signup: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_url", &"<redacted>")
            .field("db_max_connections", &self.db_max_connections)
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expire_secs", &self.jwt_expire_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("allow_admin_signup", &self.allow_admin_signup)
            .finish()
    }
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: parsed_or("PORT", 3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://sendit.db?mode=rwc".to_string()),
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 5),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string()), // Use a secure secret in production
            jwt_expire_secs: parsed_or("JWT_EXPIRE_SECS", 30 * 24 * 60 * 60),
            bcrypt_cost: parsed_or("BCRYPT_COST", 10),
            allow_admin_signup: parsed_or("ALLOW_ADMIN_SIGNUP", true),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
