use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub pool_size: usize,
}

// Keeps the password out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("pool_size", &self.pool_size)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageKind,
}

impl AppConfig {
    /// Defaults, then `quizforge.toml` if present, then `QUIZ_*` variables
    /// (`QUIZ_SERVER__PORT=8080`). The plain `PORT` and `DB_*` variables
    /// win over all of them.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Don't fail if .env doesn't exist
        Self::load_from("quizforge")
    }

    fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000_i64)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432_i64)?
            .set_default("database.dbname", "quizforge")?
            .set_default("database.user", "quizforge")?
            .set_default("database.password", "")?
            .set_default("database.pool_size", 16_i64)?
            .set_default("storage", "postgres")?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("QUIZ")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("database.host", env::var("DB_HOST").ok())?
            .set_override_option("database.port", env::var("DB_PORT").ok())?
            .set_override_option("database.dbname", env::var("DB_NAME").ok())?
            .set_override_option("database.user", env::var("DB_USER").ok())?
            .set_override_option("database.password", env::var("DB_PASSWORD").ok())?
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
