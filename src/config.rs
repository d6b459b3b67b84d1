use anyhow::{Context, Result};
use dotenvy::dotenv;
use sea_orm::ConnectOptions;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: Option<String>,
    pub app_name: String,
    pub keycloak_ui_id: String,
    pub keycloak_url: String,
    pub keycloak_realm: String,
    pub deployment: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_connect_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub tests_running: bool,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load from .env file if available
        let db_url = match env::var("DB_URL") {
            Ok(url) => url,
            Err(_) => format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                required("DB_USER")?,
                required("DB_PASSWORD")?,
                required("DB_HOST")?,
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                required("DB_NAME")?,
            ),
        };

        Ok(Config {
            app_name: required("APP_NAME")?,
            keycloak_ui_id: env::var("KEYCLOAK_UI_ID").unwrap_or_default(),
            // An empty URL disables token verification
            keycloak_url: env::var("KEYCLOAK_URL").unwrap_or_default(),
            keycloak_realm: env::var("KEYCLOAK_REALM").unwrap_or_default(),
            deployment: required("DEPLOYMENT")
                .context("this can be local, dev, stage, or prod")?,
            port: parsed_or("PORT", 3000)?,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10)?,
            db_connect_timeout_secs: parsed_or("DB_CONNECT_TIMEOUT_SECS", 5)?,
            db_idle_timeout_secs: parsed_or("DB_IDLE_TIMEOUT_SECS", 300)?,
            tests_running: false,
            db_url: Some(db_url),
        })
    }

    /// Pool settings for `sea_orm::Database::connect`
    pub fn connect_options(&self) -> Result<ConnectOptions> {
        let url = self.db_url.clone().context("database URL is not configured")?;
        let mut options = ConnectOptions::new(url);
        options
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.db_idle_timeout_secs))
            .sqlx_logging(false);
        Ok(options)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            app_name: "incubator-api-test".to_string(),
            keycloak_ui_id: "test-ui".to_string(),
            keycloak_url: String::new(),
            keycloak_realm: "test-realm".to_string(),
            deployment: "test".to_string(),
            port: 3000,
            db_max_connections: 1,
            db_connect_timeout_secs: 5,
            db_idle_timeout_secs: 60,
            tests_running: true,
            db_url: None,
        }
    }
}
