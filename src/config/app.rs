use anyhow::{bail, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let jwt_secret = resolve_jwt_secret(&environment, env::var("JWT_SECRET").ok())?;

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            jwt_secret,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

const DEVELOPMENT_JWT_SECRET: &str = "dev-secret-change-me";

/// Only a development server may sign tokens with the built-in secret.
fn resolve_jwt_secret(environment: &str, configured: Option<String>) -> Result<String> {
    match configured.filter(|s| !s.trim().is_empty()) {
        Some(secret) if secret == DEVELOPMENT_JWT_SECRET && environment != "development" => {
            bail!("JWT_SECRET must not be the development secret in {environment}")
        }
        Some(secret) => Ok(secret),
        None if environment == "development" => Ok(DEVELOPMENT_JWT_SECRET.to_string()),
        None => bail!("JWT_SECRET must be set when ENVIRONMENT is {environment}"),
    }
}
