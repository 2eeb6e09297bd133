//! Configuration module for environment variables and application settings
//!
//! The configuration is read once in `main` and handed to every component
//! constructor. Request handlers never look at the environment.

use anyhow::{Result, anyhow};
use std::env;

/// Signing secret used when `JWT_SECRET` is not set. Development only.
pub const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_prod";

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign and verify identity tokens
    pub jwt_secret: String,

    /// Generative-AI collaborator settings
    pub ai: AiConfig,

    /// Database configuration, `None` runs the store in degraded mode
    pub database: Option<DatabaseConfig>,

    /// Server configuration
    pub server: ServerConfig,

    /// Social login providers
    pub oauth: OAuthConfig,

    /// Outbound mail relay
    pub smtp: SmtpConfig,

    /// Address that receives contact form notifications
    pub admin_email: String,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: usize,
    pub tls: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Base URL the provider callbacks hang off, e.g. `http://localhost:8081/api/auth`
    pub callback_base: String,
    pub google: Option<OAuthClientConfig>,
    pub github: Option<OAuthClientConfig>,
}

#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Mail is only relayed when both `user` and `password` are set
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.user.as_deref()?, self.password.as_deref()?))
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("⚠️  JWT_SECRET is not set, falling back to the insecure development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let api_key = env::var("AI_API_KEY")
            .or_else(|_| env::var("OPENROUTER_API_KEY"))
            .map_err(|_| anyhow!("AI_API_KEY environment variable is required"))?;

        let database = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()).map(|url| {
            DatabaseConfig {
                url,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 16),
                tls: parse_or("DATABASE_TLS", false),
            }
        });

        Ok(Self {
            jwt_secret,

            ai: AiConfig {
                api_key,
                api_url: env::var("AI_API_URL")
                    .unwrap_or_else(|_| "https://openrouter.ai/api/v1/chat/completions".to_string()),
                model: env::var("AI_MODEL")
                    .unwrap_or_else(|_| "google/gemini-flash-1.5".to_string()),
            },

            database,

            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_or("PORT", 8081),
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            },

            oauth: OAuthConfig {
                callback_base: env::var("CALLBACK_URL_BASE")
                    .unwrap_or_else(|_| "http://localhost:8081/api/auth".to_string()),
                google: client_from_env("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"),
                github: client_from_env("GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET"),
            },

            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                port: parse_or("SMTP_PORT", 587),
                user: non_empty("SMTP_USER"),
                password: non_empty("SMTP_PASS"),
            },

            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@codefuture.local".to_string()),
        })
    }
}

/// Parse an environment variable, keeping `default` when unset or malformed.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn client_from_env(id_key: &str, secret_key: &str) -> Option<OAuthClientConfig> {
    let client_id = non_empty(id_key)?;
    let client_secret = non_empty(secret_key)?;
    Some(OAuthClientConfig { client_id, client_secret })
}

#[cfg(test)]
impl Config {
    /// Configuration used by unit tests, never touches the environment
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: "test_secret".to_string(),
            ai: AiConfig {
                api_key: "test-key".to_string(),
                api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
                model: "test-model".to_string(),
            },
            database: None,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                frontend_url: "http://localhost:3001".to_string(),
            },
            oauth: OAuthConfig {
                callback_base: "http://localhost:8081/api/auth".to_string(),
                google: None,
                github: None,
            },
            smtp: SmtpConfig {
                host: "127.0.0.1".to_string(),
                port: 2525,
                user: None,
                password: None,
            },
            admin_email: "admin@example.com".to_string(),
        }
    }
}
