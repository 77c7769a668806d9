use anyhow::{bail, Context, Result};

use crate::recommendation::pipeline::AuditPolicy;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub ai: AiConfig,
    pub audit_policy: AuditPolicy,
    pub port: u16,
    pub rust_log: String,
}

/// Settings for the chat-completion backend. Built once per process and
/// handed to the LLM client; the credential is mandatory.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("AUTH_JWT_SECRET")?,
            ai: AiConfig::from_env()?,
            audit_policy: std::env::var("AUDIT_POLICY")
                .ok()
                .map(|raw| raw.parse::<AuditPolicy>())
                .transpose()?
                .unwrap_or_default(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl AiConfig {
    pub fn from_env() -> Result<Self> {
        let temperature = match std::env::var("OPENAI_TEMPERATURE") {
            Ok(raw) => parse_temperature(&raw)?,
            Err(_) => DEFAULT_TEMPERATURE,
        };

        let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .map(|raw| {
                raw.parse::<u64>()
                    .context("OPENAI_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?;

        Ok(AiConfig {
            api_key: require_env("OPENAI_API_KEY")?,
            model: std::env::var("OPENAI_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
        })
    }
}

fn parse_temperature(raw: &str) -> Result<f32> {
    let value = raw
        .trim()
        .parse::<f32>()
        .with_context(|| format!("OPENAI_TEMPERATURE '{raw}' is not a number"))?;
    if !(0.0..=2.0).contains(&value) {
        bail!("OPENAI_TEMPERATURE must be between 0 and 2, got {value}");
    }
    Ok(value)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}
