use anyhow::{Context, Result};

pub const API_KEY_VAR: &str = "LOVABLE_API_KEY";
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";
pub const DEFAULT_TEXT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image";

/// Service configuration. The gateway credential is optional here: a missing
/// key does not stop the server from starting, every generation request
/// reports it instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub gateway_url: String,
    pub text_model: String,
    pub image_model: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            api_key: std::env::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty()),
            gateway_url: env_or("AI_GATEWAY_URL", DEFAULT_GATEWAY_URL),
            text_model: env_or("TEXT_MODEL", DEFAULT_TEXT_MODEL),
            image_model: env_or("IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }

    /// Config pointing at an arbitrary gateway, used by tests and local fakes.
    pub fn for_gateway(api_key: Option<&str>, gateway_url: impl Into<String>) -> Self {
        Config {
            api_key: api_key.map(str::to_string),
            gateway_url: gateway_url.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            port: 8080,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
}
