use anyhow::{Context, Result};
use std::env;

use crate::services::openrouter::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub bind_addr: String,
}

impl Config {
    /// Reads settings from the process environment (`.env` is loaded by the caller).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openrouter_api_key = lookup("OPENROUTER_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("OPENROUTER_API_KEY must be set in .env file")?;

        let openrouter_model = lookup("OPENROUTER_MODEL").unwrap_or_else(|| {
            log::warn!("⚠️ OPENROUTER_MODEL not set, using default '{}'", DEFAULT_MODEL);
            DEFAULT_MODEL.to_string()
        });

        let openrouter_base_url =
            lookup("OPENROUTER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            openrouter_api_key,
            openrouter_model,
            openrouter_base_url,
            bind_addr,
        })
    }
}
