use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use reservation_engine::{CodeSet, EngineConfig, Estado, FallbackPolicy};
use std::env;

/// Engine configuration with overrides from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let mut engine = EngineConfig::default();

        if let Ok(value) = env::var("RESERVATION_PREFER_DAY_FIRST") {
            engine = engine.with_prefer_day_first(
                parse_bool(&value).context("RESERVATION_PREFER_DAY_FIRST must be true or false")?,
            );
        }
        if let Ok(value) = env::var("RESERVATION_MATCH_THRESHOLD") {
            engine = engine.with_match_threshold(
                value
                    .trim()
                    .parse()
                    .context("RESERVATION_MATCH_THRESHOLD must be a number")?,
            );
        }
        if let Ok(value) = env::var("RESERVATION_MATCH_FALLBACK") {
            engine = engine.with_fallback(
                value
                    .parse::<FallbackPolicy>()
                    .context("RESERVATION_MATCH_FALLBACK must be first_row or abort")?,
            );
        }
        if let Ok(value) = env::var("RESERVATION_DEFAULT_ESTADO") {
            let estado = Estado::from_code(&value)
                .ok_or_else(|| anyhow!("RESERVATION_DEFAULT_ESTADO has unknown code '{value}'"))?;
            engine = engine.with_default_estado(Some(estado));
        }

        Ok(Self { engine })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("not a boolean: '{other}'")),
    }
}
