use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FoodApiConfig {
    pub app_id: String,
    pub app_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub food: FoodApiConfig,
    pub session: SessionConfig,
    pub data_dir: PathBuf,
    pub enrich_concurrency: usize,
    pub enrich_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // Missing food-database credentials abort startup.
        let food = FoodApiConfig {
            app_id: std::env::var("EDAMAM_APP_ID").context("EDAMAM_APP_ID must be set")?,
            app_key: std::env::var("EDAMAM_APP_KEY").context("EDAMAM_APP_KEY must be set")?,
            base_url: std::env::var("FOOD_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.edamam.com".into()),
            timeout_secs: std::env::var("FOOD_API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        let session = SessionConfig {
            secret: std::env::var("SESSION_JWT_SECRET")
                .context("SESSION_JWT_SECRET must be set")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "repas".into()),
            audience: std::env::var("SESSION_AUDIENCE").unwrap_or_else(|_| "repas-users".into()),
        };
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let enrich_concurrency = std::env::var("ENRICH_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(4);
        let enrich_timeout_secs = std::env::var("ENRICH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);
        Ok(Self {
            food,
            session,
            data_dir,
            enrich_concurrency,
            enrich_timeout_secs,
        })
    }
}
