use std::time::Duration;

use crate::config::FoodApiConfig;
use crate::error::AppError;
use crate::foods::dto::ParserResponse;

const PARSER_PATH: &str = "/api/food-database/v2/parser";
const AUTOCOMPLETE_PATH: &str = "/auto-complete";

/// HTTP client for the external food-database service. Credentials travel as
/// query parameters on every call; a hung request is bounded by the client
/// timeout and stalls only the operation that issued it.
#[derive(Clone)]
pub struct FoodClient {
    http: reqwest::Client,
    app_id: String,
    app_key: String,
    base_url: String,
}

impl FoodClient {
    pub fn new(config: &FoodApiConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            http,
            app_id: config.app_id.clone(),
            app_key: config.app_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Free-text ingredient lookup.
    pub async fn parse_ingredient(&self, ingredient: &str) -> Result<ParserResponse, AppError> {
        self.get_parser(&[("ingr", ingredient)]).await
    }

    /// Barcode lookup on the same parser endpoint.
    pub async fn parse_upc(&self, upc: &str) -> Result<ParserResponse, AppError> {
        self.get_parser(&[("upc", upc)]).await
    }

    async fn get_parser(&self, param: &[(&str, &str)]) -> Result<ParserResponse, AppError> {
        let url = format!("{}{}", self.base_url, PARSER_PATH);
        let text = self.get_text(&url, param).await?;
        serde_json::from_str(&text).map_err(AppError::UpstreamShape)
    }

    /// Suggestion strings from the autocomplete endpoint (a bare JSON array).
    pub async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        let url = format!("{}{}", self.base_url, AUTOCOMPLETE_PATH);
        let text = self.get_text(&url, &[("q", prefix)]).await?;
        serde_json::from_str(&text).map_err(AppError::UpstreamShape)
    }

    async fn get_text(&self, url: &str, param: &[(&str, &str)]) -> Result<String, AppError> {
        let response = self
            .http
            .get(url)
            .query(&[
                ("app_id", self.app_id.as_str()),
                ("app_key", self.app_key.as_str()),
            ])
            .query(param)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}
