use lazy_static::lazy_static;
use regex::Regex;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::FoodApiConfig;
use crate::error::AppError;
use crate::foods::client::FoodClient;
use crate::foods::dto::FoodRecord;

pub(crate) fn is_valid_upc(code: &str) -> bool {
    lazy_static! {
        static ref UPC_RE: Regex = Regex::new(r"^\d{6,14}$").unwrap();
    }
    UPC_RE.is_match(code)
}

/// Search/lookup adapter over the food-database client. Holds the last
/// successful search results so a transport failure degrades to stale data
/// instead of surfacing an error.
pub struct FoodService {
    client: FoodClient,
    last_results: RwLock<Vec<FoodRecord>>,
}

impl FoodService {
    pub fn new(config: &FoodApiConfig) -> Self {
        Self {
            client: FoodClient::new(config),
            last_results: RwLock::new(Vec::new()),
        }
    }

    /// Free-text search. A blank query short-circuits without a network call;
    /// upstream failure logs and returns the last-known results unchanged.
    pub async fn search(&self, query: &str) -> Vec<FoodRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        match self.client.parse_ingredient(query).await {
            Ok(resp) => {
                let records = resp.into_search_records();
                *self.last_results.write().await = records.clone();
                records
            }
            Err(e) => {
                warn!(error = %e, %query, "food search failed; serving last-known results");
                self.last_results.read().await.clone()
            }
        }
    }

    /// Barcode lookup. Zero matches and upstream failures both come back as
    /// `None`; only the failure is logged.
    pub async fn lookup_by_code(&self, code: &str) -> Option<FoodRecord> {
        match self.client.parse_upc(code).await {
            Ok(resp) => {
                let found = resp.into_first_match();
                if found.is_none() {
                    debug!(%code, "no food matched barcode");
                }
                found
            }
            Err(e) => {
                warn!(error = %e, %code, "barcode lookup failed; treating as no match");
                None
            }
        }
    }

    /// Suggestion strings; blank prefix short-circuits, failure degrades to
    /// an empty list.
    pub async fn autocomplete(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Vec::new();
        }
        match self.client.autocomplete(prefix).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(error = %e, %prefix, "autocomplete failed");
                Vec::new()
            }
        }
    }

    /// Calorie value for a single food label, for the enrichment pass. The
    /// caller owns the degrade decision, so failures propagate here.
    pub async fn energy_for(&self, label: &str) -> Result<Option<f64>, AppError> {
        let resp = self.client.parse_ingredient(label).await?;
        Ok(resp.parsed_energy_kcal())
    }
}
