use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::foods::service::FoodService;
use crate::meals::repo::MealStore;
use crate::storage::{FileStore, KeyValueStore};

/// Application state: business data lives here, owned by the components,
/// never in presentation layers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub foods: Arc<FoodService>,
    pub meals: Arc<MealStore>,
    /// Single-permit admission gate for the enrichment pass.
    pub enrich_gate: Arc<Semaphore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::new(config.data_dir.clone()).await?);
        Ok(Self::from_parts(config, store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn KeyValueStore>) -> Self {
        let foods = Arc::new(FoodService::new(&config.food));
        let meals = Arc::new(MealStore::new(store));
        Self {
            config,
            foods,
            meals,
            enrich_gate: Arc::new(Semaphore::new(1)),
        }
    }

    /// State for tests: in-memory store, food service pointed at an
    /// unroutable address so every upstream call fails fast.
    pub fn for_tests() -> Self {
        use crate::config::{FoodApiConfig, SessionConfig};
        use crate::storage::MemoryStore;

        let config = Arc::new(AppConfig {
            food: FoodApiConfig {
                app_id: "test-id".into(),
                app_key: "test-key".into(),
                base_url: "http://127.0.0.1:9".into(),
                timeout_secs: 1,
            },
            session: SessionConfig {
                secret: "test-secret".into(),
                issuer: "test".into(),
                audience: "test".into(),
            },
            data_dir: std::env::temp_dir(),
            enrich_concurrency: 2,
            enrich_timeout_secs: 1,
        });
        Self::from_parts(config, Arc::new(MemoryStore::default()))
    }
}
