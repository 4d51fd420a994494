use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::error;

use crate::error::AppError;
use crate::meals::model::Meal;
use crate::storage::KeyValueStore;

/// Storage key holding the whole meal collection as a JSON array.
pub const MEALS_KEY: &str = "repas";

/// Meal collection over the key-value store. Every mutation is a
/// read-modify-write of the full collection; the mutex serializes those
/// cycles so overlapping writers in this process cannot drop each other's
/// updates.
pub struct MealStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl MealStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the collection. An absent key is an empty collection; a present
    /// but unparsable value is corrupt storage, propagated without repair.
    pub async fn list(&self) -> Result<Vec<Meal>, AppError> {
        let Some(raw) = self.store.get(MEALS_KEY).await.map_err(AppError::Storage)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| {
            error!(error = %e, "stored meal collection failed to parse");
            AppError::StorageCorrupt(e)
        })
    }

    pub async fn save(&self, meal: Meal) -> Result<Meal, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut meals = self.list().await?;
        meals.push(meal.clone());
        self.write(&meals).await?;
        Ok(meal)
    }

    /// Removes the meal with the given id; a no-op when absent.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut meals = self.list().await?;
        meals.retain(|m| m.id != id);
        self.write(&meals).await
    }

    /// Whole-collection rewrite, used by the enrichment pass.
    pub async fn replace_all(&self, meals: &[Meal]) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.write(meals).await
    }

    async fn write(&self, meals: &[Meal]) -> Result<(), AppError> {
        let raw = serde_json::to_string(meals).map_err(AppError::StorageCorrupt)?;
        self.store
            .set(MEALS_KEY, &raw)
            .await
            .map_err(AppError::Storage)
    }
}
