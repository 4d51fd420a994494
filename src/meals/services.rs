use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::meals::model::Meal;
use crate::state::AppState;

/// Sums per-food lookup results; a failed or missing lookup contributes zero
/// rather than aborting the pass.
fn total_from_lookups(results: &[Option<f64>]) -> f64 {
    results.iter().map(|r| r.unwrap_or(0.0)).sum()
}

/// Back-fills the cached calorie total of every stored meal that lacks one,
/// issuing one food lookup per entry. Lookups are capped by a semaphore and a
/// per-item timeout; the rewrite covers the whole collection.
pub async fn enrich_stored_meals(state: &AppState) -> Result<Vec<Meal>, AppError> {
    let meals = state.meals.list().await?;
    if meals.iter().all(|m| m.total_calories.is_some()) {
        return Ok(meals);
    }

    let limit = Arc::new(Semaphore::new(state.config.enrich_concurrency));
    let per_item = Duration::from_secs(state.config.enrich_timeout_secs);

    let mut updated = Vec::with_capacity(meals.len());
    for mut meal in meals {
        if meal.total_calories.is_some() {
            updated.push(meal);
            continue;
        }
        let lookups = meal.foods.iter().map(|food| {
            let limit = limit.clone();
            let foods = state.foods.clone();
            let label = food.label.clone();
            async move {
                let Ok(_permit) = limit.acquire().await else {
                    return None;
                };
                match timeout(per_item, foods.energy_for(&label)).await {
                    Ok(Ok(found)) => {
                        if found.is_none() {
                            warn!(%label, "no nutrition data found");
                        }
                        found
                    }
                    Ok(Err(e)) => {
                        warn!(error = %e, %label, "food lookup failed during enrichment");
                        None
                    }
                    Err(_) => {
                        warn!(%label, "food lookup timed out during enrichment");
                        None
                    }
                }
            }
        });
        let results = join_all(lookups).await;
        meal.total_calories = Some(total_from_lookups(&results));
        updated.push(meal);
    }

    state.meals.replace_all(&updated).await?;
    Ok(updated)
}

/// Best-effort trigger from the list view. The single-permit gate keeps at
/// most one pass in flight per process.
pub fn spawn_enrichment(state: &AppState) {
    let Ok(permit) = state.enrich_gate.clone().try_acquire_owned() else {
        debug!("enrichment pass already in flight");
        return;
    };
    let state = state.clone();
    tokio::spawn(async move {
        let _permit = permit;
        match enrich_stored_meals(&state).await {
            Ok(meals) => info!(count = meals.len(), "enrichment pass finished"),
            Err(e) => warn!(error = %e, "enrichment pass failed"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::dto::FoodRecord;
    use crate::meals::model::Selection;

    fn named_food(label: &str) -> FoodRecord {
        FoodRecord {
            id: format!("food_{label}"),
            label: label.to_string(),
            image: None,
            nutrients: Default::default(),
        }
    }

    #[test]
    fn lookup_failures_contribute_zero() {
        assert_eq!(total_from_lookups(&[Some(300.0), None, Some(150.0)]), 450.0);
        assert_eq!(total_from_lookups(&[None, None]), 0.0);
        assert_eq!(total_from_lookups(&[]), 0.0);
    }

    #[tokio::test]
    async fn pass_writes_a_total_even_when_every_lookup_fails() {
        // Test state points the food service at an unroutable address, so all
        // lookups fail and degrade to zero contributions.
        let state = AppState::for_tests();
        let mut selection = Selection::new();
        selection.add(named_food("croissant"));
        selection.add(named_food("coffee"));
        let meal = selection.build("Breakfast", None).expect("build meal");
        state.meals.save(meal).await.expect("save");

        let updated = enrich_stored_meals(&state).await.expect("enrich");
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].total_calories, Some(0.0));

        // The rewrite is persisted.
        let stored = state.meals.list().await.expect("list");
        assert_eq!(stored[0].total_calories, Some(0.0));
    }

    #[tokio::test]
    async fn meals_with_a_cached_total_are_left_alone() {
        let state = AppState::for_tests();
        let mut meal = Selection::new().build("Done", None).expect("build meal");
        meal.total_calories = Some(640.0);
        state.meals.save(meal).await.expect("save");

        let updated = enrich_stored_meals(&state).await.expect("enrich");
        assert_eq!(updated[0].total_calories, Some(640.0));
    }

    #[tokio::test]
    async fn empty_store_is_a_quiet_noop() {
        let state = AppState::for_tests();
        let updated = enrich_stored_meals(&state).await.expect("enrich");
        assert!(updated.is_empty());
    }
}
