use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::foods::dto::FoodRecord;

/// A persisted meal: a named, timestamped list of food records plus the
/// cached calorie total maintained by the enrichment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub foods: Vec<FoodRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl Meal {
    /// Elementwise sum over the food list, absent fields as zero. Pure and
    /// re-derivable at any time; the single source of truth for display.
    pub fn totals(&self) -> MealTotals {
        let mut totals = MealTotals {
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
        };
        for food in &self.foods {
            totals.calories += food.nutrients.energy_kcal;
            totals.protein_g += food.nutrients.protein_g;
            totals.carbs_g += food.nutrients.carbs_g;
            totals.fat_g += food.nutrients.fat_g;
        }
        totals
    }

    /// Calories for list display: live when any selected record carries
    /// nutrient data, otherwise the cached enrichment value.
    pub fn effective_calories(&self) -> Option<f64> {
        if self.foods.iter().any(|f| !f.nutrients.is_empty()) {
            Some(self.totals().calories)
        } else {
            self.total_calories
        }
    }
}

/// Ordered food selection being assembled into a meal. Adding the same record
/// twice keeps both entries: multiple servings, no merge-by-identifier.
#[derive(Debug, Clone, Default)]
pub struct Selection(Vec<FoodRecord>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: FoodRecord) {
        self.0.push(item);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the meal. An empty selection is fine; a blank name is not.
    pub fn build(self, name: &str, photo: Option<String>) -> Result<Meal, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyInput("meal name"));
        }
        let now = OffsetDateTime::now_utc();
        Ok(Meal {
            id: fresh_id(now),
            name: name.to_string(),
            photo,
            created_at: now,
            foods: self.0,
            total_calories: None,
        })
    }
}

impl From<Vec<FoodRecord>> for Selection {
    fn from(foods: Vec<FoodRecord>) -> Self {
        Self(foods)
    }
}

/// Identifier from the creation timestamp in milliseconds, with a bounded
/// random draw if the clock yields nonsense.
fn fresh_id(now: OffsetDateTime) -> i64 {
    let millis = (now.unix_timestamp_nanos() / 1_000_000) as i64;
    if millis > 0 {
        millis
    } else {
        rand::thread_rng().gen_range(1..1_000_000_000)
    }
}
