use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::foods::dto::FoodRecord;
use crate::meals::model::{Meal, MealTotals};

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub foods: Vec<FoodRecord>,
}

#[derive(Debug, Serialize)]
pub struct MealListItem {
    pub id: i64,
    pub name: String,
    pub photo: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub food_count: usize,
    pub total_calories: Option<f64>,
}

impl From<&Meal> for MealListItem {
    fn from(meal: &Meal) -> Self {
        Self {
            id: meal.id,
            name: meal.name.clone(),
            photo: meal.photo.clone(),
            created_at: meal.created_at,
            food_count: meal.foods.len(),
            total_calories: meal.effective_calories(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealDetails {
    pub id: i64,
    pub name: String,
    pub photo: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub foods: Vec<FoodRecord>,
    pub food_count: usize,
    pub totals: MealTotals,
}

impl From<Meal> for MealDetails {
    fn from(meal: Meal) -> Self {
        let totals = meal.totals();
        Self {
            id: meal.id,
            name: meal.name,
            photo: meal.photo,
            created_at: meal.created_at,
            food_count: meal.foods.len(),
            foods: meal.foods,
            totals,
        }
    }
}
