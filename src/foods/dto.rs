use serde::{Deserialize, Serialize};

/// Normalized food item as the rest of the system sees it. Upstream shapes are
/// converted to this at the adapter boundary and never leak past it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodRecord {
    pub id: String,
    pub label: String,
    pub image: Option<String>,
    #[serde(default)]
    pub nutrients: Nutrients,
}

/// Per-food nutrient content. Absent upstream fields are zero, never an error.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Nutrients {
    #[serde(default)]
    pub energy_kcal: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
}

impl Nutrients {
    pub fn is_empty(&self) -> bool {
        self.energy_kcal == 0.0
            && self.protein_g == 0.0
            && self.carbs_g == 0.0
            && self.fat_g == 0.0
    }
}

// --- raw upstream shapes (food-database parser endpoint) ---

#[derive(Debug, Deserialize)]
pub struct ParserResponse {
    #[serde(default)]
    pub parsed: Vec<ParserEntry>,
    #[serde(default)]
    pub hints: Vec<ParserEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ParserEntry {
    pub food: RawFood,
}

#[derive(Debug, Deserialize)]
pub struct RawFood {
    #[serde(rename = "foodId")]
    pub food_id: String,
    pub label: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub nutrients: RawNutrients,
}

/// Nutrient mapping keyed by upstream codes. Optional on purpose: many records
/// carry a partial mapping.
#[derive(Debug, Default, Deserialize)]
pub struct RawNutrients {
    #[serde(rename = "ENERC_KCAL")]
    pub energy_kcal: Option<f64>,
    #[serde(rename = "PROCNT")]
    pub protein: Option<f64>,
    #[serde(rename = "CHOCDF")]
    pub carbs: Option<f64>,
    #[serde(rename = "FAT")]
    pub fat: Option<f64>,
}

fn non_neg(v: Option<f64>) -> f64 {
    v.unwrap_or(0.0).max(0.0)
}

impl From<RawFood> for FoodRecord {
    fn from(raw: RawFood) -> Self {
        Self {
            id: raw.food_id,
            label: raw.label,
            image: raw.image,
            nutrients: Nutrients {
                energy_kcal: non_neg(raw.nutrients.energy_kcal),
                protein_g: non_neg(raw.nutrients.protein),
                carbs_g: non_neg(raw.nutrients.carbs),
                fat_g: non_neg(raw.nutrients.fat),
            },
        }
    }
}

impl ParserResponse {
    /// Records for a free-text search: the hint list, falling back to parsed
    /// matches when the service returns only those.
    pub fn into_search_records(self) -> Vec<FoodRecord> {
        let entries = if self.hints.is_empty() {
            self.parsed
        } else {
            self.hints
        };
        entries.into_iter().map(|e| e.food.into()).collect()
    }

    /// First match for a code lookup; `None` when the service reports no matches.
    pub fn into_first_match(self) -> Option<FoodRecord> {
        self.hints
            .into_iter()
            .chain(self.parsed)
            .next()
            .map(|e| e.food.into())
    }

    /// Calories of the first parsed match, used by the enrichment pass.
    pub fn parsed_energy_kcal(&self) -> Option<f64> {
        self.parsed
            .first()
            .map(|e| non_neg(e.food.nutrients.energy_kcal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "parsed": [
            { "food": { "foodId": "food_a", "label": "Apple",
                        "nutrients": { "ENERC_KCAL": 52.0, "PROCNT": 0.3, "CHOCDF": 13.8, "FAT": 0.2 } } }
        ],
        "hints": [
            { "food": { "foodId": "food_a", "label": "Apple", "image": "https://img/apple.jpg",
                        "nutrients": { "ENERC_KCAL": 52.0, "PROCNT": 0.3, "CHOCDF": 13.8, "FAT": 0.2 } } },
            { "food": { "foodId": "food_b", "label": "Apple juice",
                        "nutrients": { "ENERC_KCAL": 46.0 } } }
        ]
    }"#;

    #[test]
    fn normalizes_hints_into_records() {
        let resp: ParserResponse = serde_json::from_str(SEARCH_BODY).expect("parse fixture");
        let records = resp.into_search_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "food_a");
        assert_eq!(records[0].label, "Apple");
        assert_eq!(records[0].image.as_deref(), Some("https://img/apple.jpg"));
        assert_eq!(records[0].nutrients.energy_kcal, 52.0);
        assert_eq!(records[0].nutrients.protein_g, 0.3);
    }

    #[test]
    fn missing_nutrient_keys_default_to_zero() {
        let resp: ParserResponse = serde_json::from_str(SEARCH_BODY).expect("parse fixture");
        let records = resp.into_search_records();
        let juice = &records[1];
        assert_eq!(juice.nutrients.energy_kcal, 46.0);
        assert_eq!(juice.nutrients.protein_g, 0.0);
        assert_eq!(juice.nutrients.carbs_g, 0.0);
        assert_eq!(juice.nutrients.fat_g, 0.0);
    }

    #[test]
    fn negative_nutrient_values_are_clamped() {
        let body = r#"{ "hints": [ { "food": { "foodId": "f", "label": "Bad",
            "nutrients": { "ENERC_KCAL": -12.0, "FAT": 1.5 } } } ] }"#;
        let resp: ParserResponse = serde_json::from_str(body).expect("parse fixture");
        let record = resp.into_first_match().expect("one record");
        assert_eq!(record.nutrients.energy_kcal, 0.0);
        assert_eq!(record.nutrients.fat_g, 1.5);
    }

    #[test]
    fn zero_matches_yield_none() {
        let resp: ParserResponse =
            serde_json::from_str(r#"{ "parsed": [], "hints": [] }"#).expect("parse fixture");
        assert!(resp.into_first_match().is_none());
    }

    #[test]
    fn missing_collections_parse_as_empty() {
        let resp: ParserResponse = serde_json::from_str("{}").expect("parse fixture");
        assert!(resp.into_search_records().is_empty());
    }

    #[test]
    fn parsed_energy_comes_from_first_parsed_entry() {
        let resp: ParserResponse = serde_json::from_str(SEARCH_BODY).expect("parse fixture");
        assert_eq!(resp.parsed_energy_kcal(), Some(52.0));
        let empty: ParserResponse = serde_json::from_str("{}").expect("parse fixture");
        assert_eq!(empty.parsed_energy_kcal(), None);
    }
}
