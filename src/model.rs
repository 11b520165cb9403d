use serde::{Serialize, Serializer};

/// Placeholder used for text fields the detail page does not provide.
pub const MISSING_TEXT: &str = "-";

/// Calorie count used when the detail page does not provide one.
pub const MISSING_CALORIES: &str = "0";

/// One recipe extracted from a detail page, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRecord {
    pub title: String,
    pub submitter: String,
    pub description: String,
    /// Calorie count as found on the page, suffix stripped.
    #[serde(serialize_with = "serialize_calories")]
    pub calories: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub step: String,
}

impl Ingredient {
    pub fn new(step: impl Into<String>) -> Self {
        Self { step: step.into() }
    }
}

impl Default for RecipeRecord {
    fn default() -> Self {
        Self {
            title: MISSING_TEXT.to_string(),
            submitter: MISSING_TEXT.to_string(),
            description: MISSING_TEXT.to_string(),
            calories: MISSING_CALORIES.to_string(),
            ingredients: Vec::new(),
        }
    }
}

impl RecipeRecord {
    /// Calorie count as an integer, if the page text holds one.
    pub fn calorie_count(&self) -> Option<i64> {
        parse_calories(&self.calories)
    }

    /// JSON document handed to the search backend.
    pub fn to_document(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

fn parse_calories(text: &str) -> Option<i64> {
    text.replace(',', "").trim().parse().ok()
}

// The index maps calories as a strict integer; text that is not one goes out as 0.
fn serialize_calories<S>(calories: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(parse_calories(calories).unwrap_or(0))
}
