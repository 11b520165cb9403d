use super::{compile, element_text};
use crate::config::SelectorConfig;
use crate::error::IndexerError;
use crate::model::{Ingredient, RecipeRecord, MISSING_CALORIES};
use log::debug;
use scraper::{ElementRef, Html, Selector};

/// Text the source site renders as the last entry of every ingredient list.
const ADD_ALL_PLACEHOLDER: &str = "Add all ingredients to list";

/// Extracts a [`RecipeRecord`] from a recipe detail page.
///
/// Every field is looked up independently. A selector with no match leaves
/// that field at its default, so a record is produced for any markup.
pub struct RecipeCardExtractor {
    title: Selector,
    submitter: Selector,
    description: Selector,
    calories: Selector,
    ingredients: Selector,
}

impl RecipeCardExtractor {
    pub fn new(selectors: &SelectorConfig) -> Result<Self, IndexerError> {
        Ok(Self {
            title: compile(&selectors.title)?,
            submitter: compile(&selectors.submitter)?,
            description: compile(&selectors.description)?,
            calories: compile(&selectors.calories)?,
            ingredients: compile(&selectors.ingredients)?,
        })
    }

    pub fn extract_record(&self, html: &str) -> RecipeRecord {
        let document = Html::parse_document(html);
        let mut record = RecipeRecord::default();

        if let Some(title) = first_match(&document, &self.title) {
            record.title = element_text(title);
        }

        if let Some(submitter) = first_match(&document, &self.submitter) {
            record.submitter = element_text(submitter).trim().to_string();
        }

        if let Some(description) = first_match(&document, &self.description) {
            record.description = element_text(description).trim().replace('"', "");
        }

        if let Some(calories) = first_match(&document, &self.calories) {
            record.calories = strip_calories(&element_text(calories));
        }

        record.ingredients = document
            .select(&self.ingredients)
            .map(|element| element_text(element).trim().to_string())
            .filter(|text| !text.is_empty() && !text.contains(ADD_ALL_PLACEHOLDER))
            .map(Ingredient::new)
            .collect();

        debug!(
            "Extracted '{}' with {} ingredient steps",
            record.title,
            record.ingredients.len()
        );
        record
    }
}

fn first_match<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

/// "320 cals" -> "320". Text without any digit falls back to the default.
fn strip_calories(text: &str) -> String {
    let stripped = text.replace("cals", "").trim().to_string();
    if stripped.chars().any(|c| c.is_ascii_digit()) {
        stripped
    } else {
        MISSING_CALORIES.to_string()
    }
}
