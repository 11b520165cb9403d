use crate::error::IndexerError;
use scraper::{ElementRef, Selector};

mod listing;
mod recipe_card;

pub use listing::ListingExtractor;
pub use recipe_card::RecipeCardExtractor;

fn compile(selector: &str) -> Result<Selector, IndexerError> {
    Selector::parse(selector).map_err(|e| IndexerError::Selector(format!("'{selector}': {e}")))
}

/// All text beneath an element, concatenated as it appears in the markup.
fn element_text(element: ElementRef) -> String {
    element.text().collect()
}
