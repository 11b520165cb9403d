pub mod config;
pub mod crawler;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod index;
pub mod model;

pub use config::IndexerConfig;
pub use crawler::{CrawlReport, Crawler, LinkOutcome, LinkReport};
pub use error::IndexerError;
pub use model::{Ingredient, RecipeRecord};

/// Crawl the configured listing page, index every recipe found and run the
/// sample query.
///
/// Only configuration problems surface as errors; everything that goes wrong
/// during the crawl is logged and counted in the returned report.
///
/// # Example
/// ```no_run
/// # async fn example() -> Result<(), recipe_indexer::IndexerError> {
/// let config = recipe_indexer::IndexerConfig::load()?;
/// let report = recipe_indexer::crawl_and_index(config).await?;
/// println!("stored {} of {} recipes", report.stored, report.links);
/// # Ok(())
/// # }
/// ```
pub async fn crawl_and_index(config: IndexerConfig) -> Result<CrawlReport, IndexerError> {
    let crawler = Crawler::new(config)?;
    Ok(crawler.run().await)
}
