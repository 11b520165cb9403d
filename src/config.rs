use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::index::IndexMapping;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct IndexerConfig {
    /// Listing page and request behaviour
    #[serde(default)]
    pub crawl: CrawlConfig,
    /// CSS selectors used on listing and detail pages
    #[serde(default)]
    pub selectors: SelectorConfig,
    /// Search backend connection
    #[serde(default)]
    pub backend: BackendConfig,
    /// Target index settings and mapping
    #[serde(default)]
    pub index: IndexConfig,
    /// Sample query issued at the end of a run
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    /// Page enumerating the recipes to crawl
    #[serde(default = "default_listing_url")]
    pub listing_url: String,
    /// User-Agent sent with every page request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pause before each detail page request, in milliseconds
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
    /// Request timeout in seconds, 0 for the transport default
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Store an all-defaults record for detail pages answering non-200
    #[serde(default)]
    pub store_unavailable_pages: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            user_agent: default_user_agent(),
            pace_ms: default_pace_ms(),
            timeout: default_timeout(),
            store_unavailable_pages: false,
        }
    }
}

impl CrawlConfig {
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        request_timeout(self.timeout)
    }
}

/// CSS selectors for the listing and detail pages
#[derive(Debug, Deserialize, Clone)]
pub struct SelectorConfig {
    #[serde(default = "default_link_selector")]
    pub links: String,
    #[serde(default = "default_title_selector")]
    pub title: String,
    #[serde(default = "default_submitter_selector")]
    pub submitter: String,
    #[serde(default = "default_description_selector")]
    pub description: String,
    #[serde(default = "default_calories_selector")]
    pub calories: String,
    #[serde(default = "default_ingredients_selector")]
    pub ingredients: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            links: default_link_selector(),
            title: default_title_selector(),
            submitter: default_submitter_selector(),
            description: default_description_selector(),
            calories: default_calories_selector(),
            ingredients: default_ingredients_selector(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base URL of the Elasticsearch node
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Request timeout in seconds, 0 for the transport default
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        request_timeout(self.timeout)
    }
}

fn request_timeout(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_index_name")]
    pub name: String,
    /// Document type tag used in the mapping and for indexing
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    #[serde(default = "default_shards")]
    pub shards: u32,
    #[serde(default)]
    pub replicas: u32,
    #[serde(default = "IndexMapping::recipes")]
    pub mapping: IndexMapping,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: default_index_name(),
            doc_type: default_doc_type(),
            shards: default_shards(),
            replicas: 0,
            mapping: IndexMapping::recipes(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Lower bound for the calories range query
    #[serde(default = "default_min_calories")]
    pub min_calories: i64,
    /// Fields returned for each hit
    #[serde(default = "default_source_fields")]
    pub source: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_calories: default_min_calories(),
            source: default_source_fields(),
        }
    }
}

// Default value functions
fn default_listing_url() -> String {
    "https://www.allrecipes.com/recipes/96/salad/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/66.0.3359.181 Safari/537.36".to_string()
}

fn default_pace_ms() -> u64 {
    2000
}

fn default_timeout() -> u64 {
    30
}

fn default_link_selector() -> String {
    ".fixed-recipe-card__h3 a".to_string()
}

fn default_title_selector() -> String {
    ".recipe-summary__h1".to_string()
}

fn default_submitter_selector() -> String {
    ".submitter__name".to_string()
}

fn default_description_selector() -> String {
    ".submitter__description".to_string()
}

fn default_calories_selector() -> String {
    ".calorie-count".to_string()
}

fn default_ingredients_selector() -> String {
    ".recipe-ingred_txt".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_index_name() -> String {
    "recipes".to_string()
}

fn default_doc_type() -> String {
    "salads".to_string()
}

fn default_shards() -> u32 {
    1
}

fn default_min_calories() -> i64 {
    20
}

fn default_source_fields() -> Vec<String> {
    vec!["title".to_string()]
}

impl IndexerConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_INDEXER__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_INDEXER__BACKEND__URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`IndexerConfig::load`] for the source priority.
pub fn load_config() -> Result<IndexerConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_INDEXER__CRAWL__PACE_MS
        .add_source(
            Environment::with_prefix("RECIPE_INDEXER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
