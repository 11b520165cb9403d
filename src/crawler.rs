use crate::config::IndexerConfig;
use crate::error::IndexerError;
use crate::extractors::{ListingExtractor, RecipeCardExtractor};
use crate::fetchers::{Fetcher, RequestFetcher};
use crate::index::{IndexClient, IndexStatus, SearchQuery};
use crate::model::RecipeRecord;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::fmt;
use tokio::time::sleep;
use url::Url;

/// What happened to one detail link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Record acknowledged by the backend under this document id
    Stored { id: String },
    /// Detail page answered something other than 200
    Unavailable { status: u16 },
    FetchFailed(String),
    /// No search backend handle for this run
    NoBackend,
    IndexFailed(String),
    StoreFailed(String),
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOutcome::Stored { id } => write!(f, "stored as {id}"),
            LinkOutcome::Unavailable { status } => write!(f, "failed, page answered {status}"),
            LinkOutcome::FetchFailed(e) => write!(f, "failed to fetch: {e}"),
            LinkOutcome::NoBackend => write!(f, "not stored, no search backend"),
            LinkOutcome::IndexFailed(e) => write!(f, "not stored, index unavailable: {e}"),
            LinkOutcome::StoreFailed(e) => write!(f, "failed to store: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    pub url: String,
    pub outcome: LinkOutcome,
}

/// Counters, per-link outcomes and query payload of one crawl run.
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Detail links found on the listing page
    pub links: usize,
    /// Records acknowledged by the search backend
    pub stored: usize,
    /// Links whose page could not be fetched, parsed, or stored
    pub failures: usize,
    /// Whether this run created the index
    pub index_created: bool,
    /// One entry per detail link, in crawl order
    pub outcomes: Vec<LinkReport>,
    /// Raw payload of the sample query, absent if it could not run
    pub search: Option<Value>,
}

impl CrawlReport {
    fn record(&mut self, link: &Url, outcome: LinkOutcome) {
        println!("{link}: {outcome}");
        match outcome {
            LinkOutcome::Stored { .. } => self.stored += 1,
            _ => self.failures += 1,
        }
        self.outcomes.push(LinkReport {
            url: link.to_string(),
            outcome,
        });
    }
}

/// Sequences one run: listing page, detail pages, index, sample query.
pub struct Crawler {
    config: IndexerConfig,
    fetcher: Box<dyn Fetcher>,
    listing: ListingExtractor,
    recipes: RecipeCardExtractor,
}

impl Crawler {
    pub fn new(config: IndexerConfig) -> Result<Self, IndexerError> {
        let fetcher =
            RequestFetcher::new(&config.crawl.user_agent, config.crawl.timeout())?;
        Self::with_fetcher(config, Box::new(fetcher))
    }

    /// Use a custom page source instead of plain HTTP requests.
    pub fn with_fetcher(
        config: IndexerConfig,
        fetcher: Box<dyn Fetcher>,
    ) -> Result<Self, IndexerError> {
        let listing = ListingExtractor::new(&config.selectors.links)?;
        let recipes = RecipeCardExtractor::new(&config.selectors)?;

        Ok(Crawler {
            config,
            fetcher,
            listing,
            recipes,
        })
    }

    pub async fn run(&self) -> CrawlReport {
        let mut report = CrawlReport::default();

        let links = self.fetch_links().await;
        report.links = links.len();

        if !links.is_empty() {
            let index = IndexClient::connect(&self.config.backend).await;
            match &index {
                Some(client) => println!("Connected to search backend at {}", client.base_url()),
                None => println!(
                    "Could not connect to search backend at {}",
                    self.config.backend.url
                ),
            }

            for link in &links {
                let outcome = self.index_link(index.as_ref(), link, &mut report).await;
                report.record(link, outcome);
            }
        }

        report.search = self.query().await;
        report
    }

    async fn fetch_links(&self) -> Vec<Url> {
        let listing_url = &self.config.crawl.listing_url;
        let base = match Url::parse(listing_url) {
            Ok(base) => base,
            Err(e) => {
                error!("Invalid listing URL '{}': {}", listing_url, e);
                return Vec::new();
            }
        };

        match self.fetcher.fetch(base.as_str()).await {
            Ok(page) if page.is_ok() => {
                let links = self.listing.resolve_links(&base, &page.body);
                info!("Found {} recipe links on {}", links.len(), base);
                links
            }
            Ok(page) => {
                warn!("Listing page {} answered {}", base, page.status);
                Vec::new()
            }
            Err(e) => {
                error!("Failed to fetch listing page {}: {}", base, e);
                Vec::new()
            }
        }
    }

    /// Fetch, parse and store one detail link.
    async fn index_link(
        &self,
        index: Option<&IndexClient>,
        link: &Url,
        report: &mut CrawlReport,
    ) -> LinkOutcome {
        let pace = self.config.crawl.pace();
        if !pace.is_zero() {
            sleep(pace).await;
        }

        let record = match self.fetch_record(link).await {
            Ok(record) => record,
            Err(outcome) => return outcome,
        };

        let Some(index) = index else {
            debug!("No search backend, skipping '{}'", record.title);
            return LinkOutcome::NoBackend;
        };

        let name = &self.config.index.name;
        match index.try_ensure_index(&self.config.index).await {
            Ok(IndexStatus::Created) => {
                println!("Created index '{name}'");
                report.index_created = true;
            }
            Ok(IndexStatus::AlreadyExists) => {}
            Err(e) => {
                error!("Failed to create index '{}': {}", name, e);
                return LinkOutcome::IndexFailed(e.to_string());
            }
        }

        match index.try_store(&self.config.index, &record).await {
            Ok(outcome) => {
                info!("Indexed '{}' as {} ({})", record.title, outcome.id, outcome.result);
                LinkOutcome::Stored { id: outcome.id }
            }
            Err(e) => {
                error!("Error in indexing data: {}", e);
                LinkOutcome::StoreFailed(e.to_string())
            }
        }
    }

    async fn fetch_record(&self, link: &Url) -> Result<RecipeRecord, LinkOutcome> {
        match self.fetcher.fetch(link.as_str()).await {
            Ok(page) if page.is_ok() => Ok(self.recipes.extract_record(&page.body)),
            Ok(page) if self.config.crawl.store_unavailable_pages => {
                warn!("{} answered {}, storing defaults", link, page.status);
                Ok(RecipeRecord::default())
            }
            Ok(page) => {
                warn!("{} answered {}, skipping", link, page.status);
                Err(LinkOutcome::Unavailable {
                    status: page.status,
                })
            }
            Err(e) => {
                error!("Exception while fetching {}: {}", link, e);
                Err(LinkOutcome::FetchFailed(e.to_string()))
            }
        }
    }

    fn sample_query(&self) -> SearchQuery {
        SearchQuery::calories_at_least(self.config.search.min_calories)
            .with_source(self.config.search.source.iter().cloned())
    }

    async fn query(&self) -> Option<Value> {
        let index = IndexClient::connect(&self.config.backend).await?;

        match index.search(&self.config.index.name, &self.sample_query()).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!("Search on '{}' failed: {}", self.config.index.name, e);
                None
            }
        }
    }
}
