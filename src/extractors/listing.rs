use super::compile;
use crate::error::IndexerError;
use log::{debug, warn};
use scraper::{Html, Selector};
use url::Url;

/// Pulls recipe detail links out of a listing page.
pub struct ListingExtractor {
    links: Selector,
}

impl ListingExtractor {
    pub fn new(link_selector: &str) -> Result<Self, IndexerError> {
        Ok(Self {
            links: compile(link_selector)?,
        })
    }

    /// `href` of every matching anchor, in document order.
    ///
    /// Empty and fragment-only hrefs point back at the listing page and are
    /// left out.
    pub fn extract_links(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let links: Vec<String> = document
            .select(&self.links)
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty() && !href.starts_with('#'))
            .map(str::to_string)
            .collect();

        debug!("Found {} recipe links", links.len());
        links
    }

    /// Like [`extract_links`](Self::extract_links), with relative links
    /// resolved against the listing page URL.
    pub fn resolve_links(&self, base: &Url, html: &str) -> Vec<Url> {
        self.extract_links(html)
            .into_iter()
            .filter_map(|href| match base.join(&href) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Skipping unresolvable link '{}': {}", href, e);
                    None
                }
            })
            .collect()
    }
}
