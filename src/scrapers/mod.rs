pub mod olx;


pub use olx::OlxScraper;

use crate::config::ScraperConfig;
use crate::fetcher::FetchError;
use crate::parsers::ExtractError;
use crate::request::SearchRequest;
use crate::results::Listing;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while setting up a scraper
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// A site-specific source of listings.
///
/// Implementations contain their own failures: a scrape that goes wrong
/// returns fewer listings, never an error.
#[async_trait]
pub trait Scraper: Send + Sync {
    fn name(&self) -> &'static str;

    async fn scrape(&self, request: &SearchRequest) -> Vec<Listing>;
}

/// Runs a fixed list of scrapers and concatenates what they find
pub struct Aggregator {
    scrapers: Vec<Box<dyn Scraper>>,
}

impl Aggregator {
    pub fn new(scrapers: Vec<Box<dyn Scraper>>) -> Self {
        Self { scrapers }
    }

    /// Every supported site, configured from `config`
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let olx: Box<dyn Scraper> = Box::new(OlxScraper::new(config.clone())?);
        Ok(Self::new(vec![olx]))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.scrapers.iter().map(|s| s.name()).collect()
    }

    /// Search every source in order and concatenate the results
    pub async fn search(&self, request: &SearchRequest) -> Vec<Listing> {
        ::log::info!(
            "Searching '{}' across {} source(s)",
            request.product_name(),
            self.scrapers.len()
        );

        let mut listings = Vec::new();
        for scraper in &self.scrapers {
            let found = scraper.scrape(request).await;
            ::log::info!("{} found {} listings", scraper.name(), found.len());
            listings.extend(found);
        }
        listings
    }
}
