pub mod browser;
pub mod config;
pub mod fetcher;
pub mod filter;
pub mod parsers;
pub mod request;
pub mod results;
pub mod scrapers;
pub mod url_builder;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use request::{RequestError, SearchRequest, SortOrder};
pub use results::Listing;
pub use scrapers::{Aggregator, OlxScraper, Scraper, ScraperError};

use std::time::Duration;

/// Builder for running one search across every supported site
pub struct Search {
    request: SearchRequest,
    config: ScraperConfig,
}

impl Search {
    /// Create a new search with default configuration
    pub fn new(request: SearchRequest) -> Self {
        Self {
            request,
            config: ScraperConfig::default(),
        }
    }

    /// Set the maximum number of result pages fetched at once
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Set the total timeout for fetching result pages
    pub fn with_total_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.config.total_timeout_ms = Some(millis);
        self
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, config::ConfigError> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, config::ConfigError> {
        let config = ScraperConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Run the search and collect listings from every source.
    ///
    /// `WEBDRIVER_URL` and `OLX_SCRAPER_BASE_URL` (or `OLX_BASE_URL`) from the
    /// environment take precedence over the configured values.
    pub async fn run(self) -> Result<Vec<Listing>, ScraperError> {
        let config = self.config.with_env_overrides();
        let aggregator = Aggregator::from_config(&config)?;
        Ok(aggregator.search(&self.request).await)
    }
}
