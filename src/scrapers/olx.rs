use crate::browser::{BrowserRunner, InfiniteScroll, Renderer, Routine};
use crate::config::ScraperConfig;
use crate::fetcher::{FetchMode, PageFetcher};
use crate::filter::UrlFilter;
use crate::parsers::{ListingExtractor, PaginationParser};
use crate::request::SearchRequest;
use crate::results::Listing;
use crate::scrapers::{Scraper, ScraperError};
use crate::url_builder::QueryUrlBuilder;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::{Instant, timeout, timeout_at};
use url::Url;

/// Scraper for OLX search results.
///
/// Result pages only reveal their pagination after being scrolled, so the
/// first page is rendered with an infinite scroll to collect every page URL,
/// then each page is rendered and parsed on a bounded pool of workers.
pub struct OlxScraper {
    config: ScraperConfig,
    renderer: Arc<dyn Renderer>,
    fetcher: Arc<PageFetcher>,
    extractor: Arc<ListingExtractor>,
    pagination: PaginationParser,
    url_filter: UrlFilter,
}

impl OlxScraper {
    /// Scraper backed by a real WebDriver browser
    pub fn new(config: ScraperConfig) -> Result<Self, ScraperError> {
        let runner = BrowserRunner::new(config.browser.clone(), &config.identity);
        Self::with_renderer(config, Arc::new(runner))
    }

    /// Scraper rendering pages through `renderer`
    pub fn with_renderer(
        config: ScraperConfig,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self, ScraperError> {
        let fetcher = PageFetcher::new(&config.identity, config.http_timeout(), renderer.clone())?;
        let extractor = ListingExtractor::new(&config.selectors)?;
        let pagination = PaginationParser::new(&config.selectors.pagination_button)?;
        let url_filter =
            UrlFilter::for_search(&Url::parse(&config.base_url)?, &config.exclude_patterns)?;

        Ok(Self {
            config,
            renderer,
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            pagination,
            url_filter,
        })
    }

    /// Search URL for `request`
    pub fn search_url(&self, request: &SearchRequest) -> String {
        QueryUrlBuilder::for_request(&self.config.base_url, &self.config.default_region, request)
            .build()
    }

    /// Render the search page with an infinite scroll and read its page links.
    ///
    /// Any failure yields an empty list.
    pub async fn discover_pages(&self, search_url: &str) -> Vec<String> {
        let parsed = match Url::parse(search_url) {
            Ok(url) => url,
            Err(e) => {
                ::log::error!("Invalid search URL {}: {}", search_url, e);
                return Vec::new();
            }
        };

        let scroll = InfiniteScroll::from_config(&self.config.browser);
        let routines: [&dyn Routine; 1] = [&scroll];

        match self.renderer.render(search_url, &routines).await {
            Some(html) => self.pagination.page_urls(&html, &parsed, &self.url_filter),
            None => {
                ::log::warn!("Page discovery failed for {}", search_url);
                Vec::new()
            }
        }
    }

    /// Fetch and extract every page with at most `max_concurrency` in flight.
    ///
    /// Listings arrive in page completion order. A page that fails or
    /// exceeds `page_timeout` contributes nothing; when `total_timeout_ms`
    /// expires the listings gathered so far are returned.
    pub async fn scrape_pages(&self, page_urls: Vec<String>) -> Vec<Listing> {
        let total_pages = page_urls.len();
        if total_pages == 0 {
            ::log::info!("No result pages to scrape");
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let (result_tx, mut result_rx) = mpsc::channel::<(String, Vec<Listing>)>(total_pages);
        let page_timeout = self.config.page_timeout();

        let mut handles = Vec::with_capacity(total_pages);
        for (page_id, url) in page_urls.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let result_tx = result_tx.clone();

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return;
                };
                ::log::debug!("Page {} acquired worker slot for: {}", page_id, url);

                let listings =
                    match timeout(page_timeout, scrape_page(page_id, &fetcher, &extractor, &url))
                        .await
                    {
                        Ok(listings) => listings,
                        Err(_) => {
                            ::log::error!("Timeout scraping page {}: {}", page_id, url);
                            Vec::new()
                        }
                    };

                if let Err(e) = result_tx.send((url, listings)).await {
                    ::log::debug!("Page {} result dropped: {}", page_id, e);
                }
            }));
        }

        // Channel closes once every worker has sent or died
        drop(result_tx);

        let deadline = self.config.total_timeout().map(|d| Instant::now() + d);
        let mut listings = Vec::new();
        let mut pages_done = 0;
        let mut timed_out = false;

        loop {
            let next = match deadline {
                Some(deadline) => match timeout_at(deadline, result_rx.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        timed_out = true;
                        break;
                    }
                },
                None => result_rx.recv().await,
            };
            let Some((url, page_listings)) = next else {
                break;
            };

            pages_done += 1;
            ::log::debug!(
                "Page done ({}/{}): {} listings from {}",
                pages_done,
                total_pages,
                page_listings.len(),
                url
            );
            listings.extend(page_listings);
        }

        if timed_out {
            ::log::warn!(
                "Total timeout reached with {}/{} pages done, returning partial results",
                pages_done,
                total_pages
            );
            for handle in &handles {
                handle.abort();
            }
        } else {
            for handle in handles {
                if let Err(e) = handle.await {
                    if e.is_panic() {
                        ::log::error!("Page worker panicked: {}", e);
                    }
                }
            }
        }

        listings
    }
}

#[async_trait]
impl Scraper for OlxScraper {
    fn name(&self) -> &'static str {
        "olx"
    }

    async fn scrape(&self, request: &SearchRequest) -> Vec<Listing> {
        let search_url = self.search_url(request);
        ::log::info!("Starting OLX search: {}", search_url);

        let page_urls = self.discover_pages(&search_url).await;
        let listings = self.scrape_pages(page_urls).await;

        ::log::info!(
            "OLX search for '{}' finished with {} listings",
            request.product_name(),
            listings.len()
        );
        listings
    }
}

/// Browser-fetch one results page and extract its listings
async fn scrape_page(
    page_id: usize,
    fetcher: &PageFetcher,
    extractor: &ListingExtractor,
    url: &str,
) -> Vec<Listing> {
    let start = std::time::Instant::now();

    let Some(html) = fetcher.fetch(url, FetchMode::Browser).await else {
        ::log::error!("Page {} returned no content: {}", page_id, url);
        return Vec::new();
    };

    let listings = extractor.extract(&html);
    ::log::info!(
        "Page {} yielded {} listings in {:.2} seconds",
        page_id,
        listings.len(),
        start.elapsed().as_secs_f64()
    );
    listings
}
