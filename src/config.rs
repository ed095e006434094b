use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP identity presented on every static request.
///
/// Built once and handed to each fetcher; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpIdentity {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default = "default_referer")]
    pub referer: String,
}

impl Default for HttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            referer: default_referer(),
        }
    }
}

/// Settings for the WebDriver-backed browser and its routines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Try common local WebDriver endpoints when `webdriver_url` refuses
    #[serde(default = "default_true")]
    pub try_fallback_drivers: bool,

    /// Run the browser without a window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Navigation timeout in seconds
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout: u64,

    /// Time budget in seconds for all routines on one page
    #[serde(default = "default_routine_timeout")]
    pub routine_timeout: u64,

    /// Pixels scrolled per infinite-scroll step
    #[serde(default = "default_scroll_step")]
    pub scroll_step_px: u32,

    /// Delay in milliseconds after each scroll step
    #[serde(default = "default_scroll_delay")]
    pub scroll_delay_ms: u64,

    /// Give up scrolling after this many steps
    #[serde(default = "default_max_scroll_steps")]
    pub max_scroll_steps: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            try_fallback_drivers: true,
            headless: true,
            navigation_timeout: default_navigation_timeout(),
            routine_timeout: default_routine_timeout(),
            scroll_step_px: default_scroll_step(),
            scroll_delay_ms: default_scroll_delay(),
            max_scroll_steps: default_max_scroll_steps(),
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout)
    }

    pub fn routine_timeout(&self) -> Duration {
        Duration::from_secs(self.routine_timeout)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }
}

/// CSS selectors used to locate listings and pagination.
///
/// Class attributes on the site carry generated suffixes, so every selector
/// matches on a class substring rather than an exact class name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    #[serde(default = "default_container_selector")]
    pub container: String,
    #[serde(default = "default_card_selector")]
    pub card: String,
    #[serde(default = "default_title_selector")]
    pub title: String,
    #[serde(default = "default_price_selector")]
    pub price: String,
    #[serde(default = "default_location_selector")]
    pub location: String,
    #[serde(default = "default_date_selector")]
    pub date: String,
    #[serde(default = "default_link_selector")]
    pub link: String,
    #[serde(default = "default_image_selector")]
    pub image: String,
    #[serde(default = "default_pagination_selector")]
    pub pagination_button: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: default_container_selector(),
            card: default_card_selector(),
            title: default_title_selector(),
            price: default_price_selector(),
            location: default_location_selector(),
            date: default_date_selector(),
            link: default_link_selector(),
            image: default_image_selector(),
            pagination_button: default_pagination_selector(),
        }
    }
}

/// Configuration for the listing scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site root that region paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Region used when a request names none
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Maximum number of result pages fetched at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Upper bound in seconds for one page's fetch and extraction
    #[serde(default = "default_page_timeout")]
    pub page_timeout: u64,

    /// Optional upper bound in milliseconds for the whole batch of pages
    #[serde(default)]
    pub total_timeout_ms: Option<u64>,

    /// Timeout in seconds for static HTTP fetches
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,

    /// Regex patterns for page URLs to skip
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    #[serde(default)]
    pub identity: HttpIdentity,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub selectors: ListingSelectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_region: default_region(),
            max_concurrency: default_max_concurrency(),
            page_timeout: default_page_timeout(),
            total_timeout_ms: None,
            http_timeout: default_http_timeout(),
            exclude_patterns: Vec::new(),
            identity: HttpIdentity::default(),
            browser: BrowserConfig::default(),
            selectors: ListingSelectors::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `WEBDRIVER_URL` and `OLX_SCRAPER_BASE_URL` (or its short form
    /// `OLX_BASE_URL`) from the environment when set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`; empty values are ignored
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(webdriver_url) = non_empty("WEBDRIVER_URL") {
            self.browser.webdriver_url = webdriver_url;
        }
        if let Some(base_url) = BASE_URL_VARS.into_iter().find_map(non_empty) {
            self.base_url = base_url;
        }
        self
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout)
    }

    pub fn total_timeout(&self) -> Option<Duration> {
        self.total_timeout_ms.map(Duration::from_millis)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

/// Environment variables naming the site root, in order of precedence
const BASE_URL_VARS: [&str; 2] = ["OLX_SCRAPER_BASE_URL", "OLX_BASE_URL"];

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://www.olx.com.br".to_string()
}

fn default_region() -> String {
    "go".to_string()
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    4
}

fn default_page_timeout() -> u64 {
    90
}

fn default_http_timeout() -> u64 {
    15
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_navigation_timeout() -> u64 {
    60
}

fn default_routine_timeout() -> u64 {
    120
}

fn default_scroll_step() -> u32 {
    1000
}

fn default_scroll_delay() -> u64 {
    1000
}

fn default_max_scroll_steps() -> usize {
    50
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7".to_string()
}

fn default_referer() -> String {
    "https://www.google.com/".to_string()
}

fn default_container_selector() -> String {
    r#"div[class*="adListContainer"]"#.to_string()
}

fn default_card_selector() -> String {
    r#"section[class*="olx-adcard"]"#.to_string()
}

fn default_title_selector() -> String {
    r#"h2[class*="olx-adcard__title"]"#.to_string()
}

fn default_price_selector() -> String {
    r#"h3[class*="olx-adcard__price"]"#.to_string()
}

fn default_location_selector() -> String {
    r#"p[class*="adcard__location"]"#.to_string()
}

fn default_date_selector() -> String {
    r#"p[class*="olx-adcard__date"]"#.to_string()
}

fn default_link_selector() -> String {
    r#"a[class*="olx-adcard__link"]"#.to_string()
}

fn default_image_selector() -> String {
    "img".to_string()
}

fn default_pagination_selector() -> String {
    r#"button[class*="Pagination_pageButton"]"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ScraperConfig::from_json(
            r#"{"max_concurrency": 2, "browser": {"scroll_delay_ms": 10}}"#,
        )
        .unwrap();

        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.default_region, "go");
        assert_eq!(config.browser.scroll_delay(), Duration::from_millis(10));
        assert_eq!(config.browser.scroll_step_px, 1000);
        assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
        assert_eq!(config.identity, HttpIdentity::default());
        assert_eq!(config.selectors.card, r#"section[class*="olx-adcard"]"#);
        assert!(config.total_timeout().is_none());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            ScraperConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_total_timeout_keeps_milliseconds() {
        let config = ScraperConfig::from_json(r#"{"total_timeout_ms": 1500}"#).unwrap();
        assert_eq!(config.total_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_env_overrides_accept_both_base_url_names() {
        fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
            move |key: &str| {
                pairs
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v.to_string())
            }
        }

        let config = ScraperConfig::default()
            .with_overrides_from(env(&[("OLX_SCRAPER_BASE_URL", "http://mirror.test")]));
        assert_eq!(config.base_url, "http://mirror.test");

        let config =
            ScraperConfig::default().with_overrides_from(env(&[("OLX_BASE_URL", "http://short.test")]));
        assert_eq!(config.base_url, "http://short.test");

        let config = ScraperConfig::default().with_overrides_from(env(&[
            ("OLX_BASE_URL", "http://short.test"),
            ("OLX_SCRAPER_BASE_URL", "http://mirror.test"),
            ("WEBDRIVER_URL", "http://driver:9515"),
        ]));
        assert_eq!(config.base_url, "http://mirror.test");
        assert_eq!(config.browser.webdriver_url, "http://driver:9515");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config = ScraperConfig::default().with_overrides_from(|key| {
            (key == "OLX_SCRAPER_BASE_URL" || key == "WEBDRIVER_URL").then(String::new)
        });
        assert_eq!(config.base_url, "https://www.olx.com.br");
        assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            ScraperConfig::from_file("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
