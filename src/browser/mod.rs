pub mod routines;
pub mod runner;

pub use routines::{InfiniteScroll, ScrollOutcome};
pub use runner::{BrowserRunner, WebDriverSession};

use async_trait::async_trait;
use fantoccini::Client;
use fantoccini::error::CmdError;
use thiserror::Error;

/// Failures raised by the automation layer
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("could not connect to WebDriver at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("timed out loading {url}")]
    NavigationTimeout { url: String },

    #[error("automation failed: {0}")]
    Automation(String),
}

impl From<CmdError> for BrowserError {
    fn from(error: CmdError) -> Self {
        BrowserError::Automation(error.to_string())
    }
}

/// Operations a routine may perform on a loaded page
#[async_trait]
pub trait LivePage: Send + Sync {
    /// Current scrollable height of the document body in pixels
    async fn scroll_height(&self) -> Result<u64, BrowserError>;

    /// Scroll the window down by `pixels`
    async fn scroll_by(&self, pixels: u32) -> Result<(), BrowserError>;
}

/// A page-manipulation step run against a live page before its HTML is captured
#[async_trait]
pub trait Routine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, page: &dyn LivePage) -> Result<(), BrowserError>;
}

/// One open browser session that a runner drives a single page through
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// The page routines act on once navigation has finished
    fn page(&self) -> &dyn LivePage;

    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Serialized HTML of the current document
    async fn source(&self) -> Result<String, BrowserError>;

    /// Release the session. Closing twice is a no-op.
    async fn close(&self) -> Result<(), BrowserError>;
}

/// Anything that can turn a URL into rendered HTML.
///
/// Returns `None` when no content could be obtained; callers treat that as an
/// empty page rather than a fatal error.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &str, routines: &[&dyn Routine]) -> Option<String>;
}

#[async_trait]
impl LivePage for Client {
    async fn scroll_height(&self) -> Result<u64, BrowserError> {
        let value = self
            .execute("return document.body.scrollHeight;", vec![])
            .await?;

        value
            .as_u64()
            .or_else(|| value.as_f64().map(|height| height as u64))
            .ok_or_else(|| BrowserError::Automation(format!("unexpected scroll height: {value}")))
    }

    async fn scroll_by(&self, pixels: u32) -> Result<(), BrowserError> {
        self.execute(
            "window.scrollBy(0, arguments[0]);",
            vec![serde_json::json!(pixels)],
        )
        .await?;
        Ok(())
    }
}
