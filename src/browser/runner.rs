use super::{BrowserError, BrowserSession, LivePage, Renderer, Routine};
use crate::config::{BrowserConfig, HttpIdentity};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::timeout;

/// Local WebDriver endpoints tried when the configured one refuses the connection
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444",
];

/// A fantoccini session. Closes itself when dropped without an explicit
/// close, e.g. when the owning task is aborted mid-navigation.
pub struct WebDriverSession {
    client: Client,
    closed: AtomicBool,
}

impl WebDriverSession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    fn page(&self) -> &dyn LivePage {
        &self.client
    }

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| classify_navigation_error(e, url))
    }

    async fn source(&self) -> Result<String, BrowserError> {
        Ok(self.client.source().await?)
    }

    async fn close(&self) -> Result<(), BrowserError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        Ok(self.client.clone().close().await?)
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let client = self.client.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = client.close().await {
                    ::log::debug!("Failed to close WebDriver session on drop: {}", e);
                }
            });
        }
    }
}

/// Runs routines against a page in a fresh headless browser session.
///
/// Every call opens its own session and closes it before returning, so
/// concurrent callers never share browser state.
#[derive(Debug, Clone)]
pub struct BrowserRunner {
    config: BrowserConfig,
    user_agent: String,
}

impl BrowserRunner {
    pub fn new(config: BrowserConfig, identity: &HttpIdentity) -> Self {
        Self {
            config,
            user_agent: identity.user_agent.clone(),
        }
    }

    /// Navigate to `url`, run `routines` in order and return the final HTML
    pub async fn run(&self, url: &str, routines: &[&dyn Routine]) -> Result<String, BrowserError> {
        let session = WebDriverSession::new(self.connect().await?);
        self.run_in(&session, url, routines).await
    }

    /// Drive an open session through one page, closing it whatever the outcome
    pub async fn run_in(
        &self,
        session: &dyn BrowserSession,
        url: &str,
        routines: &[&dyn Routine],
    ) -> Result<String, BrowserError> {
        let result = self.drive(session, url, routines).await;
        if let Err(e) = session.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }
        result
    }

    async fn drive(
        &self,
        session: &dyn BrowserSession,
        url: &str,
        routines: &[&dyn Routine],
    ) -> Result<String, BrowserError> {
        match timeout(self.config.navigation_timeout(), session.goto(url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(BrowserError::NavigationTimeout {
                    url: url.to_string(),
                });
            }
        }

        let run_routines = async {
            for routine in routines {
                ::log::debug!("Running routine {} on {}", routine.name(), url);
                routine.run(session.page()).await?;
            }
            Ok::<(), BrowserError>(())
        };
        match timeout(self.config.routine_timeout(), run_routines).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(BrowserError::Automation(format!(
                    "routines did not finish within {}s on {}",
                    self.config.routine_timeout, url
                )));
            }
        }

        session.source().await
    }

    /// Connects to the configured WebDriver, falling back to common local
    /// endpoints unless `try_fallback_drivers` is off
    async fn connect(&self) -> Result<Client, BrowserError> {
        let primary = self.config.webdriver_url.as_str();
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());

        let first_error = match builder.connect(primary).await {
            Ok(client) => {
                ::log::trace!("Connected to WebDriver at {}", primary);
                return Ok(client);
            }
            Err(e) => e.to_string(),
        };

        let fallbacks: &[&str] = if self.config.try_fallback_drivers {
            &FALLBACK_WEBDRIVER_URLS
        } else {
            &[]
        };
        for url in fallbacks.iter().filter(|url| **url != primary) {
            if let Ok(client) = builder.connect(url).await {
                ::log::info!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        Err(BrowserError::Connect {
            url: primary.to_string(),
            reason: first_error,
        })
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut args = vec![
            format!("--user-agent={}", self.user_agent),
            "--disable-gpu".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
        ];
        if self.config.headless {
            args.push("--headless=new".to_string());
        }

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        // Return once the DOM is parsed instead of waiting for every resource
        caps.insert("pageLoadStrategy".to_string(), json!("eager"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }
}

#[async_trait]
impl Renderer for BrowserRunner {
    async fn render(&self, url: &str, routines: &[&dyn Routine]) -> Option<String> {
        match self.run(url, routines).await {
            Ok(html) => {
                ::log::debug!("Rendered {} ({} bytes)", url, html.len());
                Some(html)
            }
            Err(e @ BrowserError::NavigationTimeout { .. }) => {
                ::log::error!("Timeout rendering {}: {}", url, e);
                None
            }
            Err(e) => {
                ::log::error!("Failed to render {}: {}", url, e);
                None
            }
        }
    }
}

fn classify_navigation_error(error: CmdError, url: &str) -> BrowserError {
    let message = error.to_string();
    if message.to_lowercase().contains("timeout") || message.contains("timed out") {
        BrowserError::NavigationTimeout {
            url: url.to_string(),
        }
    } else {
        BrowserError::Automation(format!("failed to load {}: {}", url, message))
    }
}
