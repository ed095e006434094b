use crate::filter::UrlFilter;
use crate::parsers::{ExtractError, compile};
use crate::utils::resolve_href;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Reads result-page URLs out of the pagination controls of a search page
#[derive(Debug)]
pub struct PaginationParser {
    button: Selector,
    anchor: Selector,
}

impl PaginationParser {
    pub fn new(button_selector: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            button: compile(button_selector)?,
            anchor: compile("a[href]")?,
        })
    }

    /// Page URLs in the order their controls appear, each listed once.
    ///
    /// Relative links are resolved against `search_url`; links rejected by
    /// `filter` and controls without an anchor are ignored.
    pub fn page_urls(&self, html: &str, search_url: &Url, filter: &UrlFilter) -> Vec<String> {
        let doc = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for button in doc.select(&self.button) {
            let Some(href) = button
                .select(&self.anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                continue;
            };

            let Some(resolved) = resolve_href(search_url, href) else {
                ::log::debug!("Ignoring unresolvable page link: {}", href);
                continue;
            };

            if !filter.should_fetch(&resolved) {
                ::log::debug!("URL filter rejected page link: {}", resolved);
                continue;
            }

            let normalized = filter.normalize_url(&resolved).to_string();
            if seen.insert(normalized.clone()) {
                urls.push(normalized);
            }
        }

        ::log::info!("Found {} result pages from {}", urls.len(), search_url);
        urls
    }
}
