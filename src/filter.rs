use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for filtering discovered page URLs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Host every page URL must belong to (if None, any host is accepted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_domain: Option<String>,

    /// Regex patterns for URLs to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Decides which pagination links are followed
#[derive(Debug)]
pub struct UrlFilter {
    config: UrlFilterConfig,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter from configuration
    pub fn new(config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            config,
            exclude_regexes,
        })
    }

    /// Filter restricted to the host of `search_url`
    pub fn for_search(search_url: &Url, exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        Self::new(UrlFilterConfig {
            required_domain: search_url.host_str().map(|h| h.to_string()),
            exclude_patterns: exclude_patterns.to_vec(),
        })
    }

    /// Determine if a page URL should be fetched
    pub fn should_fetch(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if let Some(required_domain) = &self.config.required_domain {
            if url.host_str() != Some(required_domain.as_str()) {
                return false;
            }
        }

        let url_str = url.as_str();
        !self.exclude_regexes.iter().any(|regex| regex.is_match(url_str))
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_restriction() {
        let search = Url::parse("https://www.olx.com.br/estado-go?q=ps4").unwrap();
        let filter = UrlFilter::for_search(&search, &[]).unwrap();

        let same_host = Url::parse("https://www.olx.com.br/estado-go?q=ps4&o=2").unwrap();
        assert!(filter.should_fetch(&same_host));

        let other_host = Url::parse("https://ads.example.com/estado-go?o=2").unwrap();
        assert!(!filter.should_fetch(&other_host));
    }

    #[test]
    fn test_non_http_schemes_are_rejected() {
        let filter = UrlFilter::new(UrlFilterConfig::default()).unwrap();
        let script = Url::parse("javascript:void(0)").unwrap();
        assert!(!filter.should_fetch(&script));
    }

    #[test]
    fn test_exclude_patterns() {
        let search = Url::parse("https://www.olx.com.br/estado-go").unwrap();
        let filter = UrlFilter::for_search(&search, &[r"[?&]o=1(&|$)".to_string()]).unwrap();

        let first = Url::parse("https://www.olx.com.br/estado-go?q=ps4&o=1").unwrap();
        assert!(!filter.should_fetch(&first));

        let tenth = Url::parse("https://www.olx.com.br/estado-go?q=ps4&o=10").unwrap();
        assert!(filter.should_fetch(&tenth));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let config = UrlFilterConfig {
            required_domain: None,
            exclude_patterns: vec!["(unclosed".to_string()],
        };
        assert!(UrlFilter::new(config).is_err());
    }

    #[test]
    fn test_normalize_strips_fragment() {
        let filter = UrlFilter::new(UrlFilterConfig::default()).unwrap();
        let url = Url::parse("https://www.olx.com.br/estado-go?o=2#top").unwrap();
        assert_eq!(
            filter.normalize_url(&url).as_str(),
            "https://www.olx.com.br/estado-go?o=2"
        );
    }
}
