use crate::request::{SearchRequest, SortOrder};
use url::form_urlencoded;

/// Fluent builder for search result URLs.
///
/// Parameters keep the order in which they were first set. No validation is
/// performed on the values.
#[derive(Debug, Clone)]
pub struct QueryUrlBuilder {
    base_url: String,
    params: Vec<(&'static str, String)>,
}

impl QueryUrlBuilder {
    /// Create a builder for the given site base and region code
    pub fn new(base_url: &str, region: &str) -> Self {
        Self {
            base_url: format!("{}/estado-{}", base_url.trim_end_matches('/'), region),
            params: Vec::new(),
        }
    }

    /// Create a builder with every filter of `request` applied
    pub fn for_request(base_url: &str, default_region: &str, request: &SearchRequest) -> Self {
        let mut builder = Self::new(base_url, request.region_or(default_region))
            .with_query(request.product_name())
            .with_price_range(request.min_price(), request.max_price());

        // Price orderings have no URL parameter on the site
        if request.sort() == SortOrder::Newest {
            builder = builder.sort_by_date();
        }
        builder
    }

    /// Set the free-text search term
    pub fn with_query(self, query: &str) -> Self {
        self.set("q", query.to_string())
    }

    /// Set an inclusive price range; skipped unless both bounds are present
    pub fn with_price_range(self, min_price: Option<u64>, max_price: Option<u64>) -> Self {
        match (min_price, max_price) {
            (Some(min), Some(max)) => self.set("ps", min.to_string()).set("pe", max.to_string()),
            _ => self,
        }
    }

    /// Order by most recent first
    pub fn sort_by_date(self) -> Self {
        self.set("sf", "1".to_string())
    }

    /// Assemble the final URL
    pub fn build(&self) -> String {
        if self.params.is_empty() {
            return self.base_url.clone();
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{}?{}", self.base_url, query)
    }

    fn set(mut self, key: &'static str, value: String) -> Self {
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(param) => param.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.olx.com.br";

    #[test]
    fn test_build_without_params_returns_base() {
        let builder = QueryUrlBuilder::new(BASE, "go");
        assert_eq!(builder.build(), "https://www.olx.com.br/estado-go");
    }

    #[test]
    fn test_full_query() {
        let url = QueryUrlBuilder::new(BASE, "go")
            .with_query("ps4")
            .with_price_range(Some(100), Some(1000))
            .sort_by_date()
            .build();
        assert_eq!(url, "https://www.olx.com.br/estado-go?q=ps4&ps=100&pe=1000&sf=1");
    }

    #[test]
    fn test_partial_price_range_is_omitted() {
        let url = QueryUrlBuilder::new(BASE, "go")
            .with_query("ps4")
            .with_price_range(Some(100), None)
            .build();
        assert_eq!(url, "https://www.olx.com.br/estado-go?q=ps4");
    }

    #[test]
    fn test_inverted_range_is_emitted_verbatim() {
        let url = QueryUrlBuilder::new(BASE, "go")
            .with_price_range(Some(1000), Some(100))
            .build();
        assert_eq!(url, "https://www.olx.com.br/estado-go?ps=1000&pe=100");
    }

    #[test]
    fn test_build_is_idempotent() {
        let builder = QueryUrlBuilder::new(BASE, "sp").with_query("xbox one");
        assert_eq!(builder.build(), builder.build());
    }

    #[test]
    fn test_query_overwrites_in_place_and_encodes() {
        let url = QueryUrlBuilder::new(BASE, "go")
            .with_query("ps4")
            .sort_by_date()
            .with_query("câmera digital")
            .build();
        assert_eq!(
            url,
            "https://www.olx.com.br/estado-go?q=c%C3%A2mera+digital&sf=1"
        );
    }

    #[test]
    fn test_for_request_maps_sort_orders() {
        let newest =
            SearchRequest::new("ps4", Some(100), Some(1000), SortOrder::Newest, None).unwrap();
        assert_eq!(
            QueryUrlBuilder::for_request(BASE, "go", &newest).build(),
            "https://www.olx.com.br/estado-go?q=ps4&ps=100&pe=1000&sf=1"
        );

        let cheapest =
            SearchRequest::new("ps4", None, None, SortOrder::PriceAsc, Some("rj".into())).unwrap();
        assert_eq!(
            QueryUrlBuilder::for_request(BASE, "go", &cheapest).build(),
            "https://www.olx.com.br/estado-rj?q=ps4"
        );
    }
}
