use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordering requested for the search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Site default ordering
    #[default]
    Relevance,
    /// Most recently posted first
    Newest,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
}

/// Reasons a search request is rejected before any scraping starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("product name must not be empty")]
    EmptyProductName,

    #[error("min_price and max_price must be given together (min: {min:?}, max: {max:?})")]
    PartialPriceRange { min: Option<u64>, max: Option<u64> },
}

/// Immutable input to one scrape run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    product_name: String,
    price_range: Option<(u64, u64)>,
    sort: SortOrder,
    region: Option<String>,
}

impl SearchRequest {
    /// Validate and build a request.
    ///
    /// The product name is trimmed; a price range must carry both bounds or
    /// neither. Bounds are not compared against each other.
    pub fn new(
        product_name: &str,
        min_price: Option<u64>,
        max_price: Option<u64>,
        sort: SortOrder,
        region: Option<String>,
    ) -> Result<Self, RequestError> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(RequestError::EmptyProductName);
        }

        let price_range = match (min_price, max_price) {
            (Some(min), Some(max)) => Some((min, max)),
            (None, None) => None,
            (min, max) => return Err(RequestError::PartialPriceRange { min, max }),
        };

        Ok(Self {
            product_name: product_name.to_string(),
            price_range,
            sort,
            region: region.filter(|r| !r.trim().is_empty()),
        })
    }

    /// Request for a product name with no filters and relevance ordering
    pub fn for_product(product_name: &str) -> Result<Self, RequestError> {
        Self::new(product_name, None, None, SortOrder::Relevance, None)
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn min_price(&self) -> Option<u64> {
        self.price_range.map(|(min, _)| min)
    }

    pub fn max_price(&self) -> Option<u64> {
        self.price_range.map(|(_, max)| max)
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Region code, falling back to `default_region` when none was requested
    pub fn region_or<'a>(&'a self, default_region: &'a str) -> &'a str {
        self.region.as_deref().unwrap_or(default_region)
    }
}
