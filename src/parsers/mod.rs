pub mod listings;
pub mod pagination;

#[cfg(test)]
pub(crate) mod tests;

pub use listings::{CardError, ListingExtractor};
pub use pagination::PaginationParser;

use scraper::Selector;
use thiserror::Error;

/// Errors raised while preparing a parser
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Compile a CSS selector, keeping the offending text in the error
pub(crate) fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}
