use crate::config::ListingSelectors;
use crate::parsers::{ExtractError, compile};
use crate::results::Listing;
use crate::utils::element_text;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// A card that lacks one of the fields a listing requires
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("card {index} has no {field}")]
pub struct CardError {
    /// Position of the card within the results container
    pub index: usize,
    pub field: &'static str,
}

/// Turns a rendered results page into listings
#[derive(Debug)]
pub struct ListingExtractor {
    container: Selector,
    card: Selector,
    title: Selector,
    price: Selector,
    location: Selector,
    date: Selector,
    link: Selector,
    image: Selector,
}

impl ListingExtractor {
    pub fn new(selectors: &ListingSelectors) -> Result<Self, ExtractError> {
        Ok(Self {
            container: compile(&selectors.container)?,
            card: compile(&selectors.card)?,
            title: compile(&selectors.title)?,
            price: compile(&selectors.price)?,
            location: compile(&selectors.location)?,
            date: compile(&selectors.date)?,
            link: compile(&selectors.link)?,
            image: compile(&selectors.image)?,
        })
    }

    /// Extract listings, skipping cards that miss a required field.
    ///
    /// Skipped cards are logged with the field they lacked. A page without the
    /// results container yields no listings.
    pub fn extract(&self, html: &str) -> Vec<Listing> {
        let listings: Vec<Listing> = self
            .extract_cards(html)
            .into_iter()
            .filter_map(|card| match card {
                Ok(listing) => Some(listing),
                Err(e) => {
                    ::log::warn!("Skipping malformed listing: {}", e);
                    None
                }
            })
            .collect();

        ::log::debug!("Extracted {} listings", listings.len());
        listings
    }

    /// One result per card in document order
    pub fn extract_cards(&self, html: &str) -> Vec<Result<Listing, CardError>> {
        let doc = Html::parse_document(html);

        let Some(container) = doc.select(&self.container).next() else {
            ::log::debug!("No listing container found on page");
            return Vec::new();
        };

        container
            .select(&self.card)
            .enumerate()
            .map(|(index, card)| self.extract_card(index, card))
            .collect()
    }

    fn extract_card(&self, index: usize, card: ElementRef<'_>) -> Result<Listing, CardError> {
        let title = required_text(card, &self.title, index, "title")?;
        let price = required_text(card, &self.price, index, "price")?;
        let location = required_text(card, &self.location, index, "location")?;
        let posted_date = required_text(card, &self.date, index, "date")?;

        let image_url = first_attr(card, &self.image, "src");
        let detail_link = first_attr(card, &self.link, "href");

        Ok(Listing::new(
            title,
            price,
            location,
            posted_date,
            image_url,
            detail_link,
        ))
    }
}

fn required_text(
    card: ElementRef<'_>,
    selector: &Selector,
    index: usize,
    field: &'static str,
) -> Result<String, CardError> {
    card.select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .ok_or(CardError { index, field })
}

fn first_attr(card: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    card.select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
