use serde::{Deserialize, Serialize};

/// A single product listing extracted from a results page.
///
/// Values are raw text as rendered by the site; prices and dates are not
/// parsed because their formatting varies between cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    title: String,
    price: String,
    location: String,
    posted_date: String,
    image_url: Option<String>,
    detail_link: Option<String>,
}

impl Listing {
    /// Create a new listing
    pub fn new(
        title: String,
        price: String,
        location: String,
        posted_date: String,
        image_url: Option<String>,
        detail_link: Option<String>,
    ) -> Self {
        Self {
            title,
            price,
            location,
            posted_date,
            image_url,
            detail_link,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn posted_date(&self) -> &str {
        &self.posted_date
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn detail_link(&self) -> Option<&str> {
        self.detail_link.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_record() {
        let listing = Listing::new(
            "PS4 Slim".to_string(),
            "R$ 900".to_string(),
            "Goiânia - GO".to_string(),
            "Hoje, 10:32".to_string(),
            None,
            Some("https://go.olx.com.br/item/1".to_string()),
        );

        let value = serde_json::to_value(&listing).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "detail_link",
                "image_url",
                "location",
                "posted_date",
                "price",
                "title"
            ]
        );
        assert!(object["image_url"].is_null());
        assert_eq!(object["detail_link"], "https://go.olx.com.br/item/1");
    }
}
