use crate::config::ListingSelectors;
use crate::parsers::tests::fixtures::{card, results_page};
use crate::parsers::{CardError, ExtractError, ListingExtractor};

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ListingExtractor {
        ListingExtractor::new(&ListingSelectors::default()).unwrap()
    }

    #[test]
    fn test_extracts_cards_in_document_order() {
        let html = results_page(&[
            card("PS4 Slim 1TB", "R$ 1.000"),
            card("PS4 Pro", "R$ 1.800"),
            card("Controle PS4", "R$ 150"),
        ]);

        let listings = extractor().extract(&html);

        assert_eq!(listings.len(), 3);
        let titles: Vec<&str> = listings.iter().map(|l| l.title()).collect();
        assert_eq!(titles, vec!["PS4 Slim 1TB", "PS4 Pro", "Controle PS4"]);

        let first = &listings[0];
        assert_eq!(first.price(), "R$ 1.000");
        assert_eq!(first.location(), "Goiânia, Setor Bueno");
        assert_eq!(first.posted_date(), "Hoje, 10:32");
        assert_eq!(
            first.image_url(),
            Some("https://img.olx.com.br/ps4-slim-1tb.webp")
        );
        assert_eq!(
            first.detail_link(),
            Some("https://go.olx.com.br/item/ps4-slim-1tb")
        );
    }

    #[test]
    fn test_missing_container_yields_nothing() {
        let html = "<html><body><p>Nenhum anúncio encontrado</p></body></html>";
        assert!(extractor().extract(html).is_empty());
        assert!(extractor().extract_cards(html).is_empty());
    }

    #[test]
    fn test_container_without_cards_yields_nothing() {
        let html = results_page(&[]);
        assert!(extractor().extract(&html).is_empty());
    }

    #[test]
    fn test_inline_markup_is_not_split_apart() {
        let html = results_page(&[r#"<section class="olx-adcard">
            <h2 class="olx-adcard__title">PS<b>4</b> Slim</h2>
            <h3 class="olx-adcard__price">R$ 1.<span>200</span></h3>
            <p class="olx-adcard__location">Goiânia, <em>Setor</em>  Bueno</p>
            <p class="olx-adcard__date">Hoje,
                10:32</p>
        </section>"#
            .to_string()]);

        let listings = extractor().extract(&html);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title(), "PS4 Slim");
        assert_eq!(listings[0].price(), "R$ 1.200");
        assert_eq!(listings[0].location(), "Goiânia, Setor Bueno");
        assert_eq!(listings[0].posted_date(), "Hoje, 10:32");
    }

    #[test]
    fn test_optional_image_and_link() {
        let bare = r#"<section class="olx-adcard">
            <h2 class="olx-adcard__title">Xbox One</h2>
            <h3 class="olx-adcard__price">R$ 700</h3>
            <p class="olx-adcard__location">Anápolis</p>
            <p class="olx-adcard__date">Ontem</p>
        </section>"#;
        let html = results_page(&[bare.to_string()]);

        let listings = extractor().extract(&html);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title(), "Xbox One");
        assert_eq!(listings[0].image_url(), None);
        assert_eq!(listings[0].detail_link(), None);
    }

    #[test]
    fn test_malformed_card_is_skipped_without_affecting_siblings() {
        let no_price = r#"<section class="olx-adcard">
            <h2 class="olx-adcard__title">Sem preço</h2>
            <p class="olx-adcard__location">Goiânia</p>
            <p class="olx-adcard__date">Hoje</p>
        </section>"#;
        let blank_title = card("   ", "R$ 10");
        let html = results_page(&[
            card("PS4 Slim", "R$ 900"),
            no_price.to_string(),
            blank_title,
            card("PS4 Fat", "R$ 600"),
        ]);

        let results = extractor().extract_cards(&html);
        assert_eq!(results.len(), 4);
        assert_eq!(
            results[1],
            Err(CardError {
                index: 1,
                field: "price"
            })
        );
        assert_eq!(
            results[2],
            Err(CardError {
                index: 2,
                field: "title"
            })
        );

        let listings = extractor().extract(&html);
        let titles: Vec<&str> = listings.iter().map(|l| l.title()).collect();
        assert_eq!(titles, vec!["PS4 Slim", "PS4 Fat"]);
    }

    #[test]
    fn test_cards_outside_container_are_ignored() {
        let html = format!(
            "<html><body><aside>{}</aside>{}</body></html>",
            card("Anúncio patrocinado", "R$ 1"),
            results_page(&[card("PS4", "R$ 800")])
        );

        let listings = extractor().extract(&html);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title(), "PS4");
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let selectors = ListingSelectors {
            card: "section[class*=".to_string(),
            ..ListingSelectors::default()
        };
        let err = ListingExtractor::new(&selectors).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::InvalidSelector { ref selector, .. } if selector == "section[class*="
        ));
    }
}
