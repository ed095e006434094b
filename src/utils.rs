use scraper::ElementRef;
use url::Url;

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with whitespace normalized.
///
/// Text nodes are concatenated as they appear, so inline markup never adds
/// spaces that the page does not show.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

/// Resolve an href found on `base` into an absolute URL
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}
