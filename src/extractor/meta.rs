use scraper::{Html, Selector};

/// Preview-image tags, highest priority first: Open Graph, Twitter card,
/// generic `name=image`, schema.org `itemprop=image`.
pub const META_IMAGE_SELECTORS: [&str; 4] = [
    r#"meta[property="og:image"]"#,
    r#"meta[name="twitter:image"]"#,
    r#"meta[name="image"]"#,
    r#"meta[itemprop="image"]"#,
];

/// First non-empty `content` across the tag families, in priority order.
/// The value is returned as written; callers resolve it.
pub fn first_meta_image(document: &Html) -> Option<String> {
    META_IMAGE_SELECTORS.iter().find_map(|selector_str| {
        let selector = Selector::parse(selector_str).ok()?;
        document.select(&selector).find_map(|element| {
            element
                .value()
                .attr("content")
                .map(str::trim)
                .filter(|content| !content.is_empty())
                .map(str::to_string)
        })
    })
}
