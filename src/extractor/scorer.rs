//! Heuristic ranking of the `<img>` elements on a page.
//!
//! Score = (width + height) / 10, plus bonuses for "featured" wording in the
//! alt text or class, minus penalties for icons, logos, avatars and images
//! declared smaller than 50px on either side.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::extractor::url::resolve_url;

const FEATURED_ALT_KEYWORDS: [&str; 5] = ["main", "hero", "featured", "primary", "banner"];
const FEATURED_CLASS_KEYWORDS: [&str; 6] = ["main", "hero", "featured", "primary", "banner", "thumb"];
const DECORATIVE_KEYWORDS: [&str; 3] = ["icon", "logo", "avatar"];
const DECORATIVE_SRC_KEYWORDS: [&str; 2] = ["icon", "logo"];
const RASTER_HINTS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];
const LIKELY_IMAGE_EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".svg"];
const LIKELY_IMAGE_KEYWORDS: [&str; 3] = ["image", "img", "photo"];

const FEATURED_ALT_BONUS: i32 = 100;
const FEATURED_CLASS_BONUS: i32 = 50;
const DECORATIVE_PENALTY: i32 = 50;
const RASTER_BONUS: i32 = 20;
const TINY_PENALTY: i32 = 100;
const MIN_DIMENSION: i32 = 50;
// Declared sizes above this are clamped so scoring cannot overflow.
const MAX_DIMENSION: i32 = 100_000;

/// An `<img>` under consideration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// `src` as written in the markup.
    pub src: String,
    /// `src` resolved against the page URL.
    pub url: String,
    /// Declared width, 0 when missing or not a plain integer, clamped to
    /// `0..=100_000`.
    pub width: i32,
    pub height: i32,
    pub alt: String,
    pub class: String,
}

impl ImageCandidate {
    /// `None` for empty and inline `data:` sources.
    pub fn from_element(element: ElementRef<'_>, base: &Url) -> Option<Self> {
        let attrs = element.value();
        let src = attrs.attr("src")?.trim();
        if src.is_empty() || src.starts_with("data:") {
            return None;
        }

        Some(Self {
            src: src.to_string(),
            url: resolve_url(base, src),
            width: dimension(attrs.attr("width")),
            height: dimension(attrs.attr("height")),
            alt: attrs.attr("alt").unwrap_or_default().to_lowercase(),
            class: attrs.attr("class").unwrap_or_default().to_lowercase(),
        })
    }

    pub fn score(&self) -> i32 {
        let src = self.src.to_lowercase();
        let mut score = (self.width + self.height) / 10;

        if contains_any(&self.alt, &FEATURED_ALT_KEYWORDS) {
            score += FEATURED_ALT_BONUS;
        }
        if contains_any(&self.class, &FEATURED_CLASS_KEYWORDS) {
            score += FEATURED_CLASS_BONUS;
        }
        if contains_any(&self.alt, &DECORATIVE_KEYWORDS)
            || contains_any(&self.class, &DECORATIVE_KEYWORDS)
            || contains_any(&src, &DECORATIVE_SRC_KEYWORDS)
        {
            score -= DECORATIVE_PENALTY;
        }
        if contains_any(&src, &RASTER_HINTS) {
            score += RASTER_BONUS;
        }
        if self.width > 0
            && self.height > 0
            && (self.width < MIN_DIMENSION || self.height < MIN_DIMENSION)
        {
            score -= TINY_PENALTY;
        }

        score
    }
}

fn dimension(raw: Option<&str>) -> i32 {
    raw.and_then(|value| value.trim().parse::<i32>().ok())
        .map_or(0, |value| value.clamp(0, MAX_DIMENSION))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Whether a URL plausibly points at an image, by extension or wording.
pub fn looks_like_image(url: &str) -> bool {
    let url = url.to_lowercase();
    contains_any(&url, &LIKELY_IMAGE_EXTENSIONS) || contains_any(&url, &LIKELY_IMAGE_KEYWORDS)
}

/// All `<img src>` candidates in document order.
pub fn candidates(document: &Html, base: &Url) -> Vec<ImageCandidate> {
    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|element| ImageCandidate::from_element(element, base))
        .collect()
}

/// Pick a winner from `candidates`.
///
/// The strictly highest positive score wins, ties going to the earlier
/// candidate. With no positive score, the first candidate that looks like an
/// image is taken regardless of score.
pub fn pick_best(candidates: &[ImageCandidate]) -> Option<&ImageCandidate> {
    let mut best: Option<(&ImageCandidate, i32)> = None;
    for candidate in candidates {
        let score = candidate.score();
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((candidate, score));
        }
    }

    best.map(|(candidate, _)| candidate)
        .or_else(|| candidates.iter().find(|c| looks_like_image(&c.url)))
}

/// Absolute URL of the best image on the page, if any qualifies.
pub fn best_image(document: &Html, base: &Url) -> Option<String> {
    let candidates = candidates(document, base);
    pick_best(&candidates).map(|candidate| candidate.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/post/1").unwrap()
    }

    fn candidate(src: &str, width: i32, height: i32, alt: &str, class: &str) -> ImageCandidate {
        ImageCandidate {
            src: src.to_string(),
            url: resolve_url(&base(), src),
            width,
            height,
            alt: alt.to_string(),
            class: class.to_string(),
        }
    }

    #[test]
    fn hero_beats_icon() {
        let hero = candidate("/hero.jpg", 800, 600, "hero banner image", "");
        let icon = candidate("/site-icon.png", 16, 16, "site icon", "");

        assert_eq!(hero.score(), 140 + 100 + 20);
        assert_eq!(icon.score(), 3 - 50 + 20 - 100);

        let list = vec![icon, hero.clone()];
        assert_eq!(pick_best(&list), Some(&hero));
    }

    #[test]
    fn class_bonus_and_missing_dimensions() {
        let thumb = candidate("/p/1", 0, 0, "", "post-thumb");
        assert_eq!(thumb.score(), 50);
    }

    #[test]
    fn tiny_penalty_needs_both_dimensions() {
        let only_width = candidate("/a.gif", 10, 0, "", "");
        assert_eq!(only_width.score(), 1);
        let both = candidate("/a.gif", 10, 400, "", "");
        assert_eq!(both.score(), 41 - 100);
    }

    #[test]
    fn ties_go_to_first() {
        let first = candidate("/one.jpg", 300, 300, "", "");
        let second = candidate("/two.jpg", 300, 300, "", "");
        let list = vec![first.clone(), second];
        assert_eq!(pick_best(&list), Some(&first));
    }

    #[test]
    fn falls_back_to_first_likely_image() {
        let list = vec![
            candidate("/tracking", 1, 1, "", ""),
            candidate("/logo.svg", 20, 20, "logo", ""),
            candidate("/photos/42", 20, 20, "", ""),
        ];
        // every score is negative; "/logo.svg" is the first to look like an image
        assert!(list.iter().all(|c| c.score() <= 0));
        assert_eq!(pick_best(&list).map(|c| c.src.as_str()), Some("/logo.svg"));
    }

    #[test]
    fn nothing_qualifies() {
        let list = vec![candidate("/pixel", 1, 1, "", "")];
        assert_eq!(pick_best(&list), None);
        assert_eq!(pick_best(&[]), None);
    }

    #[test]
    fn skips_inline_and_empty_sources() {
        let html = r#"<html><body>
            <img src="data:image/gif;base64,R0lGODlhAQABAAAAACw=">
            <img src="">
            <img src="cover.jpg" width="640" height="480" alt="Cover">
        </body></html>"#;
        let document = Html::parse_document(html);
        let found = candidates(&document, &base());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://example.com/cover.jpg");
        assert_eq!(
            best_image(&document, &base()).as_deref(),
            Some("https://example.com/cover.jpg")
        );
    }

    #[test]
    fn huge_declared_dimensions_do_not_overflow() {
        let html = r#"<img src="/a.jpg" width="2147483647" height="2147483647" alt="hero">
            <img src="/b.jpg" width="800" height="600">"#;
        let document = Html::parse_document(html);
        let found = candidates(&document, &base());
        assert_eq!((found[0].width, found[0].height), (100_000, 100_000));
        assert_eq!(found[0].score(), 20_000 + 100 + 20);
        assert_eq!(
            best_image(&document, &base()).as_deref(),
            Some("https://example.com/a.jpg")
        );
    }

    #[test]
    fn negative_dimensions_count_as_zero() {
        let document = Html::parse_document(r#"<img src="/x.png" width="-900" height="300">"#);
        let found = candidates(&document, &base());
        assert_eq!((found[0].width, found[0].height), (0, 300));
    }

    #[test]
    fn non_numeric_dimensions_count_as_zero() {
        let html = r#"<img src="/a.jpg" width="100%" height="auto">"#;
        let document = Html::parse_document(html);
        let found = candidates(&document, &base());
        assert_eq!((found[0].width, found[0].height), (0, 0));
    }
}
