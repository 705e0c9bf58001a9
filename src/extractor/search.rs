use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::extractor::{
    Strategy,
    model::{Miss, ResolutionPath, ResolvedImageUrl},
    url::resolve_url,
};
use crate::fetcher::fetch_page;

/// Query parameters carrying the original image location, in order.
const IMAGE_PARAMS: [&str; 2] = ["imgurl", "url"];

/// Hosts whose images on a results page are almost always the real result.
const OFFSITE_IMAGE_HOSTS: [&str; 4] = [
    "twimg.com",
    "imgur.com",
    "reddit.com",
    "githubusercontent.com",
];

/// Search engine's own hosts; their images are thumbnails and chrome.
const ENGINE_HOST_MARKERS: [&str; 2] = ["google", "gstatic"];

/// Handles search-engine image-redirect links (`/imgres?imgurl=…`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchRedirectExtractor;

#[async_trait]
impl Strategy for SearchRedirectExtractor {
    fn name(&self) -> &'static str {
        "search_redirect"
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn extract(&self, url: &Url, config: &Config) -> Result<ResolvedImageUrl, Miss> {
        if let Some(image) = image_param(url) {
            return Ok(ResolvedImageUrl::new(
                image,
                ResolutionPath::SearchRedirectParam,
            ));
        }

        debug!("no image parameter, scanning the redirect page");
        let page = fetch_page(url.as_str(), config).await?;
        offsite_image(&page.body_utf8, &page.url_final)
            .map(|image| ResolvedImageUrl::new(image, ResolutionPath::SearchRedirectPage))
            .ok_or_else(|| Miss::NoCandidate(page.url_final.to_string()))
    }
}

/// The decoded value of the first non-empty image parameter. Returned as-is.
pub fn image_param(url: &Url) -> Option<String> {
    IMAGE_PARAMS.iter().find_map(|wanted| {
        url.query_pairs()
            .find(|(key, value)| key == *wanted && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })
}

fn host_of(src: &str) -> Option<String> {
    Url::parse(src)
        .ok()?
        .host_str()
        .map(str::to_ascii_lowercase)
}

fn on_host(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn is_offsite_host(src: &str) -> bool {
    host_of(src).is_some_and(|host| OFFSITE_IMAGE_HOSTS.iter().any(|d| on_host(&host, d)))
}

fn is_external(src: &str) -> bool {
    src.starts_with("http")
        && host_of(src).is_some_and(|host| {
            !ENGINE_HOST_MARKERS
                .iter()
                .any(|marker| host.contains(marker))
        })
}

/// First image on a results page that lives off the search engine.
///
/// Known image hosts and "Image result" alt text are preferred over any other
/// external source.
pub fn offsite_image(html: &str, page_url: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("img[src]").ok()?;
    let sources: Vec<(&str, &str)> = document
        .select(&selector)
        .filter_map(|element| {
            let src = element.value().attr("src")?.trim();
            let alt = element.value().attr("alt").unwrap_or_default();
            (!src.is_empty() && !src.starts_with("data:")).then_some((src, alt))
        })
        .collect();

    let preferred = sources
        .iter()
        .find(|(src, alt)| is_offsite_host(src) || alt.contains("Image result"));
    let fallback = || {
        sources
            .iter()
            .find(|(src, _)| is_offsite_host(src) || is_external(src))
    };

    preferred
        .or_else(fallback)
        .map(|(src, _)| resolve_url(page_url, src))
}
