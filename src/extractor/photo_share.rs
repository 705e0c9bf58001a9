use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::instrument;
use url::Url;

use crate::config::Config;
use crate::extractor::{
    Strategy,
    meta::first_meta_image,
    model::{Miss, ResolutionPath, ResolvedImageUrl},
    url::resolve_url,
};
use crate::fetcher::fetch_page;

/// Hosts serving the actual photo bytes behind a share page.
const CDN_HOST_MARKERS: [&str; 2] = ["googleusercontent.com", "ggpht.com"];

// `=w640-h480` or `=s640` size directives in CDN URLs.
static SIZE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"=(?:w\d+-h\d+|s\d+)").unwrap());

/// Handles photo-sharing share links.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoShareExtractor;

#[async_trait]
impl Strategy for PhotoShareExtractor {
    fn name(&self) -> &'static str {
        "photo_share"
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn extract(&self, url: &Url, config: &Config) -> Result<ResolvedImageUrl, Miss> {
        let page = fetch_page(url.as_str(), config).await?;
        image_from_share_page(&page.body_utf8, &page.url_final, config.photo_share_size())
            .ok_or_else(|| Miss::NoCandidate(page.url_final.to_string()))
    }
}

/// Ask the CDN for a `size`-pixel rendition instead of the thumbnail.
pub fn rewrite_size_token(src: &str, size: u32) -> String {
    SIZE_TOKEN
        .replace_all(src, format!("=s{size}").as_str())
        .into_owned()
}

pub fn image_from_share_page(html: &str, page_url: &Url, size: u32) -> Option<ResolvedImageUrl> {
    let document = Html::parse_document(html);

    if let Some(content) = first_meta_image(&document) {
        return Some(ResolvedImageUrl::new(
            resolve_url(page_url, &content),
            ResolutionPath::PhotoShareMeta,
        ));
    }

    let selector = Selector::parse("img[src]").ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::trim)
        .find(|src| CDN_HOST_MARKERS.iter().any(|marker| src.contains(marker)))
        .map(|src| {
            let absolute = match src.strip_prefix("//") {
                Some(rest) => format!("{}://{rest}", page_url.scheme()),
                None => resolve_url(page_url, src),
            };
            ResolvedImageUrl::new(
                rewrite_size_token(&absolute, size),
                ResolutionPath::PhotoShareCdn,
            )
        })
}
