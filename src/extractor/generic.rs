use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::extractor::{
    Strategy,
    meta::first_meta_image,
    model::{Miss, ResolutionPath, ResolvedImageUrl},
    scorer::best_image,
    url::resolve_url,
};
use crate::fetcher::fetch_page;

/// Works on any HTML page: preview tags first, then the scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericPageExtractor;

#[async_trait]
impl Strategy for GenericPageExtractor {
    fn name(&self) -> &'static str {
        "generic_page"
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn extract(&self, url: &Url, config: &Config) -> Result<ResolvedImageUrl, Miss> {
        let page = fetch_page(url.as_str(), config).await?;
        image_from_page(&page.body_utf8, &page.url_final)
            .ok_or_else(|| Miss::NoCandidate(page.url_final.to_string()))
    }
}

/// Resolve the representative image of an already-fetched page.
pub fn image_from_page(html: &str, page_url: &Url) -> Option<ResolvedImageUrl> {
    let document = Html::parse_document(html);

    if let Some(content) = first_meta_image(&document) {
        debug!(content = %content, "using preview tag");
        return Some(ResolvedImageUrl::new(
            resolve_url(page_url, &content),
            ResolutionPath::PageMeta,
        ));
    }

    best_image(&document, page_url)
        .map(|url| ResolvedImageUrl::new(url, ResolutionPath::PageScored))
}
