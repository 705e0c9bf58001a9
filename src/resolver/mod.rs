//! Turns an input URL into one image.
//!
//! Classification picks an ordered list of strategies; the resolver tries
//! them in turn and stops at the first hit. The generic page strategy is
//! always the last entry, so a site-specific miss still gets one generic
//! attempt before the request is reported as `NoImageFound`.

pub mod classify;

pub use classify::{ResolutionRequest, UrlKind, classify};

use tracing::{info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::PipelineError;
use crate::extractor::{
    GenericPageExtractor, PhotoShareExtractor, ResolutionPath, ResolvedImageUrl,
    SearchRedirectExtractor, Strategy,
};
use crate::fetcher::{FetchedImage, fetch_image};

/// Strategies to try for a URL of the given kind, in order.
pub fn strategies_for(kind: UrlKind) -> Vec<Box<dyn Strategy>> {
    match kind {
        UrlKind::DirectImage => Vec::new(),
        UrlKind::SearchImageRedirect => vec![
            Box::new(SearchRedirectExtractor),
            Box::new(GenericPageExtractor),
        ],
        UrlKind::PhotoShareLink => vec![
            Box::new(PhotoShareExtractor),
            Box::new(GenericPageExtractor),
        ],
        UrlKind::GenericPage => vec![Box::new(GenericPageExtractor)],
    }
}

/// Resolve `input` to the single image URL worth downloading.
#[instrument(skip(config))]
pub async fn resolve_image_url(
    input: &str,
    config: &Config,
) -> Result<ResolvedImageUrl, PipelineError> {
    let request = ResolutionRequest::parse(input)?;
    resolve_as(request.kind(), request.url(), config).await
}

/// Run the strategy chain for `kind` against `url`, bypassing
/// classification.
pub async fn resolve_as(
    kind: UrlKind,
    url: &Url,
    config: &Config,
) -> Result<ResolvedImageUrl, PipelineError> {
    if kind == UrlKind::DirectImage {
        info!(url = %url, "input is a direct image link");
        return Ok(ResolvedImageUrl::new(url.as_str(), ResolutionPath::Direct));
    }

    for strategy in strategies_for(kind) {
        match strategy.extract(url, config).await {
            Ok(resolved) => {
                info!(
                    strategy = strategy.name(),
                    image = resolved.url(),
                    path = ?resolved.path(),
                    "resolved image"
                );
                return Ok(resolved);
            }
            Err(miss) => {
                warn!(strategy = strategy.name(), kind = ?kind, reason = %miss, "strategy found no image");
            }
        }
    }

    Err(PipelineError::NoImageFound)
}

/// Resolve `input` and download the chosen image.
#[instrument(skip(config))]
pub async fn grab(input: &str, config: &Config) -> Result<FetchedImage, PipelineError> {
    let resolved = resolve_image_url(input, config).await?;
    fetch_image(resolved.url(), config).await
}
