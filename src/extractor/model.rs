use serde::Serialize;
use thiserror::Error;

use crate::fetcher::FetchError;

/// Which extraction path produced a [`ResolvedImageUrl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPath {
    /// The input itself was an image link.
    Direct,
    /// Read from the search engine's redirect query string.
    SearchRedirectParam,
    /// Found among the images on the search engine's redirect page.
    SearchRedirectPage,
    /// Preview tag on a photo-share page.
    PhotoShareMeta,
    /// CDN image on a photo-share page, size token rewritten.
    PhotoShareCdn,
    /// Preview tag on a generic page.
    PageMeta,
    /// Best-scoring `<img>` on a generic page.
    PageScored,
}

/// The one image URL a resolution commits to downloading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImageUrl {
    url: String,
    path: ResolutionPath,
}

impl ResolvedImageUrl {
    pub fn new(url: impl Into<String>, path: ResolutionPath) -> Self {
        Self {
            url: url.into(),
            path,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> ResolutionPath {
        self.path
    }
}

/// A strategy that produced no image, and why.
#[derive(Error, Debug)]
pub enum Miss {
    #[error("page fetch failed: {0}")]
    PageFetch(#[from] FetchError),

    #[error("no usable image on {0}")]
    NoCandidate(String),
}
