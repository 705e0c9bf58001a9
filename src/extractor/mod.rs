pub mod generic;
pub mod meta;
pub mod model;
pub mod photo_share;
pub mod scorer;
pub mod search;
pub mod url;

#[cfg(all(test, feature = "fuzz"))]
mod properties;

pub use generic::GenericPageExtractor;
pub use model::{Miss, ResolutionPath, ResolvedImageUrl};
pub use photo_share::PhotoShareExtractor;
pub use search::SearchRedirectExtractor;

use crate::config::Config;
use async_trait::async_trait;

/// One way of turning an input URL into an image URL.
///
/// Implementations never retry and never escalate; they report a [`Miss`] and
/// let the resolver move on to the next strategy.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    async fn extract(&self, url: &::url::Url, config: &Config) -> Result<ResolvedImageUrl, Miss>;
}
