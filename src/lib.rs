//! Find the representative image behind a link and download it.
//!
//! ```no_run
//! # async fn run() -> Result<(), pixelgrab::PipelineError> {
//! let config = pixelgrab::Config::default();
//! let image = pixelgrab::grab("https://example.com/article", &config).await?;
//! println!("{}x{} {}", image.width, image.height, image.content_type);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod resolver;

pub use config::Config;
pub use error::PipelineError;
pub use extractor::{ResolutionPath, ResolvedImageUrl};
pub use fetcher::{FetchedImage, Tier, fetch_image};
pub use resolver::{ResolutionRequest, UrlKind, classify, grab, resolve_image_url};
