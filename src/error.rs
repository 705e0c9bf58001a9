use thiserror::Error;

/// Terminal failure of one resolution call.
///
/// Only the orchestrator and the download tier chain construct these; every
/// stage below them reports misses through its own error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no image found")]
    NoImageFound,

    #[error("image host refused the request for {url}")]
    Forbidden { url: String },

    #[error("failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("could not decode image from {url}: {reason}")]
    DecodeFailed { url: String, reason: String },
}

impl PipelineError {
    /// Short text suitable for a toast or status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "Invalid URL",
            Self::NoImageFound => "No image found on this page",
            Self::Forbidden { .. } => "The image host refused the download",
            Self::FetchFailed { .. } => "Failed to download image",
            Self::DecodeFailed { .. } => "The downloaded file is not a supported image",
        }
    }
}
