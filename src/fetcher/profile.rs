//! Request profiles for image downloads.
//!
//! Each profile knows which tier to try next for each class of failure. The
//! graph is deliberately not uniform: only an explicit 401/403 on the full
//! tier leads to the minimal tier, while a transport or decode error there
//! skips straight to the bare tier.

use crate::config::Config;
use crate::fetcher::types::Tier;
use reqwest::{
    Client, ClientBuilder, StatusCode,
    header::{self, HeaderMap, HeaderValue},
};
use thiserror::Error;
use url::Url;

const MAX_REDIRECTS: usize = 10;

const IMAGE_ACCEPT: &str = "image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

/// Why a single download attempt gave up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TierFailure {
    #[error("access denied ({0})")]
    Denied(StatusCode),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("not a decodable image: {0}")]
    Decode(String),
}

impl TierFailure {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Denied(status),
            other => Self::Status(other),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestProfile {
    pub tier: Tier,
    /// Next tier after a 401/403.
    pub on_denied: Option<Tier>,
    /// Next tier after any other non-200 status.
    pub on_status: Option<Tier>,
    /// Next tier after a transport failure or undecodable body.
    pub on_error: Option<Tier>,
}

/// Tried in order, starting from the first entry.
pub const DOWNLOAD_PROFILES: [RequestProfile; 3] = [
    RequestProfile {
        tier: Tier::Full,
        on_denied: Some(Tier::Minimal),
        on_status: None,
        on_error: Some(Tier::Bare),
    },
    RequestProfile {
        tier: Tier::Minimal,
        on_denied: Some(Tier::Bare),
        on_status: Some(Tier::Bare),
        on_error: Some(Tier::Bare),
    },
    RequestProfile {
        tier: Tier::Bare,
        on_denied: None,
        on_status: None,
        on_error: None,
    },
];

impl RequestProfile {
    pub fn first() -> &'static RequestProfile {
        &DOWNLOAD_PROFILES[0]
    }

    pub fn for_tier(tier: Tier) -> &'static RequestProfile {
        match tier {
            Tier::Full => &DOWNLOAD_PROFILES[0],
            Tier::Minimal => &DOWNLOAD_PROFILES[1],
            Tier::Bare => &DOWNLOAD_PROFILES[2],
        }
    }

    pub fn next(&self, failure: &TierFailure) -> Option<Tier> {
        match failure {
            TierFailure::Denied(_) => self.on_denied,
            TierFailure::Status(_) => self.on_status,
            TierFailure::Transport(_) | TierFailure::Decode(_) => self.on_error,
        }
    }

    /// Build the HTTP client carrying this profile's headers and timeouts.
    ///
    /// Connect and read are each bounded by the tier timeout; the whole
    /// request by their sum.
    pub fn client(&self, image_url: &Url, config: &Config) -> Result<Client, TierFailure> {
        let builder = ClientBuilder::new().redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

        let builder = match self.tier {
            Tier::Full => builder
                .user_agent(config.browser_user_agent())
                .default_headers(browser_headers(image_url))
                .connect_timeout(config.full_tier_timeout())
                .read_timeout(config.full_tier_timeout())
                .timeout(config.full_tier_timeout() * 2),
            Tier::Minimal => builder
                .user_agent(config.minimal_user_agent())
                .connect_timeout(config.minimal_tier_timeout())
                .read_timeout(config.minimal_tier_timeout())
                .timeout(config.minimal_tier_timeout() * 2),
            Tier::Bare => builder.timeout(config.bare_tier_timeout()),
        };

        builder
            .build()
            .map_err(|e| TierFailure::Transport(e.to_string()))
    }
}

/// Headers a desktop browser sends for a cross-site `<img>` load, with the
/// image's own origin as referer.
fn browser_headers(image_url: &Url) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(IMAGE_ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br"),
    );
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert("sec-fetch-dest", HeaderValue::from_static("image"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("no-cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));

    if let Some(referer) = referer_for(image_url) {
        headers.insert(header::REFERER, referer);
    }
    headers
}

fn referer_for(image_url: &Url) -> Option<HeaderValue> {
    let host = image_url.host_str()?;
    HeaderValue::from_str(&format!("https://{host}/")).ok()
}
