//! Configuration handling for the resolution pipeline.
//!
//! Every request receives a `Config` by reference; nothing here is global.
//! `Config::from_env` reads `PIXELGRAB_*` variables and falls back to the
//! defaults below, which match what browsers and the image hosts we target
//! tolerate in practice.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable names.
pub const ENV_PAGE_TIMEOUT_SECS: &str = "PIXELGRAB_PAGE_TIMEOUT_SECS";
pub const ENV_FULL_TIER_TIMEOUT_SECS: &str = "PIXELGRAB_FULL_TIER_TIMEOUT_SECS";
pub const ENV_MINIMAL_TIER_TIMEOUT_SECS: &str = "PIXELGRAB_MINIMAL_TIER_TIMEOUT_SECS";
pub const ENV_BARE_TIER_TIMEOUT_SECS: &str = "PIXELGRAB_BARE_TIER_TIMEOUT_SECS";
pub const ENV_BROWSER_USER_AGENT: &str = "PIXELGRAB_BROWSER_USER_AGENT";
pub const ENV_MINIMAL_USER_AGENT: &str = "PIXELGRAB_MINIMAL_USER_AGENT";
pub const ENV_MAX_PAGE_BYTES: &str = "PIXELGRAB_MAX_PAGE_BYTES";
pub const ENV_MAX_IMAGE_BYTES: &str = "PIXELGRAB_MAX_IMAGE_BYTES";
pub const ENV_PHOTO_SHARE_SIZE: &str = "PIXELGRAB_PHOTO_SHARE_SIZE";

const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_FULL_TIER_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_MINIMAL_TIER_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_BARE_TIER_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_MINIMAL_USER_AGENT: &str = "curl/7.68.0";
const DEFAULT_MAX_PAGE_BYTES: u64 = 5 * 1024 * 1024; // 5MB
const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024; // 20MB
const DEFAULT_PHOTO_SHARE_SIZE: u32 = 2048;

/// Runtime configuration for one or more resolution calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    page_timeout: Duration,
    full_tier_timeout: Duration,
    minimal_tier_timeout: Duration,
    bare_tier_timeout: Duration,
    browser_user_agent: String,
    minimal_user_agent: String,
    max_page_bytes: u64,
    max_image_bytes: u64,
    photo_share_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            full_tier_timeout: DEFAULT_FULL_TIER_TIMEOUT,
            minimal_tier_timeout: DEFAULT_MINIMAL_TIER_TIMEOUT,
            bare_tier_timeout: DEFAULT_BARE_TIER_TIMEOUT,
            browser_user_agent: DEFAULT_BROWSER_USER_AGENT.to_string(),
            minimal_user_agent: DEFAULT_MINIMAL_USER_AGENT.to_string(),
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            photo_share_size: DEFAULT_PHOTO_SHARE_SIZE,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Numeric variables that are present but unparsable are rejected rather
    /// than silently replaced by the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            page_timeout: secs_var(ENV_PAGE_TIMEOUT_SECS, "page_timeout")?
                .unwrap_or(defaults.page_timeout),
            full_tier_timeout: secs_var(ENV_FULL_TIER_TIMEOUT_SECS, "full_tier_timeout")?
                .unwrap_or(defaults.full_tier_timeout),
            minimal_tier_timeout: secs_var(ENV_MINIMAL_TIER_TIMEOUT_SECS, "minimal_tier_timeout")?
                .unwrap_or(defaults.minimal_tier_timeout),
            bare_tier_timeout: secs_var(ENV_BARE_TIER_TIMEOUT_SECS, "bare_tier_timeout")?
                .unwrap_or(defaults.bare_tier_timeout),
            browser_user_agent: env::var(ENV_BROWSER_USER_AGENT)
                .unwrap_or(defaults.browser_user_agent),
            minimal_user_agent: env::var(ENV_MINIMAL_USER_AGENT)
                .unwrap_or(defaults.minimal_user_agent),
            max_page_bytes: parsed_var(ENV_MAX_PAGE_BYTES, "max_page_bytes")?
                .unwrap_or(defaults.max_page_bytes),
            max_image_bytes: parsed_var(ENV_MAX_IMAGE_BYTES, "max_image_bytes")?
                .unwrap_or(defaults.max_image_bytes),
            photo_share_size: parsed_var(ENV_PHOTO_SHARE_SIZE, "photo_share_size")?
                .unwrap_or(defaults.photo_share_size),
        })
    }

    /// Override the three download tier timeouts.
    pub fn with_tier_timeouts(mut self, full: Duration, minimal: Duration, bare: Duration) -> Self {
        self.full_tier_timeout = full;
        self.minimal_tier_timeout = minimal;
        self.bare_tier_timeout = bare;
        self
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn with_max_image_bytes(mut self, limit: u64) -> Self {
        self.max_image_bytes = limit;
        self
    }

    pub fn with_photo_share_size(mut self, size: u32) -> Self {
        self.photo_share_size = size;
        self
    }

    pub fn page_timeout(&self) -> Duration {
        self.page_timeout
    }

    pub fn full_tier_timeout(&self) -> Duration {
        self.full_tier_timeout
    }

    pub fn minimal_tier_timeout(&self) -> Duration {
        self.minimal_tier_timeout
    }

    pub fn bare_tier_timeout(&self) -> Duration {
        self.bare_tier_timeout
    }

    pub fn browser_user_agent(&self) -> &str {
        &self.browser_user_agent
    }

    pub fn minimal_user_agent(&self) -> &str {
        &self.minimal_user_agent
    }

    pub fn max_page_bytes(&self) -> u64 {
        self.max_page_bytes
    }

    pub fn max_image_bytes(&self) -> u64 {
        self.max_image_bytes
    }

    /// Edge length requested from the photo-share CDN, e.g. `2048` for `=s2048`.
    pub fn photo_share_size(&self) -> u32 {
        self.photo_share_size
    }
}

fn parsed_var<T: std::str::FromStr>(key: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field,
                reason: format!("{key}={raw:?}: {e}"),
            }),
        Err(_) => Ok(None),
    }
}

fn secs_var(key: &str, field: &'static str) -> Result<Option<Duration>, ConfigError> {
    let secs = parsed_var::<u64>(key, field)?;
    match secs {
        Some(0) => Err(ConfigError::InvalidValue {
            field,
            reason: format!("{key} must be greater than zero"),
        }),
        other => Ok(other.map(Duration::from_secs)),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
