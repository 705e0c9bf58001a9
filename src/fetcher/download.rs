use crate::config::Config;
use crate::error::PipelineError;
use crate::fetcher::decode;
use crate::fetcher::profile::{RequestProfile, TierFailure};
use crate::fetcher::types::{FetchedImage, Tier};
use reqwest::{StatusCode, header};
use tracing::{info, instrument, warn};
use url::Url;

/// Download and decode the image at `image_url`, walking the request
/// profiles until one succeeds or the chain runs out.
#[instrument(skip_all, fields(url = %image_url))]
pub async fn fetch_image(image_url: &str, config: &Config) -> Result<FetchedImage, PipelineError> {
    let url = Url::parse(image_url).map_err(|e| PipelineError::FetchFailed {
        url: image_url.to_string(),
        reason: format!("invalid url: {e}"),
    })?;

    let mut profile = Some(RequestProfile::first());
    let mut full_tier_denied = false;
    let mut last_failure = None;

    while let Some(current) = profile {
        match attempt(current, &url, config).await {
            Ok(image) => {
                info!(
                    tier = ?current.tier,
                    content_type = %image.content_type,
                    width = image.width,
                    height = image.height,
                    size = image.bytes.len(),
                    "downloaded image"
                );
                return Ok(image);
            }
            Err(failure) => {
                let next = current.next(&failure);
                warn!(tier = ?current.tier, next = ?next, error = %failure, "download attempt failed");
                if current.tier == Tier::Full && failure.is_denied() {
                    full_tier_denied = true;
                }
                last_failure = Some(failure);
                profile = next.map(RequestProfile::for_tier);
            }
        }
    }

    Err(final_error(image_url, full_tier_denied, last_failure))
}

fn final_error(url: &str, full_tier_denied: bool, last: Option<TierFailure>) -> PipelineError {
    let url = url.to_string();
    if full_tier_denied {
        return PipelineError::Forbidden { url };
    }
    match last {
        Some(TierFailure::Decode(reason)) => PipelineError::DecodeFailed { url, reason },
        Some(other) => PipelineError::FetchFailed {
            url,
            reason: other.to_string(),
        },
        None => PipelineError::FetchFailed {
            url,
            reason: "no download attempted".to_string(),
        },
    }
}

/// One GET with the given profile. Any failure is returned, never retried
/// here.
async fn attempt(
    profile: &RequestProfile,
    url: &Url,
    config: &Config,
) -> Result<FetchedImage, TierFailure> {
    let client = profile.client(url, config)?;
    let max_body = config.max_image_bytes();

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| TierFailure::Transport(e.to_string()))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(TierFailure::from_status(status));
    }

    if let Some(content_length) = response.content_length()
        && content_length > max_body
    {
        return Err(TierFailure::Transport(format!(
            "body too large ({content_length} bytes)"
        )));
    }

    let url_final = response.url().clone();
    let declared_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .map(str::to_string);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| TierFailure::Transport(e.to_string()))?;

    if bytes.len() as u64 > max_body {
        return Err(TierFailure::Transport(format!(
            "body too large ({} bytes)",
            bytes.len()
        )));
    }

    let info = decode::inspect(&bytes, declared_type.as_deref())
        .map_err(|e| TierFailure::Decode(e.to_string()))?;

    Ok(FetchedImage {
        url_final,
        content_type: info.content_type,
        width: info.width,
        height: info.height,
        bytes,
        tier: profile.tier,
    })
}
