use crate::config::Config;
use crate::fetcher::{errors::FetchError, pipeline::process_response, types::PageResponse};
use reqwest::{Client, ClientBuilder, header};
use tracing::{debug, instrument};

const MAX_REDIRECTS: usize = 10;

/// Client used for HTML page fetches. Built per call so no connection state
/// outlives a single resolution.
fn page_client(config: &Config) -> Result<Client, FetchError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );

    ClientBuilder::new()
        .timeout(config.page_timeout())
        .user_agent(config.browser_user_agent())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .default_headers(headers)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

/// Fetch an HTML page with a browser identity, following redirects.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_page(url: &str, config: &Config) -> Result<PageResponse, FetchError> {
    let parsed_url = url::Url::parse(url)?;
    let max_body = config.max_page_bytes();

    let response = page_client(config)?
        .get(parsed_url)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    if let Some(content_length) = response.content_length()
        && content_length > max_body
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http(status));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;

    // Content-Length may be missing or wrong
    if body_bytes.len() as u64 > max_body {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    let page = process_response(final_url, &body_bytes, &content_type);
    debug!(
        final_url = %page.url_final,
        status = status.as_u16(),
        charset = page.charset.encoding().name(),
        size = body_bytes.len(),
        "fetched page"
    );
    Ok(page)
}
