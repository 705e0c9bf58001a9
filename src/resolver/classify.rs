use serde::Serialize;
use url::Url;

use crate::error::PipelineError;

/// Raster formats we download without looking for a page around them.
const DIRECT_IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

const SEARCH_ENGINE_HOST_MARKER: &str = "google.";
const SEARCH_IMAGE_PARAM: &str = "imgurl";
const SEARCH_IMAGE_PATHS: [&str; 2] = ["/imgres", "/images"];

const PHOTO_SHARE_HOSTS: [&str; 3] = ["share.google", "photos.google.com", "photos.app.goo.gl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlKind {
    DirectImage,
    SearchImageRedirect,
    PhotoShareLink,
    GenericPage,
}

/// Validated input to one resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    url: Url,
}

impl ResolutionRequest {
    /// Accepts absolute `http`/`https` URLs with a host; surrounding
    /// whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, PipelineError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::InvalidInput("empty input".to_string()));
        }

        let url = Url::parse(trimmed)
            .map_err(|e| PipelineError::InvalidInput(format!("{trimmed}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PipelineError::InvalidInput(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(PipelineError::InvalidInput(format!("{trimmed}: missing host")));
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> UrlKind {
        classify(&self.url)
    }
}

/// Decide which extraction path applies, in priority order: direct image,
/// search redirect, photo share, anything else.
pub fn classify(url: &Url) -> UrlKind {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

    if is_direct_image(url) {
        UrlKind::DirectImage
    } else if is_search_redirect(url, &host) {
        UrlKind::SearchImageRedirect
    } else if is_photo_share(&host) {
        UrlKind::PhotoShareLink
    } else {
        UrlKind::GenericPage
    }
}

fn is_direct_image(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    DIRECT_IMAGE_EXTENSIONS
        .iter()
        .any(|extension| path.ends_with(extension))
}

fn is_search_redirect(url: &Url, host: &str) -> bool {
    if !host.contains(SEARCH_ENGINE_HOST_MARKER) {
        return false;
    }
    let path = url.path().trim_end_matches('/');
    url.query_pairs().any(|(key, _)| key == SEARCH_IMAGE_PARAM)
        || SEARCH_IMAGE_PATHS.contains(&path)
}

fn is_photo_share(host: &str) -> bool {
    PHOTO_SHARE_HOSTS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(input: &str) -> UrlKind {
        ResolutionRequest::parse(input).unwrap().kind()
    }

    #[test]
    fn direct_images_by_path_extension() {
        assert_eq!(kind("https://cdn.example.com/a/b/photo.JPG"), UrlKind::DirectImage);
        assert_eq!(kind("https://cdn.example.com/x.png?w=300"), UrlKind::DirectImage);
        assert_eq!(kind("http://example.com/anim.gif"), UrlKind::DirectImage);
        assert_eq!(kind("https://example.com/page.html"), UrlKind::GenericPage);
    }

    #[test]
    fn extension_check_wins_over_search_host() {
        assert_eq!(
            kind("https://www.google.com/logos/doodle.png"),
            UrlKind::DirectImage
        );
    }

    #[test]
    fn search_redirects() {
        assert_eq!(
            kind("https://www.google.com/imgres?imgurl=https%3A%2F%2Fa.b%2Fc.jpg&imgrefurl=x"),
            UrlKind::SearchImageRedirect
        );
        assert_eq!(
            kind("https://www.google.co.uk/imgres?docid=123"),
            UrlKind::SearchImageRedirect
        );
        assert_eq!(
            kind("https://images.google.de/images?q=cats"),
            UrlKind::SearchImageRedirect
        );
        assert_eq!(kind("https://www.google.com/search?q=cats"), UrlKind::GenericPage);
        assert_eq!(
            kind("https://example.com/imgres?imgurl=x"),
            UrlKind::GenericPage
        );
    }

    #[test]
    fn photo_share_hosts() {
        assert_eq!(kind("https://photos.app.goo.gl/AbCdEf"), UrlKind::PhotoShareLink);
        assert_eq!(kind("https://photos.google.com/share/AF1Qip"), UrlKind::PhotoShareLink);
        assert_eq!(kind("https://share.google/xyz"), UrlKind::PhotoShareLink);
        assert_eq!(kind("https://notphotos.google.com.evil.io/x"), UrlKind::GenericPage);
    }

    #[test]
    fn rejects_bad_input() {
        for input in ["", "   ", "not a url", "ftp://example.com/a.png", "mailto:a@b.c", "file:///tmp/x.png"] {
            assert!(
                matches!(ResolutionRequest::parse(input), Err(PipelineError::InvalidInput(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn trims_whitespace() {
        let req = ResolutionRequest::parse("  https://example.com/a  \n").unwrap();
        assert_eq!(req.url().as_str(), "https://example.com/a");
    }
}
