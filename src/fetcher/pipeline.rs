use crate::fetcher::types::{Charset, PageResponse};
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

// Only the head of the document is sniffed for charset declarations.
const SNIFF_LEN: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

/// Decode a page body using the charset from `content_type`, the document
/// itself, or a guess.
pub fn process_response(url_final: Url, body_raw: &[u8], content_type: &str) -> PageResponse {
    let charset = detect_charset(content_type, body_raw);
    let body_utf8 = decode_lossy(body_raw, &charset);

    PageResponse {
        url_final,
        body_utf8,
        charset,
    }
}

/// Header charset, then `<meta charset>` (which also covers the http-equiv
/// form), then a statistical guess.
fn detect_charset(content_type: &str, body: &[u8]) -> Charset {
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LEN)]);

    let declared = [
        CHARSET_REGEX.captures(content_type),
        META_CHARSET_REGEX.captures(&head),
    ]
    .into_iter()
    .flatten()
    .filter_map(|caps| caps.get(1))
    .find_map(|label| Encoding::for_label(label.as_str().trim().as_bytes()));

    if let Some(encoding) = declared {
        return Charset::from_encoding(encoding);
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(&body[..body.len().min(SNIFF_LEN)], false);
    Charset::from_encoding(detector.guess(None, true))
}

/// Malformed sequences become U+FFFD; we only need tag attributes from the
/// page, so a partially broken body is still useful.
fn decode_lossy(body: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = encoding.name(), "page body contained malformed sequences");
    }
    decoded.into_owned()
}
