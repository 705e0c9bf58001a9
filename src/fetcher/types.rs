use bytes::Bytes;
use serde::Serialize;
use url::Url;

/// Character set a page body was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Windows1252,
    ShiftJis,
    Gbk,
    Big5,
    Other(String),
}

impl Charset {
    pub fn from_encoding(encoding: &'static encoding_rs::Encoding) -> Self {
        use std::ptr;

        if ptr::eq(encoding, encoding_rs::UTF_8) {
            Self::Utf8
        } else if ptr::eq(encoding, encoding_rs::WINDOWS_1252) {
            Self::Windows1252
        } else if ptr::eq(encoding, encoding_rs::SHIFT_JIS) {
            Self::ShiftJis
        } else if ptr::eq(encoding, encoding_rs::GBK) || ptr::eq(encoding, encoding_rs::GB18030) {
            Self::Gbk
        } else if ptr::eq(encoding, encoding_rs::BIG5) {
            Self::Big5
        } else {
            Self::Other(encoding.name().to_string())
        }
    }

    pub fn encoding(&self) -> &'static encoding_rs::Encoding {
        match self {
            Self::Utf8 => encoding_rs::UTF_8,
            Self::Windows1252 => encoding_rs::WINDOWS_1252,
            Self::ShiftJis => encoding_rs::SHIFT_JIS,
            Self::Gbk => encoding_rs::GBK,
            Self::Big5 => encoding_rs::BIG5,
            Self::Other(name) => {
                encoding_rs::Encoding::for_label(name.as_bytes()).unwrap_or(encoding_rs::UTF_8)
            }
        }
    }
}

/// An HTML page fetched for image discovery, decoded to UTF-8.
#[derive(Debug)]
pub struct PageResponse {
    /// Where the redirects ended; relative sources resolve against this.
    pub url_final: Url,
    pub body_utf8: String,
    pub charset: Charset,
}

/// Request profile used by one download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Browser-like headers with a self-referer.
    Full,
    /// Non-browser user agent only.
    Minimal,
    /// No custom headers at all.
    Bare,
}

/// A downloaded image that decoded successfully.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub url_final: Url,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Bytes,
    pub tier: Tier,
}
