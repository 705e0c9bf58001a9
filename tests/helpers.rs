#![allow(dead_code)]

use std::io::Cursor;
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};
use pixelgrab::Config;
use wiremock::{Match, Request};

pub const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const MINIMAL_UA: &str = "curl/7.68.0";

/// Defaults with tier timeouts short enough for mock servers.
pub fn fast_config() -> Config {
    Config::default()
        .with_page_timeout(Duration::from_secs(5))
        .with_tier_timeouts(
            Duration::from_millis(300),
            Duration::from_millis(300),
            Duration::from_secs(5),
        )
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

/// Matches requests whose `User-Agent` is exactly the given value.
pub struct UserAgent(pub &'static str);

impl Match for UserAgent {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            == Some(self.0)
    }
}

/// Matches requests sent without any `User-Agent`.
pub struct NoUserAgent;

impl Match for NoUserAgent {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("user-agent")
    }
}
