#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use pixelgrab::extractor::{generic, photo_share, search};
use pixelgrab::fetcher::pipeline::process_response;

fuzz_target!(|data: &[u8]| {
    let page_url = Url::parse("https://example.com/gallery/item").unwrap();

    // Raw bytes go through charset sniffing first, like a real page body.
    let page = process_response(page_url.clone(), data, "text/html");

    // None of the page scanners may panic, whatever the markup.
    let _ = generic::image_from_page(&page.body_utf8, &page_url);
    let _ = search::offsite_image(&page.body_utf8, &page_url);
    let _ = photo_share::image_from_share_page(&page.body_utf8, &page_url, 2048);
});
