use proptest::prelude::*;
use scraper::Html;
use url::Url;

use super::generic::image_from_page;
use super::photo_share::rewrite_size_token;
use super::url::resolve_url;

fn base() -> Url {
    Url::parse("https://example.com/section/page.html").unwrap()
}

proptest! {
    #[test]
    fn resolve_url_is_idempotent(candidate in "[a-zA-Z0-9/._-]{0,40}") {
        let once = resolve_url(&base(), &candidate);
        prop_assert!(once.starts_with("https://example.com/"));
        prop_assert_eq!(resolve_url(&base(), &once), once);
    }

    #[test]
    fn absolute_candidates_survive(path in "[a-z0-9/]{0,30}") {
        let absolute = format!("https://cdn.example.net/{path}");
        prop_assert_eq!(resolve_url(&base(), &absolute), absolute);
    }

    #[test]
    fn size_rewrite_is_stable(w in 1u32..5000, h in 1u32..5000, size in 1u32..8000) {
        let once = rewrite_size_token(&format!("https://lh3.googleusercontent.com/x=w{w}-h{h}"), size);
        prop_assert_eq!(&once, &format!("https://lh3.googleusercontent.com/x=s{size}"));
        prop_assert_eq!(rewrite_size_token(&once, size), once);
    }

    #[test]
    fn arbitrary_markup_never_panics(html in ".{0,400}") {
        let _ = Html::parse_document(&html);
        let _ = image_from_page(&html, &base());
    }
}
