use url::Url;

/// Turn an `src`/`content` value into an absolute URL.
///
/// Candidates of the form `scheme://...` or `data:` are returned unchanged.
/// Anything
/// else is rooted at the base's origin, never at the base page's directory:
/// `img/a.png` on `https://x.com/blog/post` becomes `https://x.com/img/a.png`.
pub fn resolve_url(base: &Url, candidate: &str) -> String {
    if has_scheme(candidate) {
        return candidate.to_string();
    }

    let origin = base.origin().ascii_serialization();
    if candidate.starts_with('/') {
        format!("{origin}{candidate}")
    } else {
        format!("{origin}/{candidate}")
    }
}

fn has_scheme(candidate: &str) -> bool {
    if candidate.get(..5).is_some_and(|prefix| prefix.eq_ignore_ascii_case("data:")) {
        return true;
    }
    let Some((scheme, _)) = candidate.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
