//! Builds the unlock-page redirect URL that preserves the originally
//! requested page.

use axum::extract::Request;

use crate::endpoints;

/// Validate a redirect target taken from untrusted input.
///
/// Only same-origin absolute paths are accepted, which rules out open
/// redirects via "https://..." or protocol-relative "//..." values. The
/// unlock page itself is also rejected so a stale parameter cannot trap the
/// client in a loop.
pub(crate) fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    if !raw_url.starts_with('/') || raw_url.starts_with("//") {
        return None;
    }

    if raw_url == endpoints::UNLOCK_VIEW || raw_url.starts_with("/unlock?") {
        return None;
    }

    Some(raw_url.to_string())
}

/// Build the unlock page URL with a `redirect_url` query pointing at `target`.
pub(crate) fn build_unlock_redirect_url_from_target(target: &str) -> Option<String> {
    let query = serde_urlencoded::to_string([("redirect_url", target)]).ok()?;

    Some(format!("{}?{}", endpoints::UNLOCK_VIEW, query))
}

/// Build the unlock page URL for a rejected request.
///
/// htmx requests carry the page URL the user was on in the `HX-Current-URL`
/// header; plain navigation uses the request URI itself.
pub(crate) fn build_unlock_redirect_url(request: &Request) -> Option<String> {
    let target = if let Some(current_url) = request.headers().get("HX-Current-URL") {
        current_url.to_str().ok().map(str::to_owned)
    } else {
        request
            .uri()
            .path_and_query()
            .map(|path_and_query| path_and_query.to_string())
    };

    let target = target.and_then(|target| {
        // HX-Current-URL may be a full URL; reduce it to the path and query.
        if let Some(scheme_end) = target.find("://") {
            target[scheme_end + 3..].find('/').map(|path_start| {
                target[scheme_end + 3 + path_start..].to_string()
            })
        } else {
            Some(target)
        }
    })?;

    let target = normalize_redirect_url(&target)?;

    build_unlock_redirect_url_from_target(&target)
}

#[cfg(test)]
mod redirect_tests {
    use super::{build_unlock_redirect_url_from_target, normalize_redirect_url};

    #[test]
    fn accepts_absolute_paths() {
        assert_eq!(
            normalize_redirect_url("/transactions?range=thisMonth"),
            Some("/transactions?range=thisMonth".to_string())
        );
    }

    #[test]
    fn rejects_external_urls() {
        assert_eq!(normalize_redirect_url("https://example.com/"), None);
        assert_eq!(normalize_redirect_url("//example.com/"), None);
    }

    #[test]
    fn rejects_the_unlock_page_itself() {
        assert_eq!(normalize_redirect_url("/unlock"), None);
        assert_eq!(normalize_redirect_url("/unlock?redirect_url=%2F"), None);
    }

    #[test]
    fn builds_url_with_encoded_query() {
        let url = build_unlock_redirect_url_from_target("/transactions?range=thisMonth").unwrap();

        assert_eq!(url, "/unlock?redirect_url=%2Ftransactions%3Frange%3DthisMonth");
    }
}
