//! Working out where to send a user after they log in.

use axum::{
    extract::Request,
    http::{HeaderMap, Uri},
};

use serde::Deserialize;

use crate::endpoints;

/// A query string naming the page to go to next, e.g. `?redirect_url=/dashboard`.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Extract the path and query from `raw_url` if it is a local page other
/// than the log-in page.
///
/// Absolute URLs pointing at another host and protocol relative URLs are
/// rejected so that a crafted link cannot send the user off-site.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?;
    let target = path_and_query.as_str();

    if !target.starts_with('/') || target.starts_with("//") {
        return None;
    }

    if path_and_query.path() == endpoints::LOG_IN_VIEW {
        return None;
    }

    Some(target.to_owned())
}

/// The log-in URL that brings the user back to the page behind `request`.
///
/// Page requests return to their own URL. HTMX requests to `/api` return to
/// the page that issued them, taken from the `HX-Current-URL` header.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let target = if request.uri().path().starts_with("/api") {
        hx_current_page(request.headers())?
    } else {
        local_path_and_query(request.uri())?
    };

    build_log_in_redirect_url_from_target(&target)
}

/// The log-in URL with `target` as its `redirect_url` query parameter.
pub fn build_log_in_redirect_url_from_target(target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", target)])
        .inspect_err(|error| tracing::error!("could not encode redirect URL {target}: {error}"))
        .ok()
        .map(|query| format!("{}?{query}", endpoints::LOG_IN_VIEW))
}

fn hx_current_page(headers: &HeaderMap) -> Option<String> {
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("/api request without the HX-Request header");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|value| value.to_str().ok())
    else {
        tracing::warn!("/api request without the HX-Current-URL header");
        return None;
    };

    // HTMX sends the full URL of the current page, so the host is expected.
    let page = current_url
        .parse::<Uri>()
        .ok()
        .and_then(|uri| local_path_and_query(&uri));

    if page.is_none() {
        tracing::warn!("unusable HX-Current-URL header: {current_url}");
    }

    page
}

#[cfg(test)]
mod redirect_tests {
    use axum::{body::Body, extract::Request};

    use crate::{
        auth::redirect::{
            build_log_in_redirect_url, build_log_in_redirect_url_from_target,
            normalize_redirect_url,
        },
        endpoints,
    };

    #[test]
    fn keeps_local_path_and_query() {
        assert_eq!(
            normalize_redirect_url("/dashboard?period=2026-01"),
            Some("/dashboard?period=2026-01".to_owned())
        );
    }

    #[test]
    fn rejects_off_site_urls() {
        assert_eq!(normalize_redirect_url("https://example.com/dashboard"), None);
        assert_eq!(normalize_redirect_url("//example.com/dashboard"), None);
    }

    #[test]
    fn rejects_log_in_page() {
        assert_eq!(normalize_redirect_url(endpoints::LOG_IN_VIEW), None);
        assert_eq!(
            normalize_redirect_url("/log_in?redirect_url=%2Fdashboard"),
            None
        );
    }

    #[test]
    fn encodes_target() {
        assert_eq!(
            build_log_in_redirect_url_from_target("/incomes?period=2026-01"),
            Some("/log_in?redirect_url=%2Fincomes%3Fperiod%3D2026-01".to_owned())
        );
    }

    #[test]
    fn page_request_returns_to_itself() {
        let request = Request::get("/transactions?period=2026-02")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            build_log_in_redirect_url_from_target("/transactions?period=2026-02")
        );
    }

    #[test]
    fn api_request_returns_to_current_page() {
        let request = Request::delete("/api/transactions/1")
            .header("HX-Request", "true")
            .header("HX-Current-URL", "http://localhost:3000/transactions")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            build_log_in_redirect_url_from_target("/transactions")
        );
    }

    #[test]
    fn api_request_without_htmx_headers_has_no_target() {
        let request = Request::delete("/api/transactions/1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(build_log_in_redirect_url(&request), None);
    }
}
