//! Request dispatch module
//!
//! Entry point for HTTP request processing: body size check, route table
//! resolution, form decoding for the POST binding, view rendering, and
//! access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::http::{form, response};
use crate::logger::{self, AccessLogEntry};
use crate::routing::RouteTarget;
use crate::view::ViewOutcome;

use super::greeting::{self, Greeting};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_label(req.version());

    // 1. Check declared body size before touching the body
    if let Some(resp) = check_body_size(
        req.headers().get("content-length"),
        state.config.http.max_body_size,
    ) {
        log_access(&state, &peer_addr, &method, &path, query.as_deref(), http_version, &resp, started);
        return Ok(resp);
    }

    let content_type = req
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    // 2. Read the body only for methods that carry one
    let body = if method == Method::POST {
        use http_body_util::BodyExt;
        match req.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                logger::log_warning(&format!("Failed to read request body: {e}"));
                let resp = response::build_400_response("Failed to read request body");
                log_access(&state, &peer_addr, &method, &path, query.as_deref(), http_version, &resp, started);
                return Ok(resp);
            }
        }
    } else {
        Bytes::new()
    };

    // 3. Resolve the route table and run the bound operation
    let resp = dispatch(&method, &path, content_type.as_deref(), &body, &state);

    log_access(&state, &peer_addr, &method, &path, query.as_deref(), http_version, &resp, started);
    Ok(resp)
}

/// Resolve the route table and produce a response
///
/// Unknown paths get 404; known paths with an unbound method get 405 with
/// an `Allow` header (OPTIONS gets 204 with the same listing).
fn dispatch(
    method: &Method,
    path: &str,
    content_type: Option<&str>,
    body: &[u8],
    state: &AppState,
) -> Response<Full<Bytes>> {
    match state.routes.resolve(method, path) {
        Some(RouteTarget::GreetingForm) => render_view(state, &greeting::show_form()),
        Some(RouteTarget::GreetingSubmit) => match form::decode_form(content_type, body) {
            Ok(fields) => {
                render_view(state, &greeting::submit_form(Greeting::from_form(&fields)))
            }
            Err(e) => {
                logger::log_warning(&format!("Form decode failed for {path}: {e}"));
                response::build_400_response(&e.to_string())
            }
        },
        None => {
            let allow = state.routes.allow_header(path);
            if allow.is_empty() {
                response::build_404_response()
            } else if *method == Method::OPTIONS {
                response::build_options_response(&allow)
            } else {
                logger::log_warning(&format!("Method not allowed: {method} {path}"));
                response::build_405_response(&allow)
            }
        }
    }
}

/// Render a handler outcome, turning render failures into 500
fn render_view(state: &AppState, outcome: &ViewOutcome) -> Response<Full<Bytes>> {
    match state.templates.render(outcome) {
        Ok(html) => response::build_html_response(html, &state.config.http.server_name),
        Err(e) => {
            logger::log_error(&format!("Failed to render view '{}': {e}", outcome.view));
            response::build_500_response()
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    content_length: Option<&hyper::header::HeaderValue>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = content_length?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(response::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Write the access log entry for a finished request
#[allow(clippy::too_many_arguments)]
fn log_access(
    state: &AppState,
    peer_addr: &SocketAddr,
    method: &Method,
    path: &str,
    query: Option<&str>,
    http_version: &'static str,
    resp: &Response<Full<Bytes>>,
    started: Instant,
) {
    use hyper::body::Body as _;

    if !state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed)
    {
        return;
    }

    let mut entry = AccessLogEntry::new(peer_addr.to_string(), method.to_string(), path.to_string());
    entry.query = query.map(ToString::to_string);
    entry.http_version = http_version.to_string();
    entry.status = resp.status().as_u16();
    entry.body_bytes =
        usize::try_from(resp.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX);
    entry.request_time_us =
        u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::form::FORM_CONTENT_TYPE;
    use http_body_util::BodyExt;

    fn test_state() -> AppState {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        AppState::new(&cfg).unwrap()
    }

    async fn body_text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_get_greeting_form_is_ok() {
        let state = test_state();
        let resp = dispatch(&Method::GET, "/greeting2", None, b"", &state);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_post_greeting_echoes_value() {
        let state = test_state();
        let resp = dispatch(
            &Method::POST,
            "/greeting2",
            Some(FORM_CONTENT_TYPE),
            b"value=Hi+there",
            &state,
        );
        assert_eq!(resp.status(), 200);
        assert!(body_text(resp).await.contains("Hi there"));
    }

    #[tokio::test]
    async fn test_post_without_fields_uses_default_greeting() {
        let state = test_state();
        let resp = dispatch(&Method::POST, "/greeting2", None, b"", &state);
        assert_eq!(resp.status(), 200);
        assert!(body_text(resp).await.contains("<form"));
    }

    #[test]
    fn test_post_with_wrong_content_type_is_rejected() {
        let state = test_state();
        let resp = dispatch(
            &Method::POST,
            "/greeting2",
            Some("application/json"),
            b"{}",
            &state,
        );
        assert_eq!(resp.status(), 400);
    }

    #[test]
    fn test_unknown_path_is_404() {
        let state = test_state();
        let resp = dispatch(&Method::GET, "/missing", None, b"", &state);
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_unbound_method_is_405_with_allow() {
        let state = test_state();
        let resp = dispatch(&Method::DELETE, "/greeting2", None, b"", &state);
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers().get("allow").unwrap(), "GET, POST");
    }

    #[test]
    fn test_body_over_limit_is_413() {
        let header = hyper::header::HeaderValue::from_static("65537");
        let resp = check_body_size(Some(&header), 65_536).unwrap();
        assert_eq!(resp.status(), 413);
    }

    #[test]
    fn test_body_at_limit_passes() {
        let header = hyper::header::HeaderValue::from_static("65536");
        assert!(check_body_size(Some(&header), 65_536).is_none());
    }

    #[test]
    fn test_missing_content_length_passes() {
        assert!(check_body_size(None, 65_536).is_none());
    }

    #[test]
    fn test_unparsable_content_length_skips_check() {
        let header = hyper::header::HeaderValue::from_static("not-a-number");
        assert!(check_body_size(Some(&header), 65_536).is_none());
    }

    #[test]
    fn test_options_lists_allowed_methods() {
        let state = test_state();
        let resp = dispatch(&Method::OPTIONS, "/greeting2", None, b"", &state);
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers().get("allow").unwrap(), "GET, POST");
    }
}
