//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for static file serving
pub struct RequestContext {
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type: every route reads only the method, URI and headers.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let logging = &state.config.logging;

    let access_entry = logging
        .access_log
        .then(|| AccessLogEntry::from_request(&peer_addr, &req));
    logger::log_headers_count(req.headers().len(), logging.show_headers);

    let mut response = route_request(&req, &state).await;
    http::apply_common_headers(
        &mut response,
        &state.config.http.server_name,
        state.config.http.enable_cors,
    );

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and configuration
async fn route_request<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();
    let path = req.uri().path();
    let config = &state.config;

    // 1. Preflight
    if *method == Method::OPTIONS {
        return http::build_options_response(config.http.enable_cors);
    }

    // 2. Body size
    if let Some(resp) = check_body_size(req, config.http.max_body_size) {
        return resp;
    }

    // 3. Health check endpoints
    let health = &config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return read_only(method, || http::build_health_response("ok"));
    }

    // 4. Root redirect to the sign-up page
    if path == "/" {
        return read_only(method, || {
            http::build_redirect_response(&config.static_files.index_page)
        });
    }

    // 5. Activities API
    if api::is_api_path(path) {
        return api::handle_api_request(req, state).await;
    }

    // 6. Static assets
    if let Some(relative) = strip_mount(path, &config.static_files.mount) {
        if !matches!(*method, Method::GET | Method::HEAD) {
            return http::build_405_response("GET, HEAD");
        }
        let ctx = RequestContext {
            is_head: *method == Method::HEAD,
            if_none_match: req
                .headers()
                .get("if-none-match")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
        };
        return static_files::serve_directory(
            &ctx,
            &config.static_files.dir,
            relative,
            &config.static_files.index_files,
        )
        .await;
    }

    http::build_404_response()
}

/// Answer GET/HEAD with `build`, anything else with 405
fn read_only(
    method: &Method,
    build: impl FnOnce() -> Response<Full<Bytes>>,
) -> Response<Full<Bytes>> {
    match *method {
        Method::GET | Method::HEAD => build(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response("GET, HEAD")
        }
    }
}

/// Path below the static mount point, or `None` when outside it
fn strip_mount<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    let mount = mount.trim_end_matches('/');
    let rest = path.strip_prefix(mount)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
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
                Some(http::build_413_response())
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
