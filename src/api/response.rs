// API response utility functions module

use crate::catalog::CatalogError;
use crate::http::cache::CachePolicy;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build JSON response
///
/// Catalog data changes on every sign-up, so API responses are never cached.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string_pretty(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(
                    r#"{"detail":"Internal server error"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))));
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", CachePolicy::NoStore.to_header_value())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// 200 with `{"message": ...}`
pub fn message_response(message: &str) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({ "message": message }))
}

/// Error with `{"detail": ...}`
pub fn error_response(status: StatusCode, detail: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "detail": detail }))
}

/// Map a catalog failure onto its status and detail message
pub fn catalog_error(err: CatalogError) -> Response<Full<Bytes>> {
    error_response(err.status(), &err.to_string())
}

/// 404 Not Found response
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// 405 Method Not Allowed response
pub fn method_not_allowed(allow: &'static str) -> Response<Full<Bytes>> {
    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    response
        .headers_mut()
        .insert("Allow", hyper::header::HeaderValue::from_static(allow));
    response
}

/// 422 for a request missing a required query parameter
pub fn missing_query_param(name: &str) -> Response<Full<Bytes>> {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        &format!("Missing required query parameter: {name}"),
    )
}
