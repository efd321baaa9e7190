// Activities API handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};

use super::response::{catalog_error, json_response, message_response, missing_query_param};
use crate::config::AppState;
use crate::logger;

/// `GET /activities` (and `HEAD`)
pub async fn list_activities(state: &AppState, method: &Method, path: &str) -> Response<Full<Bytes>> {
    let activities = state.catalog.list_activities().await;
    logger::log_api_request(method.as_str(), path, 200);
    json_response(StatusCode::OK, &activities)
}

/// `POST /activities/{name}/signup?email=...`
pub async fn signup(
    state: &AppState,
    path: &str,
    activity_name: &str,
    email: Option<String>,
) -> Response<Full<Bytes>> {
    let Some(email) = email else {
        logger::log_api_request("POST", path, 422);
        return missing_query_param("email");
    };

    match state.catalog.signup(activity_name, &email).await {
        Ok(message) => {
            logger::log_api_request("POST", path, 200);
            message_response(&message)
        }
        Err(e) => {
            logger::log_api_request("POST", path, e.status().as_u16());
            catalog_error(e)
        }
    }
}

/// `DELETE /activities/{name}/participants?email=...`
pub async fn remove_participant(
    state: &AppState,
    path: &str,
    activity_name: &str,
    email: Option<String>,
) -> Response<Full<Bytes>> {
    let Some(email) = email else {
        logger::log_api_request("DELETE", path, 422);
        return missing_query_param("email");
    };

    match state.catalog.remove_participant(activity_name, &email).await {
        Ok(message) => {
            logger::log_api_request("DELETE", path, 200);
            message_response(&message)
        }
        Err(e) => {
            logger::log_api_request("DELETE", path, e.status().as_u16());
            catalog_error(e)
        }
    }
}
