// API module entry
// Activities REST endpoints backed by the catalog store

mod handlers;
mod query;
mod response;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::logger;

use query::{decode_path_segment, query_param};

const ACTIVITIES_PATH: &str = "/activities";

/// Resource addressed by an API path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRoute {
    /// `/activities`
    Activities,
    /// `/activities/{name}/signup`
    Signup(String),
    /// `/activities/{name}/participants`
    Participants(String),
}

impl ApiRoute {
    /// Parse a raw (still percent-encoded) request path
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(ACTIVITIES_PATH)?;
        if rest.is_empty() || rest == "/" {
            return Some(Self::Activities);
        }

        let rest = rest.strip_prefix('/')?;
        let (raw_name, action) = rest.split_once('/')?;
        if raw_name.is_empty() {
            return None;
        }
        let name = decode_path_segment(raw_name)?;

        match action {
            "signup" => Some(Self::Signup(name)),
            "participants" => Some(Self::Participants(name)),
            _ => None,
        }
    }

    /// Value of the `Allow` header for this resource
    pub const fn allow(&self) -> &'static str {
        match self {
            Self::Activities => "GET, HEAD",
            Self::Signup(_) => "POST",
            Self::Participants(_) => "DELETE",
        }
    }
}

/// Whether a path belongs to the activities API
pub fn is_api_path(path: &str) -> bool {
    path == ACTIVITIES_PATH || path.starts_with("/activities/")
}

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_api_request<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let path = req.uri().path();
    let method = req.method();

    let Some(route) = ApiRoute::parse(path) else {
        logger::log_api_request(method.as_str(), path, 404);
        return response::not_found();
    };

    let email = || query_param(req.uri().query(), "email");

    match (method, &route) {
        (&Method::GET | &Method::HEAD, ApiRoute::Activities) => {
            handlers::list_activities(state, method, path).await
        }
        (&Method::POST, ApiRoute::Signup(name)) => {
            handlers::signup(state, path, name, email()).await
        }
        (&Method::DELETE, ApiRoute::Participants(name)) => {
            handlers::remove_participant(state, path, name, email()).await
        }
        _ => {
            logger::log_api_request(method.as_str(), path, 405);
            response::method_not_allowed(route.allow())
        }
    }
}
