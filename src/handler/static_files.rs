//! Static file serving module
//!
//! Handles static file loading, MIME type detection, and response building.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a file from the static directory
///
/// `relative_path` is the request path with the mount prefix removed.
pub async fn serve_directory(
    ctx: &RequestContext,
    dir: &str,
    relative_path: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_directory(dir, relative_path, index_files).await {
        Some((content, content_type)) => {
            build_static_file_response(content, content_type, ctx.if_none_match.as_deref(), ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load static file from directory with index file support
pub async fn load_from_directory(
    static_dir: &str,
    relative_path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let decoded = urlencoding::decode(relative_path).ok()?;
    let clean_path = decoded.trim_start_matches('/');

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = static_dir_canonical.join(clean_path);

    // Directory requests fall back to the first existing index file
    if file_path.is_dir() {
        let index_path = index_files
            .iter()
            .map(|index| file_path.join(index))
            .find(|candidate| candidate.is_file())?;
        file_path = index_path;
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative_path} -> {}",
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    // Determine content type from extension
    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let public = root.path().join("public");
        std::fs::create_dir_all(public.join("docs")).unwrap();
        std::fs::write(public.join("index.html"), "<h1>Activities</h1>").unwrap();
        std::fs::write(public.join("app.js"), "console.log('hi');").unwrap();
        std::fs::write(public.join("docs/index.html"), "<p>docs</p>").unwrap();
        std::fs::write(public.join("my file.txt"), "spaced").unwrap();
        std::fs::write(root.path().join("secret.txt"), "top secret").unwrap();
        root
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string()]
    }

    #[tokio::test]
    async fn test_load_file_with_type() {
        let root = site();
        let dir = root.path().join("public");
        let (content, content_type) =
            load_from_directory(dir.to_str().unwrap(), "/app.js", &index_files())
                .await
                .unwrap();
        assert_eq!(content, b"console.log('hi');");
        assert_eq!(content_type, "application/javascript; charset=utf-8");
    }

    #[tokio::test]
    async fn test_directory_index_fallback() {
        let root = site();
        let dir = root.path().join("public");
        let dir = dir.to_str().unwrap();

        let (content, _) = load_from_directory(dir, "", &index_files()).await.unwrap();
        assert_eq!(content, b"<h1>Activities</h1>");
        let (content, _) = load_from_directory(dir, "/docs/", &index_files()).await.unwrap();
        assert_eq!(content, b"<p>docs</p>");
        assert!(load_from_directory(dir, "/docs/", &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_percent_encoded_name() {
        let root = site();
        let dir = root.path().join("public");
        let (content, _) =
            load_from_directory(dir.to_str().unwrap(), "/my%20file.txt", &index_files())
                .await
                .unwrap();
        assert_eq!(content, b"spaced");
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let root = site();
        let dir = root.path().join("public");
        let dir = dir.to_str().unwrap();
        assert!(load_from_directory(dir, "/../secret.txt", &index_files()).await.is_none());
        assert!(load_from_directory(dir, "/%2E%2E/secret.txt", &index_files()).await.is_none());
        assert!(load_from_directory(dir, "/missing.css", &index_files()).await.is_none());
    }

    #[test]
    fn test_etag_revalidation() {
        let data = b"body { color: red; }".to_vec();
        let etag = cache::generate_etag(&data);

        let fresh = build_static_file_response(data.clone(), "text/css", None, false);
        assert_eq!(fresh.status(), 200);
        assert_eq!(fresh.headers()["ETag"], etag.as_str());

        let cached = build_static_file_response(data, "text/css", Some(&etag), false);
        assert_eq!(cached.status(), 304);
    }
}
