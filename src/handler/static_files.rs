//! Static file serving stage
//!
//! Maps a request path onto the asset root. Anything that does not resolve to
//! a regular file inside the root is left for the next stage.

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::IF_NONE_MATCH;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{Middleware, Outcome, RequestContext};
use crate::error::ServeError;
use crate::http::{self, cache, mime, uri};
use crate::logger;

pub struct StaticFiles {
    root: PathBuf,
    index_file: String,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
        }
    }

    /// Canonical path of the file a request path names, if it exists under
    /// the root. Directories resolve to their index file.
    pub async fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let decoded = uri::decode_path(request_path)?;
        let relative = relative_path(&decoded)?;

        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Asset root not found or inaccessible '{}': {e}",
                    self.root.display()
                ));
                return None;
            }
        };

        let mut candidate = root.join(relative);
        if fs::metadata(&candidate).await.ok()?.is_dir() {
            candidate.push(&self.index_file);
        }

        // Missing files are the common case, not worth a log line
        let canonical = fs::canonicalize(&candidate).await.ok()?;
        if !canonical.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {request_path} -> {}",
                canonical.display()
            ));
            return None;
        }

        fs::metadata(&canonical)
            .await
            .ok()
            .filter(std::fs::Metadata::is_file)
            .map(|_| canonical)
    }
}

#[async_trait]
impl Middleware for StaticFiles {
    fn name(&self) -> &'static str {
        "static_files"
    }

    async fn handle(&self, ctx: &RequestContext) -> Result<Outcome, ServeError> {
        if !ctx.is_read() {
            return Ok(Outcome::Continue);
        }
        match self.resolve(ctx.path()).await {
            Some(path) => serve_file(ctx, &path).await.map(Outcome::Handled),
            None => Ok(Outcome::Continue),
        }
    }
}

/// Read a file and answer with it, or with 304 when the client's copy is
/// current. A read failure is a fault.
pub async fn serve_file(
    ctx: &RequestContext,
    path: &Path,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let data = fs::read(path).await.map_err(|e| ServeError::io(path, e))?;
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(ctx.header(IF_NONE_MATCH), &etag) {
        return Ok(http::build_304_response(&etag));
    }

    Ok(http::build_asset_response(
        Bytes::from(data),
        mime::content_type_for(path),
        &etag,
        ctx.is_head(),
    ))
}

/// Turn a decoded URL path into a relative filesystem path.
/// Parent references and dot-files are refused.
fn relative_path(decoded: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            s if s.starts_with('.') || s.contains(['\\', '\0']) => return None,
            s => relative.push(s),
        }
    }
    Some(relative)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{body_string, get, handled};
    use super::*;
    use hyper::header::{HeaderValue, CONTENT_TYPE, ETAG};
    use hyper::{Method, StatusCode};

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>app</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();
        std::fs::create_dir_all(dir.path().join("assets/fonts")).unwrap();
        std::fs::write(dir.path().join("assets/fonts/Roboto.ttf"), [0u8, 1, 2, 3]).unwrap();
        std::fs::write(dir.path().join("assets/my file.txt"), "spaced").unwrap();
        std::fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "docs").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_existing_file_is_served_with_type() {
        let dir = fixture();
        let stage = StaticFiles::new(dir.path(), "index.html");
        let response = handled(stage.handle(&get("/app.js")).await.unwrap());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
        assert!(response.headers().contains_key(ETAG));
        assert_eq!(body_string(response).await, "console.log('hi');");
    }

    #[tokio::test]
    async fn test_nested_and_percent_encoded_paths() {
        let dir = fixture();
        let stage = StaticFiles::new(dir.path(), "index.html");

        let font = handled(stage.handle(&get("/assets/fonts/Roboto.ttf")).await.unwrap());
        assert_eq!(font.headers()[CONTENT_TYPE], "font/ttf");

        let spaced = handled(stage.handle(&get("/assets/my%20file.txt")).await.unwrap());
        assert_eq!(body_string(spaced).await, "spaced");
    }

    #[tokio::test]
    async fn test_directories_resolve_to_index() {
        let dir = fixture();
        let stage = StaticFiles::new(dir.path(), "index.html");

        let root = handled(stage.handle(&get("/")).await.unwrap());
        assert_eq!(body_string(root).await, "<html>app</html>");

        let docs = handled(stage.handle(&get("/docs")).await.unwrap());
        assert_eq!(body_string(docs).await, "docs");

        // A directory without an index file is not listed
        let outcome = stage.handle(&get("/assets")).await.unwrap();
        assert!(matches!(outcome, Outcome::Continue));
    }

    #[tokio::test]
    async fn test_unmatched_paths_pass_through() {
        let dir = fixture();
        let stage = StaticFiles::new(dir.path(), "index.html");
        for path in [
            "/some/client/route",
            "/app.js/extra",
            "/../etc/passwd",
            "/assets/../../secret",
            "/.env",
            "/%2e%2e/%2e%2e/etc/passwd",
        ] {
            let outcome = stage.handle(&get(path)).await.unwrap();
            assert!(matches!(outcome, Outcome::Continue), "{path} should pass through");
        }
    }

    #[tokio::test]
    async fn test_non_read_methods_pass_through() {
        let dir = fixture();
        let stage = StaticFiles::new(dir.path(), "index.html");
        let ctx = RequestContext::new(Method::POST, "/app.js".parse().unwrap());
        assert!(matches!(stage.handle(&ctx).await.unwrap(), Outcome::Continue));
    }

    #[tokio::test]
    async fn test_missing_root_passes_through() {
        let stage = StaticFiles::new("/definitely/not/a/root", "index.html");
        assert!(matches!(stage.handle(&get("/app.js")).await.unwrap(), Outcome::Continue));
    }

    #[tokio::test]
    async fn test_if_none_match_returns_304() {
        let dir = fixture();
        let stage = StaticFiles::new(dir.path(), "index.html");
        let first = handled(stage.handle(&get("/app.js")).await.unwrap());
        let etag = first.headers()[ETAG].clone();

        let mut ctx = get("/app.js");
        ctx.headers.insert(IF_NONE_MATCH, etag);
        let second = handled(stage.handle(&ctx).await.unwrap());
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);

        ctx.headers.insert(IF_NONE_MATCH, HeaderValue::from_static("\"stale\""));
        let third = handled(stage.handle(&ctx).await.unwrap());
        assert_eq!(third.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_fault() {
        let dir = fixture();
        let ctx = get("/gone.js");
        let result = serve_file(&ctx, &dir.path().join("gone.js")).await;
        assert!(matches!(result, Err(ServeError::Io { .. })));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("/a/./b//c.js"), Some(PathBuf::from("a/b/c.js")));
        assert_eq!(relative_path("/"), Some(PathBuf::new()));
        assert_eq!(relative_path("/a/../b"), None);
        assert_eq!(relative_path("/.well-known/x"), None);
        assert_eq!(relative_path("/a\\b"), None);
    }
}
