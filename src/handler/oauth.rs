//! OAuth callback relay stage
//!
//! When the identity provider redirects back with `?code=...`, the browser is
//! handed a page whose script forwards the code to the mobile app's URI
//! scheme. Nothing about the code is checked or kept.

use async_trait::async_trait;

use super::{Middleware, Outcome, RequestContext};
use crate::config::OAuthConfig;
use crate::error::ServeError;
use crate::http::{self, uri};
use crate::logger;

pub struct OAuthCallback {
    redirect_scheme: String,
    code_param: String,
    encode_code: bool,
}

impl OAuthCallback {
    pub fn new(redirect_scheme: impl Into<String>) -> Self {
        Self::from_config(&OAuthConfig {
            redirect_scheme: redirect_scheme.into(),
            ..OAuthConfig::default()
        })
    }

    pub fn from_config(config: &OAuthConfig) -> Self {
        Self {
            redirect_scheme: config.redirect_scheme.clone(),
            code_param: config.code_param.clone(),
            encode_code: config.encode_code,
        }
    }

    /// `<scheme>?code=<code>`, or `&code=` when the scheme already has a query
    pub fn redirect_target(&self, code: &str) -> String {
        let separator = if self.redirect_scheme.contains('?') { '&' } else { '?' };
        let code = if self.encode_code {
            uri::encode_query_value(code)
        } else {
            code.to_string()
        };
        format!("{}{separator}code={code}", self.redirect_scheme)
    }

    fn render_page(&self, code: &str) -> String {
        format!(
            r#"<html>
  <body>
    <script>
      window.location.href = "{}";
    </script>
  </body>
</html>
"#,
            self.redirect_target(code)
        )
    }
}

#[async_trait]
impl Middleware for OAuthCallback {
    fn name(&self) -> &'static str {
        "oauth_callback"
    }

    async fn handle(&self, ctx: &RequestContext) -> Result<Outcome, ServeError> {
        let Some(code) = uri::query_param(ctx.query(), &self.code_param).filter(|c| !c.is_empty())
        else {
            return Ok(Outcome::Continue);
        };

        logger::log_auth_code(&code);
        Ok(Outcome::Handled(http::build_html_response(
            self.render_page(&code),
            ctx.is_head(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{body_string, get, handled};
    use super::*;
    use crate::config::DEFAULT_REDIRECT_SCHEME;
    use hyper::header::CONTENT_TYPE;
    use hyper::{Method, StatusCode};

    fn stage() -> OAuthCallback {
        OAuthCallback::new(DEFAULT_REDIRECT_SCHEME)
    }

    #[tokio::test]
    async fn test_code_is_relayed_to_app_scheme() {
        let response = handled(stage().handle(&get("/?code=abc123")).await.unwrap());
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        let body = body_string(response).await;
        assert!(body.contains("io.supabase.fluttertodo://login-callback/?code=abc123"));
        assert!(body.contains("window.location.href"));
    }

    #[tokio::test]
    async fn test_any_path_and_method_is_intercepted() {
        let ctx = RequestContext::new(Method::POST, "/deep/link?state=s&code=xyz".parse().unwrap());
        let body = body_string(handled(stage().handle(&ctx).await.unwrap())).await;
        assert!(body.contains("login-callback/?code=xyz"));
    }

    #[tokio::test]
    async fn test_missing_or_empty_code_passes_through() {
        for uri in ["/", "/?state=1", "/?code=", "/?codes=abc"] {
            let outcome = stage().handle(&get(uri)).await.unwrap();
            assert!(matches!(outcome, Outcome::Continue), "{uri} should pass through");
        }
    }

    #[tokio::test]
    async fn test_script_breaking_code_is_encoded() {
        let ctx = get("/?code=%22%3B%3C%2Fscript%3E");
        let body = body_string(handled(stage().handle(&ctx).await.unwrap())).await;
        assert!(!body.contains("</script>\";"));
        assert!(body.contains("?code=%22;%3C/script%3E\""));
    }

    #[tokio::test]
    async fn test_provider_codes_are_relayed_literally() {
        for code in ["4/0AX4Xf", "4/0AX~y", "a~b", "urn:ietf:code"] {
            let ctx = get(&format!("/?code={code}"));
            let body = body_string(handled(stage().handle(&ctx).await.unwrap())).await;
            assert!(
                body.contains(&format!("io.supabase.fluttertodo://login-callback/?code={code}\"")),
                "{code} should be relayed unchanged"
            );
        }
    }

    #[tokio::test]
    async fn test_verbatim_mode_embeds_decoded_code() {
        let stage = OAuthCallback::from_config(&OAuthConfig {
            encode_code: false,
            ..OAuthConfig::default()
        });
        let body = body_string(handled(stage.handle(&get("/?code=a%20b")).await.unwrap())).await;
        assert!(body.contains("login-callback/?code=a b\""));
    }

    #[tokio::test]
    async fn test_head_gets_no_body() {
        let ctx = RequestContext::new(Method::HEAD, "/?code=abc".parse().unwrap());
        let body = body_string(handled(stage().handle(&ctx).await.unwrap())).await;
        assert!(body.is_empty());
    }

    #[test]
    fn test_redirect_target_respects_existing_query() {
        let stage = OAuthCallback::new("myapp://cb/?flow=pkce");
        assert_eq!(stage.redirect_target("c1"), "myapp://cb/?flow=pkce&code=c1");
        assert_eq!(
            OAuthCallback::new("myapp://cb/").redirect_target("c1"),
            "myapp://cb/?code=c1"
        );
    }

    #[tokio::test]
    async fn test_custom_code_param() {
        let stage = OAuthCallback::from_config(&OAuthConfig {
            code_param: "auth_code".to_string(),
            ..OAuthConfig::default()
        });
        let passed = stage.handle(&get("/?code=q")).await.unwrap();
        assert!(matches!(passed, Outcome::Continue));

        let body = body_string(handled(stage.handle(&get("/?auth_code=q")).await.unwrap())).await;
        assert!(body.contains("login-callback/?code=q"));
    }
}
