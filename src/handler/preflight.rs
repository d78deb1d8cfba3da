//! CORS preflight stage

use async_trait::async_trait;
use hyper::Method;

use super::{Middleware, Outcome, RequestContext};
use crate::error::ServeError;
use crate::http::cors;

/// Answers every `OPTIONS` request with a permissive preflight response
pub struct CorsPreflight {
    max_age: u32,
}

impl CorsPreflight {
    pub const fn new(max_age: u32) -> Self {
        Self { max_age }
    }
}

#[async_trait]
impl Middleware for CorsPreflight {
    fn name(&self) -> &'static str {
        "cors_preflight"
    }

    async fn handle(&self, ctx: &RequestContext) -> Result<Outcome, ServeError> {
        if ctx.method != Method::OPTIONS {
            return Ok(Outcome::Continue);
        }
        Ok(Outcome::Handled(cors::build_preflight_response(
            &ctx.headers,
            self.max_age,
        )))
    }
}
