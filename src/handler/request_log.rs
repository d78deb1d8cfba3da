//! Request logging stage
//!
//! Writes one line per request on arrival, then always passes the request on.

use async_trait::async_trait;
use hyper::header::USER_AGENT;
use std::sync::Arc;

use super::{Middleware, Outcome, RequestContext};
use crate::error::ServeError;
use crate::logger::{AccessLogEntry, AccessSink};

pub struct RequestLogger {
    format: String,
    sink: Arc<dyn AccessSink>,
}

impl RequestLogger {
    pub fn new(format: String, sink: Arc<dyn AccessSink>) -> Self {
        Self { format, sink }
    }

    fn entry(ctx: &RequestContext) -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(ctx.method.as_str(), ctx.path());
        entry.query = ctx.query().map(ToString::to_string);
        entry.remote_addr = ctx.remote_addr.map(|a| a.to_string());
        entry.user_agent = ctx.header(USER_AGENT).map(ToString::to_string);
        entry
    }
}

#[async_trait]
impl Middleware for RequestLogger {
    fn name(&self) -> &'static str {
        "request_log"
    }

    async fn handle(&self, ctx: &RequestContext) -> Result<Outcome, ServeError> {
        self.sink.write_line(&Self::entry(ctx).format(&self.format));
        Ok(Outcome::Continue)
    }
}
