//! Single-page-app fallback stage
//!
//! Every GET/HEAD that reaches this stage gets the entry document, so the
//! client-side router can take over. There is no 404 here; a missing entry
//! document is a fault.

use async_trait::async_trait;
use std::path::PathBuf;

use super::static_files::serve_file;
use super::{Middleware, Outcome, RequestContext};
use crate::error::ServeError;

pub struct SpaFallback {
    index_path: PathBuf,
}

impl SpaFallback {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
        }
    }
}

#[async_trait]
impl Middleware for SpaFallback {
    fn name(&self) -> &'static str {
        "spa_fallback"
    }

    async fn handle(&self, ctx: &RequestContext) -> Result<Outcome, ServeError> {
        if !ctx.is_read() {
            return Ok(Outcome::Continue);
        }
        serve_file(ctx, &self.index_path).await.map(Outcome::Handled)
    }
}
