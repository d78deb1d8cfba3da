//! Request entry point
//!
//! Runs the pipeline and stamps the headers every response carries.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use super::RequestContext;
use crate::http::{cors, response};
use crate::state::AppState;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let ctx = RequestContext::from_request(&req, remote_addr);
    let mut response = state.pipeline.dispatch(&ctx).await;

    cors::allow_any_origin(&mut response);
    response::set_server_header(&mut response, &state.config.http.server_name);
    Ok(response)
}
