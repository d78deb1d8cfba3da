//! Permissive CORS
//!
//! Every origin, method and header is allowed. Preflights are answered
//! directly; all other responses get `Access-Control-Allow-Origin: *`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS,
    CONTENT_LENGTH, VARY,
};
use hyper::{Response, StatusCode};

pub const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Build 204 preflight response
///
/// Requested headers are echoed back; without a request list any header is
/// allowed.
pub fn build_preflight_response(request_headers: &HeaderMap, max_age: u32) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
        .header(ACCESS_CONTROL_MAX_AGE, max_age)
        .header(CONTENT_LENGTH, 0);

    builder = match request_headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
        Some(requested) => builder
            .header(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone())
            .header(VARY, "Access-Control-Request-Headers"),
        None => builder.header(ACCESS_CONTROL_ALLOW_HEADERS, "*"),
    };

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build preflight response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

/// Allow any origin to read the response
pub fn allow_any_origin<B>(response: &mut Response<B>) {
    response
        .headers_mut()
        .entry(ACCESS_CONTROL_ALLOW_ORIGIN)
        .or_insert(HeaderValue::from_static("*"));
}
