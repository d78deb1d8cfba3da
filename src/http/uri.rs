//! Request URI helpers
//!
//! Query parameters use form-urlencoded decoding (`+` is a space); paths use
//! plain percent-decoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;

/// Bytes that could end a quoted script string or element, or change how the
/// value reads as a query component. Non-ASCII is always encoded.
const SCRIPT_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'\\')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'%')
    .add(b'#')
    .add(b'`');

/// First value of `name` in a raw query string, decoded
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Percent-decode a request path. `None` when the result is not UTF-8.
pub fn decode_path(path: &str) -> Option<String> {
    urlencoding::decode(path).ok().map(std::borrow::Cow::into_owned)
}

/// Encode a value for embedding in a quoted script string as a query value.
/// Only [`SCRIPT_UNSAFE`] bytes and non-ASCII are escaped; `/`, `~`, `:` and
/// the like pass through.
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, SCRIPT_UNSAFE).to_string()
}
