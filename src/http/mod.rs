//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the request pipeline stages, decoupled
//! from what any one stage does.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;
pub mod uri;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_405_response, build_500_response, build_asset_response,
    build_html_response,
};
