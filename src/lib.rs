//! Static single-page-app server with an OAuth callback relay.
//!
//! Requests pass through a fixed chain: request log, CORS preflight, OAuth
//! callback, static files, SPA fallback. A `?code=` on any path is forwarded
//! to the mobile app's URI scheme; everything else is an asset or the entry
//! document.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod state;

pub use config::{Config, ServerOptions};
pub use error::ServeError;
pub use server::Server;
pub use state::AppState;
