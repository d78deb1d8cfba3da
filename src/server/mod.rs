// Server module entry
// Listener setup, connection handling, and lifecycle

pub mod connection;
pub mod listener;
pub mod shutdown;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::{Config, ServerOptions};
use crate::logger;
use crate::state::AppState;

/// How long in-flight connections get to finish after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The HTTP server: configuration plus the request pipeline built from it
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self::with_state(Arc::new(AppState::new(config)))
    }

    pub const fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub const fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Bind the configured address
    pub fn bind(&self) -> Result<TcpListener, Box<dyn std::error::Error>> {
        let addr = self.state.config.socket_addr()?;
        Ok(create_reusable_listener(addr)?)
    }

    /// Bind, print the banner, and serve until SIGINT/SIGTERM
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = self.bind()?;
        logger::log_server_start(&listener.local_addr()?, &self.state.config);

        let signals = Arc::new(signal::SignalHandler::new());
        signal::start_signal_handler(Arc::clone(&signals));

        self.run_with_listener(listener, async move { signals.wait_for_shutdown().await })
            .await;
        Ok(())
    }

    /// Serve on an already-bound listener until `shutdown` resolves, then
    /// give open connections a short grace period.
    pub async fn run_with_listener(self, listener: TcpListener, shutdown: impl Future<Output = ()>) {
        start_server_loop(listener, Arc::clone(&self.state), shutdown).await;
        shutdown::drain_connections(&self.state, SHUTDOWN_GRACE).await;
    }
}

impl From<ServerOptions> for Server {
    fn from(options: ServerOptions) -> Self {
        Self::new(Config::from(options))
    }
}
