// Graceful shutdown module
// Gives in-flight connections a bounded window to finish

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::logger;
use crate::state::AppState;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait until no connection is active or `grace` has elapsed.
///
/// Returns the number of connections still open when the wait ended.
/// Those are not cancelled here; they end when the runtime shuts down.
pub async fn drain_connections(state: &AppState, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let active = state.active_connections.load(Ordering::SeqCst);
        if active == 0 {
            logger::log_info("[SHUTDOWN] All connections closed");
            return 0;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {active} connection(s) still open"
            ));
            return active;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
