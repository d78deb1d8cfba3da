// Server loop module
// Accepts connections until shutdown is requested

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::logger;
use crate::state::AppState;

/// Accept connections on `listener` until `shutdown` resolves.
///
/// Accept errors are logged and the loop keeps going; they are usually
/// transient (e.g. running out of file descriptors).
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_info("[SHUTDOWN] No longer accepting connections");
                break;
            }
        }
    }
}
