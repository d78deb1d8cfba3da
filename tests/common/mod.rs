//! Shared helpers for integration tests
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use spa_callback_server::logger::AccessSink;
use spa_callback_server::server::create_reusable_listener;
use spa_callback_server::{AppState, Config, Server, ServerOptions};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const ENTRY_DOCUMENT: &str = "<!DOCTYPE html><html><body><div id=\"app\"></div></body></html>";
pub const APP_JS: &str = "window.main = function () { return 42; };";
pub const LOGO_PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Collects request log lines
#[derive(Default)]
pub struct CapturedLog {
    pub lines: Mutex<Vec<String>>,
}

impl AccessSink for CapturedLog {
    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

impl CapturedLog {
    pub fn count(&self) -> usize {
        self.lines.lock().unwrap().len()
    }
}

/// A running server on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub log: Arc<CapturedLog>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Signal shutdown and wait for the server task to finish
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(std::time::Duration::from_secs(10), self.handle)
            .await
            .expect("server should stop")
            .unwrap();
    }
}

/// Asset root with an entry document, a script, an image, and a nested file
pub fn asset_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    dir
}

pub fn write_assets(root: &Path) {
    std::fs::write(root.join("index.html"), ENTRY_DOCUMENT).unwrap();
    std::fs::write(root.join("app.js"), APP_JS).unwrap();
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("assets/logo.png"), LOGO_PNG).unwrap();
}

pub async fn start(root: &Path) -> TestServer {
    let config = Config::from(ServerOptions {
        port: 0,
        asset_root: root.to_path_buf(),
        ..ServerOptions::default()
    });
    start_with_config(config).await
}

pub async fn start_with_config(config: Config) -> TestServer {
    let log = Arc::new(CapturedLog::default());
    let state = Arc::new(AppState::with_sink(config, log.clone()));

    let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let server = Server::with_state(state);
    let handle = tokio::spawn(async move {
        server
            .run_with_listener(listener, async move {
                let _ = rx.await;
            })
            .await;
    });

    TestServer {
        addr,
        log,
        shutdown: Some(tx),
        handle,
    }
}
