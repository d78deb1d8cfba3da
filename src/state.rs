//! Shared server state
//!
//! Built once at startup and read by every connection. Nothing in it changes
//! while the server runs apart from the connection counter.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use crate::config::Config;
use crate::handler::Pipeline;
use crate::logger::{AccessSink, WriterSink};

pub struct AppState {
    pub config: Config,
    pub pipeline: Pipeline,
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// State whose request log goes to the global log writer
    pub fn new(config: Config) -> Self {
        Self::with_sink(config, Arc::new(WriterSink))
    }

    /// State whose request log goes to `sink`
    pub fn with_sink(config: Config, sink: Arc<dyn AccessSink>) -> Self {
        let pipeline = Pipeline::standard(&config, sink);
        Self {
            config,
            pipeline,
            active_connections: AtomicUsize::new(0),
        }
    }
}
