//! Request log format module
//!
//! A request line is written before the request is processed, so it only
//! carries what is known on arrival. Supported formats:
//! - `default`: `<ISO-8601 time> - <METHOD> <uri>`
//! - `json`: one JSON object per line
//! - custom patterns with variables

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Request log entry
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Arrival time
    #[serde(serialize_with = "serialize_iso8601")]
    pub time: DateTime<Utc>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// Client address, when known
    pub remote_addr: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
}

impl AccessLogEntry {
    /// Create a new entry stamped with the current time
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            method: method.into(),
            path: path.into(),
            query: None,
            remote_addr: None,
            user_agent: None,
        }
    }

    /// ISO-8601 timestamp with millisecond precision, UTC
    pub fn timestamp(&self) -> String {
        iso8601(&self.time)
    }

    /// Path plus query string, as sent by the client
    pub fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Format the entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "default" => self.format_default(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn format_default(&self) -> String {
        format!("{} - {} {}", self.timestamp(), self.method, self.request_uri())
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.format_default())
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$remote_addr` - Client address
    /// - `$request_method` - HTTP method
    /// - `$request_uri` - Path with query string
    /// - `$request_path` - Path only
    /// - `$http_user_agent` - User-Agent header
    fn format_custom(&self, pattern: &str) -> String {
        pattern
            .replace("$time_iso8601", &self.timestamp())
            .replace("$remote_addr", self.remote_addr.as_deref().unwrap_or("-"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.request_uri())
            .replace("$request_path", &self.path)
            .replace(
                "$http_user_agent",
                self.user_agent.as_deref().unwrap_or("-"),
            )
    }
}

fn iso8601(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso8601<S: serde::Serializer>(
    time: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso8601(time))
}
