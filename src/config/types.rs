// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Redirect target the companion mobile app registers for login callbacks
pub const DEFAULT_REDIRECT_SCHEME: &str = "io.supabase.fluttertodo://login-callback/";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads for the runtime (CPU count when unset)
    #[serde(default)]
    pub workers: Option<usize>,
    /// Host names printed in the startup banner as alternative ways in
    #[serde(default = "default_aliases")]
    pub aliases: Vec<String>,
}

fn default_aliases() -> Vec<String> {
    vec!["localhost".to_string(), "10.0.2.2".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            workers: None,
            aliases: default_aliases(),
        }
    }
}

/// Pre-built web application location
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AssetsConfig {
    pub root: PathBuf,
    /// Entry document served for directory requests and unmatched routes
    pub index_file: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("build/web"),
            index_file: "index.html".to_string(),
        }
    }
}

/// OAuth callback relay
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub redirect_scheme: String,
    /// Query parameter carrying the authorization code
    pub code_param: String,
    /// Re-encode the code before embedding it in the redirect script.
    /// `false` embeds the decoded value verbatim.
    pub encode_code: bool,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            redirect_scheme: DEFAULT_REDIRECT_SCHEME.to_string(),
            code_param: "code".to_string(),
            encode_code: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (default, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "default".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration (timeouts in seconds)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

/// HTTP response configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub server_name: String,
    /// `Access-Control-Max-Age` for preflight responses
    pub cors_max_age: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: "spa-callback-server".to_string(),
            cors_max_age: 86_400,
        }
    }
}

/// The three settings that define a deployment: where to listen, what to
/// serve, and where to send callback codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub port: u16,
    pub asset_root: PathBuf,
    pub redirect_scheme: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: 3000,
            asset_root: PathBuf::from("build/web"),
            redirect_scheme: DEFAULT_REDIRECT_SCHEME.to_string(),
        }
    }
}
