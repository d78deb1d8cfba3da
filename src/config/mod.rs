// Configuration module entry point
// Loads layered configuration and converts between the full and narrow forms

mod types;

use std::net::SocketAddr;

pub use types::{
    AssetsConfig, Config, HttpConfig, LoggingConfig, OAuthConfig, PerformanceConfig,
    ServerConfig, ServerOptions, DEFAULT_REDIRECT_SCHEME,
};

/// Config file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (extension optional).
    /// The file is not required; defaults and `SERVER__*` env vars still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.aliases", defaults.server.aliases)?
            .set_default("assets.root", defaults.assets.root.to_string_lossy().into_owned())?
            .set_default("assets.index_file", defaults.assets.index_file)?
            .set_default("oauth.redirect_scheme", defaults.oauth.redirect_scheme)?
            .set_default("oauth.code_param", defaults.oauth.code_param)?
            .set_default("oauth.encode_code", defaults.oauth.encode_code)?
            .set_default("logging.access_log", defaults.logging.access_log)?
            .set_default("logging.access_log_format", defaults.logging.access_log_format)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", defaults.http.server_name)?
            .set_default("http.cors_max_age", i64::from(defaults.http.cors_max_age))?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Narrow view of the settings that shape request handling
    pub fn options(&self) -> ServerOptions {
        ServerOptions {
            port: self.server.port,
            asset_root: self.assets.root.clone(),
            redirect_scheme: self.oauth.redirect_scheme.clone(),
        }
    }

    /// Absolute-or-relative path of the entry document
    pub fn index_path(&self) -> std::path::PathBuf {
        self.assets.root.join(&self.assets.index_file)
    }
}

impl From<ServerOptions> for Config {
    fn from(options: ServerOptions) -> Self {
        let mut config = Self::default();
        config.server.port = options.port;
        config.assets.root = options.asset_root;
        config.oauth.redirect_scheme = options.redirect_scheme;
        config
    }
}
