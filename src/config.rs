//! Environment-driven runtime configuration.
//!
//! The historical worker deployments differed only in a handful of knobs —
//! whether mutations required a token, which origin CORS allowed, whether
//! history was logged. Those differences are configuration here, not code
//! paths.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address for the HTTP listener.
    pub listen_addr: String,
    /// Directory for the file-backed KV store.
    pub data_dir: PathBuf,
    /// Bearer secret for privileged operations. `None` disables the auth
    /// gate entirely (how the earliest deployment ran).
    pub admin_token: Option<String>,
    /// Value for `Access-Control-Allow-Origin`.
    pub allowed_origin: String,
    /// Image-host credential.
    pub imgur_client_id: String,
    /// Whether mutations are recorded in the history log.
    pub history_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8787".to_string(),
            data_dir: PathBuf::from("data"),
            admin_token: None,
            allowed_origin: "*".to_string(),
            imgur_client_id: String::new(),
            history_enabled: true,
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: env::var("CATALOG_LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            data_dir: env::var("CATALOG_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            admin_token: env::var("CATALOG_ADMIN_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            allowed_origin: env::var("CATALOG_ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            imgur_client_id: env::var("IMGUR_CLIENT_ID").unwrap_or(defaults.imgur_client_id),
            history_enabled: env::var("CATALOG_HISTORY")
                .map(|raw| parse_flag(&raw))
                .unwrap_or(defaults.history_enabled),
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}
