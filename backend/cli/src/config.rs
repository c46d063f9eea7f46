use serde::Deserialize;

/// CodeMentor runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Base URL of the gateway, for client-side commands
    pub server_url: String,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            server_url: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("MENTOR_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        Self {
            bind_address: std::env::var("MENTOR_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            server_url: std::env::var("MENTOR_SERVER_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
