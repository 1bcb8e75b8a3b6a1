/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Base URL for logos of brands created by price imports.
    pub brand_logo_base_url: String,
    /// Maximum accepted upload size in bytes for import endpoints.
    pub max_upload_bytes: usize,
}

/// Default logo location for imported brands.
pub const DEFAULT_BRAND_LOGO_BASE_URL: &str = "https://cdn.tradein.local/brand-logos";

/// Default upload limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                 |
    /// |-------------------------|-----------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                               |
    /// | `PORT`                  | `3000`                                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                 |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                                    |
    /// | `BRAND_LOGO_BASE_URL`   | `https://cdn.tradein.local/brand-logos` |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let brand_logo_base_url = std::env::var("BRAND_LOGO_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BRAND_LOGO_BASE_URL.into());

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            brand_logo_base_url,
            max_upload_bytes,
        }
    }
}
