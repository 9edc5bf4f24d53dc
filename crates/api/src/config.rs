use crate::auth::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
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
    /// Visitor-facing origin used to build share links
    /// (default: `http://localhost:5173`).
    pub public_origin: String,
    /// Staff token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// External wallet pass endpoints.
    pub wallet: WalletConfig,
}

/// Endpoints of the external wallet pass services. A platform whose
/// endpoint is unset degrades to a polite "not available" response.
#[derive(Debug, Clone, Default)]
pub struct WalletConfig {
    /// Apple Wallet pass issuer endpoint (`WALLET_APPLE_URL`).
    pub apple_endpoint: Option<String>,
    /// Google Wallet pass issuer endpoint (`WALLET_GOOGLE_URL`).
    pub google_endpoint: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PUBLIC_ORIGIN`        | `http://localhost:5173`    |
    /// | `WALLET_APPLE_URL`     | unset                      |
    /// | `WALLET_GOOGLE_URL`    | unset                      |
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

        let public_origin = std::env::var("PUBLIC_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".into());

        let wallet = WalletConfig {
            apple_endpoint: std::env::var("WALLET_APPLE_URL").ok(),
            google_endpoint: std::env::var("WALLET_GOOGLE_URL").ok(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_origin,
            jwt: JwtConfig::from_env(),
            wallet,
        }
    }
}
