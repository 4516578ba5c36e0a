use std::path::PathBuf;

use folio_core::image::DEFAULT_DESTINATION;
use folio_core::translation::FALLBACK_LOCALE;

use crate::auth::jwt::JwtConfig;

/// Credentials for the admin account ensured at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

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
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Directory uploaded files are written below.
    pub storage_root: PathBuf,
    /// Storage directory for project cover images, relative to `storage_root`.
    pub image_destination: String,
    /// Locale used when a request does not name one.
    pub default_locale: String,
    /// Path segment the admin panel is mounted under (`/{prefix}/category`).
    pub admin_route_prefix: String,
    /// Admin account to create at startup, if configured.
    pub admin_seed: Option<AdminSeed>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `STORAGE_ROOT`         | `./storage`                |
    /// | `IMAGE_DESTINATION`    | `projects`                 |
    /// | `DEFAULT_LOCALE`       | `en`                       |
    /// | `ADMIN_ROUTE_PREFIX`   | `admin`                    |
    /// | `ADMIN_EMAIL`          | -- (no seed when unset)    |
    /// | `ADMIN_PASSWORD`       | -- (required with email)   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
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

        let jwt = JwtConfig::from_env();

        let storage_root = std::env::var("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./storage"));

        let image_destination =
            std::env::var("IMAGE_DESTINATION").unwrap_or_else(|_| DEFAULT_DESTINATION.into());

        let default_locale =
            std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| FALLBACK_LOCALE.into());

        let admin_route_prefix = std::env::var("ADMIN_ROUTE_PREFIX")
            .unwrap_or_else(|_| "admin".into())
            .trim_matches('/')
            .to_string();
        assert!(
            !admin_route_prefix.is_empty(),
            "ADMIN_ROUTE_PREFIX must not be empty"
        );

        let admin_seed = std::env::var("ADMIN_EMAIL").ok().map(|email| AdminSeed {
            email,
            password: std::env::var("ADMIN_PASSWORD")
                .expect("ADMIN_PASSWORD must be set when ADMIN_EMAIL is"),
        });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            storage_root,
            image_destination,
            default_locale,
            admin_route_prefix,
            admin_seed,
        }
    }
}
