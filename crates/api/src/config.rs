use crate::auth::jwt::JwtConfig;

/// Default department for projects whose guide has none recorded.
pub const DEFAULT_DEPARTMENT: &str = "Computer Science";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Request body limit for multipart uploads.
    pub max_upload_bytes: usize,
    /// Used when a guide's profile has no department.
    pub default_department: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

/// Where uploaded objects live and how their URLs are built.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Filesystem directory holding one subdirectory per bucket.
    pub root: String,
    /// External base URL of this service, used in file URLs.
    pub public_base_url: String,
    /// Key for signed download URLs.
    pub signing_secret: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `MAX_UPLOAD_BYTES`       | `52428800` (50 MiB)        |
    /// | `DEFAULT_DEPARTMENT`     | `Computer Science`         |
    /// | `STORAGE_ROOT`           | `./storage`                |
    /// | `PUBLIC_BASE_URL`        | `http://localhost:{PORT}`  |
    /// | `STORAGE_SIGNING_SECRET` | value of `JWT_SECRET`      |
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

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (50 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let default_department =
            std::env::var("DEFAULT_DEPARTMENT").unwrap_or_else(|_| DEFAULT_DEPARTMENT.into());

        let jwt = JwtConfig::from_env();

        let storage = StorageConfig {
            root: std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            signing_secret: std::env::var("STORAGE_SIGNING_SECRET")
                .unwrap_or_else(|_| jwt.secret.clone()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes,
            default_department,
            jwt,
            storage,
        }
    }
}
