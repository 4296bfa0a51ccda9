use crate::auth::JwtConfig;

/// Server configuration
///
/// Every item can be overridden through an environment variable:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Database and log directory |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | IMAGE_STORE_URL | (unset) | Image store base URL; in-memory stub when unset |
/// | MAIL_SERVICE_URL | (unset) | Mail relay base URL; recording stub when unset |
/// | LOG_DIR | (unset) | Daily-rolling log files when set |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the embedded database and logs
    pub work_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    pub environment: String,
    pub image_store_url: Option<String>,
    pub mail_service_url: Option<String>,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            image_store_url: std::env::var("IMAGE_STORE_URL").ok(),
            mail_service_url: std::env::var("MAIL_SERVICE_URL").ok(),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Path of the embedded database under the working directory
    pub fn database_path(&self) -> String {
        format!("{}/inventory.db", self.work_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
