//! Config - Application configuration loaded from environment variables

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "change-me-marketplace-secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub upload_dir: PathBuf,
    pub app_env: String,
}

impl Config {
    /// Loads the configuration from environment variables.
    /// Calls dotenv() first so a local `.env` file is honoured.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://marketplace.db".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "16".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        if max_connections == 0 {
            return Err("Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string());
        }

        let upload_dir = PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()));

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            upload_dir,
            app_env,
        })
    }

    /// Logs the configuration, hiding secrets
    pub fn print_info(&self) {
        info!("Environment: {}", self.app_env);
        info!("Server Address: {}:{}", self.server_host, self.server_port);
        info!("Database: {}", Self::mask_url(&self.database_url));
        info!("Max DB Connections: {}", self.max_connections);
        info!("Upload Directory: {}", self.upload_dir.display());
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("JWT Secret: custom secret configured");
        }
    }

    /// Masks credentials embedded in the database URL
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        url.to_string()
    }
}
