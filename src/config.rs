use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("PETMATCH_JWT_SECRET")?;

        let host: IpAddr = env_or("PETMATCH_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PETMATCH_HOST: {e}"))?;

        let port: u16 = env_or("PETMATCH_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PETMATCH_PORT: {e}"))?;

        let upload_dir = PathBuf::from(env_or("PETMATCH_UPLOAD_DIR", "uploads"));

        // Applies to every request body, multipart uploads included
        let max_body_size: usize = env_or("PETMATCH_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid PETMATCH_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("PETMATCH_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            upload_dir,
            max_body_size,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
