use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub drive: DriveConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    /// Path to the service-account JSON key file.
    pub credentials_path: String,
    /// Destination parent folder. `None` uploads into the Drive root.
    pub parent_folder_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_retries: u32,
    pub retry_delay_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            drive: DriveConfig {
                credentials_path: env::var("GDRIVE_CREDENTIALS")
                    .expect("GDRIVE_CREDENTIALS must be set"),
                parent_folder_id: env::var("GDRIVE_PARENT_ID").ok(),
            },
            upload: UploadConfig {
                max_retries: env::var("UPLOAD_MAX_RETRIES")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()?,
                retry_delay_secs: env::var("UPLOAD_RETRY_DELAY_SECS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()?,
            },
        })
    }
}
