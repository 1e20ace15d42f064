//! Configuration module
//!
//! Environment-driven configuration for the pipeline. `from_env` loads an
//! optional `.env` file first, applies defaults, and validates that the
//! selected storage backend has everything it needs.

use std::env;

use crate::storage_types::StorageBackend;

const DEFAULT_SEGMENTER_PATH: &str = "video2hls";
const DEFAULT_SEGMENTER_TIMEOUT_SECS: u64 = 900;

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct Config {
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Segmenter configuration
    pub segmenter_path: String,
    pub segmenter_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3,
            "local" => StorageBackend::Local,
            other => {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND must be 's3' or 'local', got '{}'",
                    other
                ))
            }
        };

        let config = Config {
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok().filter(|s| !s.is_empty()),
            s3_region: env::var("S3_REGION").ok().filter(|s| !s.is_empty()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            access_key_id: env::var("ACCESS_KEY_ID")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            secret_access_key: env::var("SECRET_ACCESS_KEY")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok().filter(|s| !s.is_empty()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            segmenter_path: env::var("SEGMENTER_PATH")
                .unwrap_or_else(|_| DEFAULT_SEGMENTER_PATH.to_string()),
            segmenter_timeout_secs: env::var("SEGMENTER_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_SEGMENTER_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_SEGMENTER_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION must be set when using S3 storage backend"
                    ));
                }
                if self.access_key_id.is_none() || self.secret_access_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "ACCESS_KEY_ID and SECRET_ACCESS_KEY must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.segmenter_path.trim().is_empty() {
            return Err(anyhow::anyhow!("SEGMENTER_PATH must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s3_config() -> Config {
        Config {
            storage_backend: StorageBackend::S3,
            s3_bucket: Some("bucket".to_string()),
            s3_region: Some("us-east-2".to_string()),
            s3_endpoint: None,
            access_key_id: Some("AKIA".to_string()),
            secret_access_key: Some("secret".to_string()),
            local_storage_path: None,
            local_storage_base_url: None,
            segmenter_path: "video2hls".to_string(),
            segmenter_timeout_secs: 900,
        }
    }

    #[test]
    fn test_validate_s3_ok() {
        assert!(s3_config().validate().is_ok());
    }

    #[test]
    fn test_validate_s3_missing_bucket() {
        let mut config = s3_config();
        config.s3_bucket = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_s3_missing_credentials() {
        let mut config = s3_config();
        config.secret_access_key = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_local_requires_path_and_url() {
        let mut config = s3_config();
        config.storage_backend = StorageBackend::Local;
        assert!(config.validate().is_err());

        config.local_storage_path = Some("/tmp/hls".to_string());
        config.local_storage_base_url = Some("http://localhost:3000/hls".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_segmenter_path() {
        let mut config = s3_config();
        config.segmenter_path = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
