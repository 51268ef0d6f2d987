use anyhow::{bail, Context, Result};

const DEFAULT_LOCAL_ROOT: &str = "storage/app/public";
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Which blob store backs the résumé files.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    /// Files on local disk under `root`.
    Local { root: String },
    /// S3 or an S3-compatible endpoint such as MinIO.
    S3(S3Settings),
}

#[derive(Debug, Clone, PartialEq)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub storage: StorageBackend,
    pub max_body_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            storage: storage_from_env()?,
            max_body_bytes: optional_env("MAX_BODY_BYTES")
                .map(|v| {
                    v.parse::<usize>()
                        .context("MAX_BODY_BYTES must be a byte count")
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn storage_from_env() -> Result<StorageBackend> {
    storage_from(|key| std::env::var(key).ok())
}

/// Picks the blob backend from `lookup`, which maps a variable name to its value.
fn storage_from(lookup: impl Fn(&str) -> Option<String>) -> Result<StorageBackend> {
    let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let require = |key: &str| {
        optional(key).with_context(|| format!("Required environment variable '{key}' is not set"))
    };

    let backend = optional("STORAGE_BACKEND").unwrap_or_else(|| "local".to_string());
    match backend.to_ascii_lowercase().as_str() {
        "local" => Ok(StorageBackend::Local {
            root: optional("LOCAL_STORAGE_ROOT").unwrap_or_else(|| DEFAULT_LOCAL_ROOT.to_string()),
        }),
        "s3" => Ok(StorageBackend::S3(S3Settings {
            bucket: require("S3_BUCKET")?,
            endpoint: require("S3_ENDPOINT")?,
            region: optional("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            access_key_id: require("AWS_ACCESS_KEY_ID")?,
            secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
        })),
        other => bail!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn storage(vars: &[(&str, &str)]) -> Result<StorageBackend> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        storage_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_to_local_storage() {
        assert_eq!(
            storage(&[]).unwrap(),
            StorageBackend::Local {
                root: DEFAULT_LOCAL_ROOT.to_string()
            }
        );
        assert_eq!(
            storage(&[("STORAGE_BACKEND", "LOCAL"), ("LOCAL_STORAGE_ROOT", "/srv/files")]).unwrap(),
            StorageBackend::Local {
                root: "/srv/files".to_string()
            }
        );
    }

    #[test]
    fn test_s3_storage_reads_settings() {
        let backend = storage(&[
            ("STORAGE_BACKEND", "s3"),
            ("S3_BUCKET", "cvs"),
            ("S3_ENDPOINT", "http://minio:9000"),
            ("AWS_ACCESS_KEY_ID", "minio"),
            ("AWS_SECRET_ACCESS_KEY", "minio123"),
        ])
        .unwrap();
        assert_eq!(
            backend,
            StorageBackend::S3(S3Settings {
                bucket: "cvs".to_string(),
                endpoint: "http://minio:9000".to_string(),
                region: "us-east-1".to_string(),
                access_key_id: "minio".to_string(),
                secret_access_key: "minio123".to_string(),
            })
        );
    }

    #[test]
    fn test_s3_storage_names_missing_key() {
        let err = storage(&[("STORAGE_BACKEND", "s3"), ("S3_BUCKET", "cvs")]).unwrap_err();
        assert!(err.to_string().contains("S3_ENDPOINT"), "{err}");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = storage(&[("STORAGE_BACKEND", "ftp")]).unwrap_err();
        assert!(err.to_string().contains("'ftp'"), "{err}");
    }
}
