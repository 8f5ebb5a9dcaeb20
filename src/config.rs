use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::utils::upload::UploadPolicy;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
const DEFAULT_MAX_DOCS: usize = 10;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_address: String,
    pub upload_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub max_file_size: usize,
    pub max_docs: usize,
    pub accept_any_file: bool,
    pub serve_uploads: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let upload_dir: PathBuf = get("UPLOAD_DIR")
            .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())
            .into();
        // Same filesystem as the upload directory unless set explicitly.
        let staging_dir = get("STAGING_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| upload_dir.join(".staging"));

        Ok(Self {
            database_url,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            upload_dir,
            staging_dir,
            max_file_size: parse_or(
                "UPLOAD_MAX_FILE_SIZE",
                get("UPLOAD_MAX_FILE_SIZE"),
                DEFAULT_MAX_FILE_SIZE,
            )?,
            max_docs: parse_or("UPLOAD_MAX_DOCS", get("UPLOAD_MAX_DOCS"), DEFAULT_MAX_DOCS)?,
            accept_any_file: parse_or("UPLOAD_ACCEPT_ANY", get("UPLOAD_ACCEPT_ANY"), false)?,
            serve_uploads: parse_or("SERVE_UPLOADS", get("SERVE_UPLOADS"), true)?,
        })
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_file_size: self.max_file_size,
            max_docs: self.max_docs,
            accept_any: self.accept_any_file,
        }
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
